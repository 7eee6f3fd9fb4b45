//! Fire-and-forget audio and visual cues.

use std::time::Duration;

use glam::Vec2;

/// Named sound effects the game may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Machine gun shot.
    Shoot,
    /// Missile launch.
    Missile,
    /// Large explosion.
    Explosion,
    /// Projectile striking an enemy.
    EnemyHit,
    /// Player taking damage.
    Hit,
    /// Pickup collected.
    PowerUp,
}

/// Colour treatment of floating text and banners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextTone {
    /// Points gained.
    Reward,
    /// Points lost or damage taken.
    Penalty,
    /// Incoming threat.
    Warning,
    /// Neutral announcement.
    Info,
}

/// Presentation request emitted by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Plays a sound cue.
    Sound(Cue),
    /// Spawns an explosion particle burst.
    Explosion {
        /// Centre of the explosion.
        at: Vec2,
        /// Relative size of the burst.
        scale: f32,
    },
    /// Shows short-lived text rising from a point.
    FloatingText {
        /// Anchor of the text.
        at: Vec2,
        /// Text to display.
        text: String,
        /// Colour treatment.
        tone: TextTone,
    },
    /// Shows a centred announcement banner.
    Banner {
        /// Text to display.
        text: String,
        /// Colour treatment.
        tone: TextTone,
    },
    /// Flashes the screen to signal player damage.
    DamageFlash,
    /// Shakes the camera.
    ScreenShake {
        /// Length of the shake.
        duration: Duration,
        /// Shake amplitude as a fraction of the viewport.
        intensity: f32,
    },
}

/// Consumer of presentation effects.
///
/// Implementations must tolerate any volume of effects; the simulation never
/// inspects what happens to them.
pub trait EffectSink {
    /// Records or presents a single effect.
    fn emit(&mut self, effect: Effect);
}

/// Sink that discards every effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn emit(&mut self, _effect: Effect) {}
}

/// Sink that keeps every effect in emission order.
#[derive(Clone, Debug, Default)]
pub struct EffectLog {
    effects: Vec<Effect>,
}

impl EffectLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects recorded so far.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Number of recorded effects matching the predicate.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Effect) -> bool) -> usize {
        self.effects.iter().filter(|effect| predicate(effect)).count()
    }

    /// Removes and returns every recorded effect.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl EffectSink for EffectLog {
    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}
