use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use road_rush_core::{ActorId, ActorKind, Cue, Effect, RoadLayout};
use road_rush_world::{millis, Body, Easing, Tween};

use crate::{ActorContext, Combatant, Vitals};

const HEALTH: i32 = 5;
const POINTS: i64 = 300;
const SIZE: Vec2 = Vec2::new(50.0, 40.0);
const BOMB_SIZE: Vec2 = Vec2::new(12.0, 12.0);
const START_Y: f32 = 80.0;
const ENTRY: Duration = Duration::from_millis(1500);
const RETARGET: Duration = Duration::from_millis(2000);
const BOMB_COOLDOWN: Duration = Duration::from_millis(3000);
const BOMB_FALL: Duration = Duration::from_millis(900);
const LATERAL_SPEED: f32 = 60.0;
const HOVER_RANGE: f32 = 8.0;
const DRIFT_PER_MS: f32 = 0.01;

/// Radius within which a bomb blast hurts the player.
pub(crate) const BLAST_RADIUS: f32 = 60.0;
/// Damage dealt by a bomb blast.
pub(crate) const BLAST_DAMAGE: u32 = 35;

/// Bomb falling toward the point the player occupied when it was dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bomb {
    body: Body,
    start_y: f32,
    target: Vec2,
}

/// Telegraph drawn where a bomb will land.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BombShadow {
    /// Impact point.
    pub at: Vec2,
    /// Relative size, growing from 0.5 to 1.0.
    pub scale: f32,
    /// Opacity, growing from 0.3 to 0.8.
    pub alpha: f32,
}

impl Bomb {
    /// Body of the falling bomb.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Fraction of the fall already covered.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let total = self.target.y - self.start_y;
        if total <= 0.0 {
            return 1.0;
        }
        ((self.body.position().y - self.start_y) / total).clamp(0.0, 1.0)
    }

    /// Telegraph for the impact point.
    #[must_use]
    pub fn shadow(&self) -> BombShadow {
        let progress = self.progress();
        BombShadow {
            at: self.target,
            scale: 0.5 + progress * 0.5,
            alpha: 0.3 + progress * 0.5,
        }
    }
}

/// Area blast produced when a bomb reaches its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detonation {
    /// Centre of the blast.
    pub at: Vec2,
    /// Radius within which the player is hurt.
    pub radius: f32,
    /// Damage dealt to the player.
    pub damage: u32,
}

/// Helicopter hovering near the top of the road and bombing the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Helicopter {
    id: ActorId,
    body: Body,
    vitals: Vitals,
    base_y: f32,
    hover_offset: f32,
    hover_direction: f32,
    target_x: f32,
    move_timer: Duration,
    bomb_timer: Duration,
    entry: Option<Tween>,
    bombs: Vec<Bomb>,
    detonations: Vec<Detonation>,
}

impl Helicopter {
    /// Creates a helicopter flying in from a random side toward `x`.
    #[must_use]
    pub fn spawn(id: ActorId, x: f32, layout: &RoadLayout, from_left: bool) -> Self {
        let start_x = if from_left {
            -50.0
        } else {
            layout.width() + 50.0
        };
        Self {
            id,
            body: Body::new(Vec2::new(start_x, START_Y), SIZE),
            vitals: Vitals::new(HEALTH, POINTS),
            base_y: START_Y,
            hover_offset: 0.0,
            hover_direction: 1.0,
            target_x: x,
            move_timer: Duration::ZERO,
            bomb_timer: Duration::ZERO,
            entry: Some(Tween::new(start_x, x, ENTRY, Easing::CubicOut)),
            bombs: Vec::new(),
            detonations: Vec::new(),
        }
    }

    /// Bombs still falling.
    #[must_use]
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    /// Centre of the hover band.
    #[must_use]
    pub const fn base_y(&self) -> f32 {
        self.base_y
    }

    /// Whether the helicopter drifted low enough to leave.
    #[must_use]
    pub fn has_drifted_out(&self, layout: &RoadLayout) -> bool {
        self.base_y > layout.height() * 0.4
    }

    /// Moves the helicopter and its bombs.
    pub fn integrate(&mut self, dt: Duration) {
        if self.vitals.is_active() && self.entry.is_none() {
            self.body.integrate(dt);
        }
        for bomb in &mut self.bombs {
            bomb.body.integrate(dt);
        }
    }

    /// Moves every blast produced since the last call into `out`.
    pub fn drain_detonations(&mut self, out: &mut Vec<Detonation>) {
        out.append(&mut self.detonations);
    }

    fn drop_bomb(&mut self, ctx: &mut ActorContext<'_>) {
        let origin = self.body.position() + Vec2::new(0.0, 20.0);
        let target = ctx.player.position;
        let mut body = Body::new(origin, BOMB_SIZE);
        body.set_velocity((target - origin) / BOMB_FALL.as_secs_f32());
        self.bombs.push(Bomb {
            body,
            start_y: origin.y,
            target,
        });
        ctx.effects.emit(Effect::Sound(Cue::Missile));
    }

    fn detonate_landed(&mut self, ctx: &mut ActorContext<'_>) {
        let mut index = 0;
        while index < self.bombs.len() {
            let bomb = self.bombs[index];
            if bomb.body.position().y >= bomb.target.y {
                let at = bomb.body.position();
                let _ = self.bombs.swap_remove(index);
                ctx.effects.emit(Effect::Explosion { at, scale: 1.0 });
                ctx.effects.emit(Effect::Sound(Cue::Explosion));
                self.detonations.push(Detonation {
                    at,
                    radius: BLAST_RADIUS,
                    damage: BLAST_DAMAGE,
                });
            } else {
                index += 1;
            }
        }
    }
}

impl Combatant for Helicopter {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Helicopter
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>) {
        if !self.vitals.is_active() {
            return;
        }
        let delta_ms = millis(ctx.dt);
        self.move_timer += ctx.dt;
        self.bomb_timer += ctx.dt;

        self.hover_offset += delta_ms * 0.005 * self.hover_direction;
        if self.hover_offset.abs() > HOVER_RANGE {
            self.hover_direction = -self.hover_direction;
        }

        if self.move_timer > RETARGET {
            self.move_timer = Duration::ZERO;
            if ctx.player.active {
                let layout = ctx.layout;
                let offset: f32 = ctx.rng.gen_range(-30.0..=30.0);
                self.target_x = (ctx.player.position.x + offset).clamp(
                    layout.margin() + 50.0,
                    layout.width() - layout.margin() - 50.0,
                );
            }
        }

        if let Some(entry) = self.entry.as_mut() {
            let x = entry.advance(ctx.dt);
            self.body.set_x(x);
            self.body.set_velocity_x(0.0);
            if entry.is_finished() {
                self.entry = None;
            }
        } else {
            let dx = self.target_x - self.body.position().x;
            let vx = if dx.abs() > 10.0 {
                dx.signum() * LATERAL_SPEED
            } else {
                0.0
            };
            self.body.set_velocity_x(vx);
        }

        self.body.set_y(self.base_y + self.hover_offset);
        self.body.set_velocity_y(0.0);
        self.base_y += delta_ms * DRIFT_PER_MS;

        if self.bomb_timer > BOMB_COOLDOWN && ctx.player.active {
            self.bomb_timer = Duration::ZERO;
            self.drop_bomb(ctx);
        }
        self.detonate_landed(ctx);

        if self.has_drifted_out(ctx.layout) {
            self.destroy();
        }
    }

    fn on_death(&mut self) {
        self.bombs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_grows_as_the_bomb_falls() {
        let mut body = Body::new(Vec2::new(100.0, 100.0), BOMB_SIZE);
        body.set_velocity(Vec2::new(0.0, 400.0));
        let mut bomb = Bomb {
            body,
            start_y: 100.0,
            target: Vec2::new(100.0, 500.0),
        };
        assert_eq!(bomb.shadow().scale, 0.5);
        bomb.body.integrate(Duration::from_millis(500));
        let shadow = bomb.shadow();
        assert!((shadow.scale - 0.75).abs() < 1e-4);
        assert!((shadow.alpha - 0.55).abs() < 1e-4);
    }

    #[test]
    fn bomb_aimed_upward_counts_as_landed() {
        let bomb = Bomb {
            body: Body::new(Vec2::new(0.0, 200.0), BOMB_SIZE),
            start_y: 200.0,
            target: Vec2::new(0.0, 150.0),
        };
        assert_eq!(bomb.progress(), 1.0);
    }
}
