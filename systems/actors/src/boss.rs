use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use road_rush_core::{
    ActorId, ActorKind, BossKind, BossPhase, Cue, Effect, Event, RoadLayout, TextTone,
};
use road_rush_world::{projectiles::ProjectileGroup, Body, Easing, Tween};
use tracing::info;

use crate::{
    stats::{self, BossProfile},
    ActorContext, Combatant, Vitals,
};

const ENTRY_FROM_Y: f32 = -100.0;
const ENTRY_TO_Y: f32 = 120.0;
const ENTRY: Duration = Duration::from_millis(2000);
const RETARGET: Duration = Duration::from_millis(1000);
const TOP_LIMIT: f32 = 80.0;
const RAM_DISTANCE: f32 = 80.0;
const RAM_LEG: Duration = Duration::from_millis(300);
const RAM_CHANCE: f32 = 0.3;
const SHOT_SIZE: Vec2 = Vec2::new(8.0, 16.0);

#[derive(Clone, Copy, Debug, PartialEq)]
struct RamDash {
    origin_y: f32,
    elapsed: Duration,
}

impl RamDash {
    fn offset(&self) -> f32 {
        let leg = RAM_LEG.as_secs_f32();
        let t = self.elapsed.as_secs_f32();
        let progress = if t <= leg {
            t / leg
        } else {
            1.0 - (t - leg) / leg
        };
        RAM_DISTANCE * Easing::CubicOut.apply(progress)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= RAM_LEG * 2
    }
}

/// Phase-gated boss guarding a campaign level threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    id: ActorId,
    profile: &'static BossProfile,
    body: Body,
    vitals: Vitals,
    speed: f32,
    phase: BossPhase,
    attack_timer: Duration,
    move_timer: Duration,
    target_x: f32,
    entry: Option<Tween>,
    ram: Option<RamDash>,
    projectiles: Option<ProjectileGroup>,
}

impl Boss {
    /// Creates a boss above the viewport, ready to play its entry.
    #[must_use]
    pub fn spawn(id: ActorId, kind: BossKind, layout: &RoadLayout, base_speed: f32) -> Self {
        let profile = stats::boss(kind);
        let x = layout.center_x();
        Self {
            id,
            profile,
            body: Body::new(Vec2::new(x, ENTRY_FROM_Y), profile.size),
            vitals: Vitals::new(profile.health, profile.points),
            speed: base_speed * profile.speed_factor,
            phase: BossPhase::One,
            attack_timer: Duration::ZERO,
            move_timer: Duration::ZERO,
            target_x: x,
            entry: Some(Tween::new(ENTRY_FROM_Y, ENTRY_TO_Y, ENTRY, Easing::CubicOut)),
            ram: None,
            projectiles: profile
                .can_shoot
                .then(|| ProjectileGroup::unbounded(SHOT_SIZE)),
        }
    }

    /// Boss archetype.
    #[must_use]
    pub fn boss_kind(&self) -> BossKind {
        self.profile.kind
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> BossPhase {
        self.phase
    }

    /// Damage dealt to the player on contact.
    #[must_use]
    pub fn contact_damage(&self) -> u32 {
        self.profile.contact_damage
    }

    /// Whether the entry animation is still playing.
    #[must_use]
    pub fn is_entering(&self) -> bool {
        self.entry.is_some()
    }

    /// Whether a ram dash is in progress.
    #[must_use]
    pub fn is_ramming(&self) -> bool {
        self.ram.is_some()
    }

    /// Aimed projectiles fired by the boss.
    #[must_use]
    pub fn projectiles(&self) -> Option<&ProjectileGroup> {
        self.projectiles.as_ref()
    }

    /// Mutable aimed projectiles fired by the boss.
    pub fn projectiles_mut(&mut self) -> Option<&mut ProjectileGroup> {
        self.projectiles.as_mut()
    }

    /// Moves the boss and its projectiles.
    pub fn integrate(&mut self, dt: Duration) {
        if self.vitals.is_active() && self.entry.is_none() {
            self.body.integrate(dt);
        }
        if let Some(group) = self.projectiles.as_mut() {
            group.integrate(dt);
        }
    }

    /// Drops projectiles that left the viewport on any side.
    pub fn cull_projectiles(&mut self, layout: &RoadLayout) -> usize {
        self.projectiles
            .as_mut()
            .map_or(0, |group| group.cull_outside(layout, 50.0))
    }

    /// Raises the phase to match remaining health; returns the new phase when it changed.
    pub fn refresh_phase(&mut self) -> Option<BossPhase> {
        let phase = BossPhase::for_health_fraction(self.vitals.fraction());
        if phase > self.phase {
            self.phase = phase;
            return Some(phase);
        }
        None
    }

    fn run_ai(&mut self, ctx: &mut ActorContext<'_>) {
        let layout = ctx.layout;
        if self.ram.is_none() {
            self.body.set_velocity_y(ctx.road_speed - self.speed);
            let y = self.body.position().y;
            if y < TOP_LIMIT {
                self.body.set_y(TOP_LIMIT);
                self.body.set_velocity_y(0.0);
            }
            if y > layout.height() * 0.4 {
                self.body.set_y(layout.height() * 0.4);
            }
        }

        if self.move_timer > RETARGET {
            self.move_timer = Duration::ZERO;
            let offset: f32 = ctx.rng.gen_range(-30.0..=30.0);
            self.target_x = (ctx.player.position.x + offset).clamp(
                layout.margin() + 40.0,
                layout.width() - layout.margin() - 40.0,
            );
        }

        let dx = self.target_x - self.body.position().x;
        let move_speed = 50.0 + 20.0 * self.phase.number() as f32;
        let vx = if dx.abs() > 10.0 {
            dx.signum() * move_speed
        } else {
            0.0
        };
        self.body.set_velocity_x(vx);

        if self.attack_timer > self.profile.attack_cooldown / self.phase.number() {
            self.attack_timer = Duration::ZERO;
            self.attack(ctx);
        }
    }

    fn attack(&mut self, ctx: &mut ActorContext<'_>) {
        if let Some(group) = self.projectiles.as_mut() {
            let position = self.body.position();
            let aim = (ctx.player.position - position).normalize_or_zero();
            let aim = if aim == Vec2::ZERO { Vec2::Y } else { aim };
            let speed = 250.0 + 50.0 * self.phase.number() as f32;
            if group.fire(position + Vec2::new(0.0, 40.0), aim * speed, None) {
                ctx.effects.emit(Effect::Sound(Cue::Shoot));
            }
        }

        if self.phase >= BossPhase::Two && self.ram.is_none() && ctx.rng.gen::<f32>() < RAM_CHANCE
        {
            self.ram = Some(RamDash {
                origin_y: self.body.position().y,
                elapsed: Duration::ZERO,
            });
            self.body.set_velocity_y(0.0);
        }
    }

    fn advance_ram(&mut self, dt: Duration) {
        let Some(ram) = self.ram.as_mut() else {
            return;
        };
        ram.elapsed = (ram.elapsed + dt).min(RAM_LEG * 2);
        let y = ram.origin_y + ram.offset();
        let finished = ram.is_finished();
        self.body.set_y(y);
        self.body.set_velocity_y(0.0);
        if finished {
            self.ram = None;
        }
    }
}

impl Combatant for Boss {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Boss(self.profile.kind)
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
        if let Some(entry) = self.entry.as_mut() {
            let y = entry.advance(ctx.dt);
            let finished = entry.is_finished();
            self.body.set_y(y);
            if finished {
                self.entry = None;
            }
            return;
        }

        self.move_timer += ctx.dt;
        self.attack_timer += ctx.dt;
        self.advance_ram(ctx.dt);
        if ctx.player.active {
            self.run_ai(ctx);
        }

        let floor = ctx.layout.height() + 50.0;
        if let Some(group) = self.projectiles.as_mut() {
            let _ = group.cull(|p| p.y > floor);
        }

        if let Some(phase) = self.refresh_phase() {
            let text = match phase {
                BossPhase::Three => "ENRAGED!",
                _ => "PHASE 2",
            };
            info!(boss = ?self.profile.kind, phase = phase.number(), "boss phase changed");
            ctx.effects.emit(Effect::FloatingText {
                at: self.body.position() - Vec2::new(0.0, 80.0),
                text: text.to_owned(),
                tone: TextTone::Warning,
            });
            ctx.events.push(Event::BossPhaseChanged {
                kind: self.profile.kind,
                phase,
            });
        }
    }

    fn on_death(&mut self) {
        if let Some(group) = self.projectiles.as_mut() {
            group.clear();
        }
        self.ram = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss(kind: BossKind) -> Boss {
        Boss::spawn(ActorId::new(1), kind, &RoadLayout::default(), 200.0)
    }

    #[test]
    fn phase_never_decreases_and_caps_at_three() {
        let mut boss = boss(BossKind::Tank);
        let mut last = boss.phase();
        while boss.is_active() {
            let _ = boss.take_damage(1);
            let _ = boss.refresh_phase();
            assert!(boss.phase() >= last);
            assert!(boss.phase().number() <= 3);
            last = boss.phase();
        }
        assert_eq!(last, BossPhase::Three);
    }

    #[test]
    fn heavy_hit_can_skip_straight_to_enraged() {
        let mut boss = boss(BossKind::ArmoredTruck);
        assert!(!boss.take_damage(10));
        assert_eq!(boss.refresh_phase(), Some(BossPhase::Three));
        assert_eq!(boss.refresh_phase(), None);
    }

    #[test]
    fn unarmed_boss_has_no_projectiles() {
        assert!(boss(BossKind::ArmoredTruck).projectiles().is_none());
        assert!(boss(BossKind::WeaponVan).projectiles().is_some());
    }

    #[test]
    fn ram_dash_returns_to_origin() {
        let mut dash = RamDash {
            origin_y: 100.0,
            elapsed: RAM_LEG,
        };
        assert!((dash.offset() - RAM_DISTANCE).abs() < 1e-4);
        dash.elapsed = RAM_LEG * 2;
        assert!(dash.offset().abs() < 1e-4);
        assert!(dash.is_finished());
    }
}
