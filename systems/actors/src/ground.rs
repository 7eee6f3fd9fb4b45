use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use road_rush_core::{
    ActorId, ActorKind, Archetype, Cue, Effect, Lane, RoadLayout, ScoringTuning,
};
use road_rush_world::{projectiles::ProjectileGroup, Body};

use crate::{
    stats::{self, ArchetypeProfile},
    ActorContext, Combatant, Vitals,
};

const SHOT_SPEED: f32 = 200.0;
const SHOT_SIZE: Vec2 = Vec2::new(6.0, 12.0);

/// Civilian or enemy vehicle driving in the lanes.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundActor {
    id: ActorId,
    profile: &'static ArchetypeProfile,
    body: Body,
    vitals: Vitals,
    base_speed: f32,
    speed: f32,
    lane: Lane,
    target_x: f32,
    retarget_timer: Duration,
    shoot_timer: Duration,
    projectiles: Option<ProjectileGroup>,
    spin_out_until: Option<Duration>,
}

impl GroundActor {
    /// Creates an actor at the centre of `lane` at height `y`.
    #[must_use]
    pub fn spawn(
        id: ActorId,
        archetype: Archetype,
        lane: Lane,
        y: f32,
        layout: &RoadLayout,
        base_speed: f32,
        scoring: &ScoringTuning,
    ) -> Self {
        let profile = stats::archetype(archetype);
        let x = layout.lane_center(lane);
        Self {
            id,
            profile,
            body: Body::new(Vec2::new(x, y), profile.size),
            vitals: Vitals::new(profile.health, profile.points(scoring)),
            base_speed,
            speed: base_speed * profile.speed_factor,
            lane,
            target_x: x,
            retarget_timer: Duration::ZERO,
            shoot_timer: Duration::ZERO,
            projectiles: profile
                .shoot_cooldown
                .map(|_| ProjectileGroup::unbounded(SHOT_SIZE)),
            spin_out_until: None,
        }
    }

    /// Archetype the actor was created with.
    #[must_use]
    pub fn archetype(&self) -> Archetype {
        self.profile.archetype
    }

    /// Lane the actor was spawned in.
    #[must_use]
    pub const fn assigned_lane(&self) -> Lane {
        self.lane
    }

    /// Current forward speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Horizontal position the actor is steering toward.
    #[must_use]
    pub const fn target_x(&self) -> f32 {
        self.target_x
    }

    /// Projectiles fired by a shooting archetype.
    #[must_use]
    pub fn projectiles(&self) -> Option<&ProjectileGroup> {
        self.projectiles.as_ref()
    }

    /// Mutable projectiles fired by a shooting archetype.
    pub fn projectiles_mut(&mut self) -> Option<&mut ProjectileGroup> {
        self.projectiles.as_mut()
    }

    /// Moves the actor and its projectiles by their velocities.
    pub fn integrate(&mut self, dt: Duration) {
        if self.vitals.is_active() {
            self.body.integrate(dt);
        }
        if let Some(group) = self.projectiles.as_mut() {
            group.integrate(dt);
        }
    }

    /// Whether the actor drove out of the viewport bounds.
    #[must_use]
    pub fn is_off_road(&self, layout: &RoadLayout) -> bool {
        let y = self.body.position().y;
        y > layout.height() + 100.0 || y < -100.0
    }

    /// Shifts the actor sideways, used to separate overlapping vehicles.
    pub fn nudge(&mut self, dx: f32) {
        self.body.translate(Vec2::new(dx, 0.0));
    }

    /// Starts an oil spin-out; refused while already spinning.
    pub fn start_spin_out(&mut self, now: Duration, duration: Duration) -> bool {
        if !self.vitals.is_active() || self.spin_out_until.is_some() {
            return false;
        }
        self.spin_out_until = Some(now + duration);
        true
    }

    /// Whether the actor is spinning out.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spin_out_until.is_some()
    }

    /// Reports a spin-out that ended at or before `now`, exactly once.
    pub fn finish_spin_out(&mut self, now: Duration) -> bool {
        match self.spin_out_until {
            Some(until) if now >= until => {
                self.spin_out_until = None;
                true
            }
            _ => false,
        }
    }

    fn retarget_due(&mut self, dt: Duration) -> bool {
        let Some(interval) = self.profile.retarget else {
            return false;
        };
        self.retarget_timer += dt;
        if self.retarget_timer > interval {
            self.retarget_timer = Duration::ZERO;
            return true;
        }
        false
    }

    fn steer_toward_target(&mut self) {
        let dx = self.target_x - self.body.position().x;
        let vx = if dx.abs() > self.profile.dead_zone {
            dx.signum() * self.profile.lateral_speed
        } else {
            0.0
        };
        self.body.set_velocity_x(vx);
    }

    fn civilian(&mut self, layout: &RoadLayout) {
        self.target_x = layout.lane_center(self.lane);
        self.steer_toward_target();
    }

    fn chaser(&mut self, ctx: &ActorContext<'_>) {
        if self.retarget_due(ctx.dt) {
            self.target_x = ctx.player.position.x;
        }
        self.steer_toward_target();

        let y = self.body.position().y;
        let player_y = ctx.player.position.y;
        let factor = if y > player_y + 100.0 {
            1.3
        } else if y > player_y {
            1.1
        } else {
            0.7
        };
        self.speed = self.base_speed * factor;
    }

    fn motorcycle(&mut self, ctx: &mut ActorContext<'_>) {
        if self.retarget_due(ctx.dt) {
            let layout = ctx.layout;
            let current =
                ((self.body.position().x - layout.margin()) / layout.lane_width()).floor() as i64;
            let lanes = i64::from(layout.lanes());
            let next = if current <= 1 {
                current + 1
            } else if current >= lanes - 2 {
                current - 1
            } else if ctx.rng.gen_bool(0.5) {
                current - 1
            } else {
                current + 1
            };
            let next = next.clamp(0, lanes - 1) as u32;
            self.target_x = layout.lane_center(Lane::new(next));
        }
        self.steer_toward_target();
    }

    fn armored(&mut self, ctx: &ActorContext<'_>) {
        if self.retarget_due(ctx.dt) {
            self.target_x = ctx.player.position.x;
        }
        self.steer_toward_target();
    }

    fn shooter(&mut self, ctx: &mut ActorContext<'_>) {
        self.body.set_velocity_x(0.0);
        let Some(cooldown) = self.profile.shoot_cooldown else {
            return;
        };
        self.shoot_timer += ctx.dt;
        if self.shoot_timer < cooldown {
            return;
        }
        self.shoot_timer = Duration::ZERO;

        let position = self.body.position();
        let aim = (ctx.player.position - position).normalize_or_zero();
        let aim = if aim == Vec2::ZERO { Vec2::Y } else { aim };
        if let Some(group) = self.projectiles.as_mut() {
            if group.fire(position + Vec2::new(0.0, 30.0), aim * SHOT_SPEED, None) {
                ctx.effects.emit(Effect::Sound(Cue::Shoot));
            }
        }
    }

    fn blocker(&mut self, ctx: &ActorContext<'_>) {
        if self.retarget_due(ctx.dt) {
            self.target_x = ctx.player.position.x;
        }
        self.steer_toward_target();

        let factor = if self.body.position().y > ctx.player.position.y - 150.0 {
            0.4
        } else {
            0.8
        };
        self.speed = self.base_speed * factor;
    }

    fn rammer(&mut self, ctx: &ActorContext<'_>) {
        if self.retarget_due(ctx.dt) {
            let lane = ctx
                .player
                .lane
                .unwrap_or_else(|| ctx.layout.nearest_lane(ctx.player.position.x));
            self.target_x = ctx.layout.lane_center(lane);
        }
        self.steer_toward_target();

        let y = self.body.position().y;
        let player_y = ctx.player.position.y;
        let factor = if y > player_y + 60.0 {
            1.2
        } else if y >= player_y - 60.0 {
            1.5
        } else {
            0.9
        };
        self.speed = self.base_speed * factor;
    }
}

impl Combatant for GroundActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Ground(self.profile.archetype)
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
        self.body.set_velocity_y(ctx.road_speed - self.speed);

        if self.is_spinning() {
            self.body.set_velocity_x(0.0);
        } else if self.profile.archetype.is_civilian() {
            self.civilian(ctx.layout);
        } else if !ctx.player.active {
            self.body.set_velocity_x(0.0);
        } else {
            match self.profile.archetype {
                Archetype::Civilian => {}
                Archetype::Chaser => self.chaser(ctx),
                Archetype::Motorcycle => self.motorcycle(ctx),
                Archetype::Armored => self.armored(ctx),
                Archetype::Shooter => self.shooter(ctx),
                Archetype::Blocker => self.blocker(ctx),
                Archetype::Rammer => self.rammer(ctx),
            }
        }

        let floor = ctx.layout.height() + 50.0;
        if let Some(group) = self.projectiles.as_mut() {
            let _ = group.cull(|p| p.y > floor);
        }
    }

    fn on_death(&mut self) {
        if let Some(group) = self.projectiles.as_mut() {
            group.clear();
        }
        self.spin_out_until = None;
    }
}
