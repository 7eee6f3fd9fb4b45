//! The player car: survivability, score, weapons and the weapons-van seat.

use std::time::Duration;

use glam::Vec2;
use road_rush_core::{ActorId, Lane, PlayerTuning, RoadLayout, Weapon, WeaponTuning};

use crate::{seconds, Body};

/// Footprint of the player car.
pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 70.0);

const KNOCKBACK_DAMPING: f32 = 10.0;

/// Read-only snapshot of the player handed to actor AI each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    /// Centre of the player car.
    pub position: Vec2,
    /// Forward speed, which is also the road speed.
    pub speed: f32,
    /// Whether the player is still in the game.
    pub active: bool,
    /// Whether hits are currently absorbed.
    pub invulnerable: bool,
    /// Whether the player is seated in the weapons van.
    pub in_van: bool,
    /// Lane the player is driving in, if on the road.
    pub lane: Option<Lane>,
}

/// Result of applying damage to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The hit was absorbed by invulnerability or the player is out of the game.
    Ignored,
    /// Health dropped but the player survives.
    Wounded {
        /// Health remaining.
        health: i32,
    },
    /// A life was lost and the player respawned.
    LifeLost {
        /// Lives remaining.
        lives: u32,
    },
    /// The last life was lost.
    GameOver,
}

/// Projectile or effect produced by a successful trigger pull.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Weapon that fired.
    pub weapon: Weapon,
    /// Launch point of the projectile.
    pub origin: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WeaponSlot {
    ammo: Option<u32>,
    last_fired: Option<Duration>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct VanSeat {
    van: ActorId,
    resume_speed: f32,
}

/// The player car.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    body: Body,
    tuning: PlayerTuning,
    weapon_tuning: WeaponTuning,
    spawn_point: Vec2,
    width: f32,
    height: f32,
    lane_grid: RoadLayout,
    clock: Duration,
    speed: f32,
    health: i32,
    lives: u32,
    score: f64,
    active: bool,
    invulnerable_until: Option<Duration>,
    spinning_until: Option<Duration>,
    seat: Option<VanSeat>,
    selected: Weapon,
    slots: [WeaponSlot; 4],
}

impl Player {
    /// Creates a player parked at the bottom centre of the road.
    #[must_use]
    pub fn new(
        tuning: PlayerTuning,
        weapon_tuning: WeaponTuning,
        layout: RoadLayout,
        base_speed: f32,
    ) -> Self {
        let spawn_point = Vec2::new(layout.center_x(), layout.height() - 100.0);
        let slot = |ammo| WeaponSlot {
            ammo,
            last_fired: None,
        };
        Self {
            body: Body::new(spawn_point, PLAYER_SIZE),
            tuning,
            weapon_tuning,
            spawn_point,
            width: layout.width(),
            height: layout.height(),
            lane_grid: layout,
            clock: Duration::ZERO,
            speed: base_speed.clamp(tuning.min_speed, tuning.max_speed),
            health: tuning.starting_health,
            lives: tuning.starting_lives,
            score: 0.0,
            active: true,
            invulnerable_until: None,
            spinning_until: None,
            seat: None,
            selected: Weapon::MachineGun,
            slots: [
                slot(None),
                slot(Some(weapon_tuning.starting_missiles)),
                slot(Some(weapon_tuning.starting_oil)),
                slot(Some(weapon_tuning.starting_smoke)),
            ],
        }
    }

    /// Snapshot read by actor AI.
    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView {
            position: self.body.position(),
            speed: self.speed,
            active: self.active,
            invulnerable: self.is_invulnerable(),
            in_van: self.seat.is_some(),
            lane: self.lane_grid.lane_of(self.body.position().x),
        }
    }

    /// Body of the player car.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Centre of the player car.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Forward speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Health remaining in the current life.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Whole points earned so far.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.score.floor() as i64
    }

    /// Whether the player is still in the game.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether hits are currently absorbed.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.seat.is_some() || self.invulnerable_until.is_some_and(|until| self.clock < until)
    }

    /// Whether the car is spinning out of control.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spinning_until.is_some()
    }

    /// Van the player is seated in, if any.
    #[must_use]
    pub fn van(&self) -> Option<ActorId> {
        self.seat.map(|seat| seat.van)
    }

    /// Currently selected weapon.
    #[must_use]
    pub const fn selected_weapon(&self) -> Weapon {
        self.selected
    }

    /// Ammunition left for a weapon; `None` means unlimited.
    #[must_use]
    pub fn ammo(&self, weapon: Weapon) -> Option<u32> {
        self.slots[slot_index(weapon)].ammo
    }

    /// Advances player timers and accrues distance points.
    pub fn tick(&mut self, now: Duration, dt: Duration, points_per_second: f64) {
        self.clock = now;
        if self.invulnerable_until.is_some_and(|until| now >= until) {
            self.invulnerable_until = None;
        }
        if self.spinning_until.is_some_and(|until| now >= until) {
            self.spinning_until = None;
        }
        if !self.active {
            return;
        }
        if self.seat.is_none() {
            self.score += points_per_second * f64::from(seconds(dt));
        }
        self.body.integrate(dt);
        let decay = (-KNOCKBACK_DAMPING * seconds(dt)).exp();
        let velocity = self.body.velocity();
        self.body.set_velocity(Vec2::new(velocity.x * decay, 0.0));
        self.clamp_to_viewport();
    }

    /// Steers the car to a requested position unless control is locked.
    pub fn place(&mut self, position: Vec2) {
        if !self.active || self.seat.is_some() || self.is_spinning() {
            return;
        }
        self.body.set_position(position);
        self.clamp_to_viewport();
    }

    fn clamp_to_viewport(&mut self) {
        let position = self.body.position();
        self.body.set_position(Vec2::new(
            position.x.clamp(10.0, self.width - 10.0),
            position.y.clamp(50.0, self.height - 50.0),
        ));
    }

    /// Requests a new forward speed, clamped to the configured range.
    pub fn set_speed(&mut self, speed: f32) {
        if self.seat.is_some() {
            return;
        }
        self.speed = speed.clamp(self.tuning.min_speed, self.tuning.max_speed);
    }

    /// Pushes the car to its top speed.
    pub fn boost_to_max_speed(&mut self) {
        self.set_speed(self.tuning.max_speed);
    }

    /// Bleeds off a fraction of the current speed.
    pub fn apply_slowdown(&mut self, fraction: f32) {
        self.set_speed(self.speed * (1.0 - fraction.clamp(0.0, 1.0)));
    }

    /// Shoves the car sideways after a ram.
    pub fn shove(&mut self, direction: f32, impulse: f32, displacement: f32) {
        let side = direction.signum();
        self.body.translate(Vec2::new(side * displacement, 0.0));
        self.body.set_velocity_x(side * impulse);
        self.clamp_to_viewport();
    }

    /// Starts a spin-out that locks steering; refused while protected or already spinning.
    pub fn spin_out(&mut self, duration: Duration) -> bool {
        if self.is_spinning() || self.is_invulnerable() || !self.active {
            return false;
        }
        self.spinning_until = Some(self.clock + duration);
        self.body.set_velocity(Vec2::ZERO);
        true
    }

    /// Extends invulnerability to at least `duration` from now.
    pub fn grant_invulnerability(&mut self, duration: Duration) {
        let until = self.clock + duration;
        self.invulnerable_until = Some(match self.invulnerable_until {
            Some(current) => current.max(until),
            None => until,
        });
    }

    /// Applies damage, handling respawn and game over.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.active || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        self.health -= i32::try_from(amount).unwrap_or(i32::MAX);
        self.grant_invulnerability(self.tuning.damage_invulnerability());
        if self.health > 0 {
            return DamageOutcome::Wounded {
                health: self.health,
            };
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.active = false;
            self.spinning_until = None;
            return DamageOutcome::GameOver;
        }
        self.health = self.tuning.starting_health;
        self.body = Body::new(self.spawn_point, PLAYER_SIZE);
        self.spinning_until = None;
        self.invulnerable_until = None;
        self.grant_invulnerability(self.tuning.respawn_invulnerability());
        DamageOutcome::LifeLost { lives: self.lives }
    }

    /// Adds or removes points.
    pub fn add_score(&mut self, points: i64) {
        self.score += points as f64;
    }

    /// Restores health up to `cap`.
    pub fn heal(&mut self, amount: i32, cap: i32) {
        self.health = (self.health + amount).min(cap).max(self.health);
    }

    /// Grants an extra life.
    pub fn add_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Adds ammunition to a limited weapon, optionally capped.
    pub fn add_ammo(&mut self, weapon: Weapon, amount: u32, cap: Option<u32>) {
        let slot = &mut self.slots[slot_index(weapon)];
        if let Some(ammo) = slot.ammo.as_mut() {
            let topped = ammo.saturating_add(amount);
            *ammo = cap.map_or(topped, |cap| topped.min(cap).max(*ammo));
        }
    }

    /// Cycles to the next weapon.
    pub fn switch_weapon(&mut self) {
        self.selected = self.selected.next();
    }

    /// Selects a specific weapon.
    pub fn select_weapon(&mut self, weapon: Weapon) {
        self.selected = weapon;
    }

    /// Pulls the trigger of the selected weapon.
    ///
    /// Returns `None` when the weapon is cooling down, empty, or the player
    /// cannot act. Smoke screens apply their invulnerability immediately.
    pub fn fire(&mut self) -> Option<Shot> {
        if !self.active || self.seat.is_some() {
            return None;
        }
        let weapon = self.selected;
        let interval = match weapon {
            Weapon::MachineGun => self.weapon_tuning.machine_gun_interval(),
            _ => self.weapon_tuning.heavy_interval(),
        };
        let clock = self.clock;
        let slot = &mut self.slots[slot_index(weapon)];
        if slot
            .last_fired
            .is_some_and(|last| clock.saturating_sub(last) < interval)
        {
            return None;
        }
        match slot.ammo.as_mut() {
            Some(0) => return None,
            Some(ammo) => *ammo -= 1,
            None => {}
        }
        slot.last_fired = Some(clock);

        let position = self.body.position();
        let origin = match weapon {
            Weapon::MachineGun | Weapon::Missile => position - Vec2::new(0.0, 40.0),
            Weapon::OilSlick => position + Vec2::new(0.0, 40.0),
            Weapon::SmokeScreen => position,
        };
        if weapon == Weapon::SmokeScreen {
            self.grant_invulnerability(self.weapon_tuning.smoke_duration());
        }
        Some(Shot { weapon, origin })
    }

    /// Seats the player in a weapons van, locking speed and steering.
    pub fn enter_van(&mut self, van: ActorId, locked_speed: f32) {
        if self.seat.is_some() || !self.active {
            return;
        }
        self.seat = Some(VanSeat {
            van,
            resume_speed: self.speed,
        });
        self.speed = locked_speed;
        self.spinning_until = None;
        self.body.set_velocity(Vec2::ZERO);
    }

    /// Keeps the seated player attached to the van.
    pub fn ride_at(&mut self, position: Vec2) {
        if self.seat.is_some() {
            self.body.set_position(position);
        }
    }

    /// Releases the player from the van at `position` with a grace period.
    ///
    /// Returns the van that was left, if the player was seated.
    pub fn leave_van(&mut self, position: Vec2, grace: Duration) -> Option<ActorId> {
        let seat = self.seat.take()?;
        self.speed = seat.resume_speed;
        self.body.set_position(position);
        self.clamp_to_viewport();
        self.grant_invulnerability(grace);
        Some(seat.van)
    }
}

fn slot_index(weapon: Weapon) -> usize {
    match weapon {
        Weapon::MachineGun => 0,
        Weapon::Missile => 1,
        Weapon::OilSlick => 2,
        Weapon::SmokeScreen => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(
            PlayerTuning::default(),
            WeaponTuning::default(),
            RoadLayout::default(),
            200.0,
        )
    }

    fn advance(player: &mut Player, now_ms: u64) {
        player.tick(Duration::from_millis(now_ms), Duration::ZERO, 0.0);
    }

    #[test]
    fn damage_grants_a_grace_period() {
        let mut player = player();
        assert_eq!(player.take_damage(30), DamageOutcome::Wounded { health: 70 });
        assert_eq!(player.take_damage(30), DamageOutcome::Ignored);

        advance(&mut player, 1000);
        assert_eq!(player.take_damage(30), DamageOutcome::Wounded { health: 40 });
    }

    #[test]
    fn losing_all_health_respawns_until_lives_run_out() {
        let mut player = player();
        assert_eq!(player.take_damage(100), DamageOutcome::LifeLost { lives: 2 });
        assert_eq!(player.health(), 100);
        assert_eq!(player.position(), Vec2::new(240.0, 540.0));

        advance(&mut player, 1999);
        assert!(player.is_invulnerable());
        advance(&mut player, 2000);
        assert_eq!(player.take_damage(150), DamageOutcome::LifeLost { lives: 1 });
        advance(&mut player, 5000);
        assert_eq!(player.take_damage(150), DamageOutcome::GameOver);
        assert!(!player.is_active());
        assert_eq!(player.take_damage(10), DamageOutcome::Ignored);
    }

    #[test]
    fn weapons_respect_cooldown_and_ammo() {
        let mut player = player();
        assert!(player.fire().is_some());
        assert!(player.fire().is_none());
        advance(&mut player, 150);
        assert!(player.fire().is_some());

        player.select_weapon(Weapon::SmokeScreen);
        assert!(player.fire().is_some());
        advance(&mut player, 1000);
        assert!(player.fire().is_some());
        advance(&mut player, 2000);
        assert!(player.fire().is_none());
        assert_eq!(player.ammo(Weapon::SmokeScreen), Some(0));
        assert!(player.is_invulnerable());
    }

    #[test]
    fn van_seat_locks_speed_and_restores_it() {
        let mut player = player();
        player.set_speed(320.0);
        player.enter_van(ActorId::new(9), 60.0);
        assert_eq!(player.speed(), 60.0);
        assert!(player.is_invulnerable());
        player.set_speed(400.0);
        assert_eq!(player.speed(), 60.0);
        assert!(player.fire().is_none());

        let left = player.leave_van(Vec2::new(240.0, 300.0), Duration::from_millis(2000));
        assert_eq!(left, Some(ActorId::new(9)));
        assert_eq!(player.speed(), 320.0);
        assert!(player.is_invulnerable());
        assert_eq!(player.leave_van(Vec2::ZERO, Duration::ZERO), None);
    }

    #[test]
    fn capped_ammo_never_shrinks() {
        let mut player = player();
        player.add_ammo(Weapon::Missile, 5, Some(10));
        assert_eq!(player.ammo(Weapon::Missile), Some(10));
        player.add_ammo(Weapon::Missile, 5, Some(10));
        assert_eq!(player.ammo(Weapon::Missile), Some(10));
        player.add_ammo(Weapon::MachineGun, 5, None);
        assert_eq!(player.ammo(Weapon::MachineGun), None);
    }

    #[test]
    fn distance_points_accrue_while_driving() {
        let mut player = player();
        player.tick(Duration::from_secs(2), Duration::from_secs(2), 10.0);
        assert_eq!(player.score(), 20);
    }
}
