//! Projectile pools for the player and for shooting actors.

use std::time::Duration;

use glam::Vec2;
use road_rush_core::{RoadLayout, Weapon};

use crate::Body;

/// A single projectile slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    body: Body,
    active: bool,
    expires_at: Option<Duration>,
}

impl Projectile {
    /// Body of the projectile.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Reports whether the projectile is still in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the slot to its pool.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.body.set_velocity(Vec2::ZERO);
    }
}

/// Group of projectiles sharing a size and an optional pool limit.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileGroup {
    items: Vec<Projectile>,
    capacity: Option<usize>,
    size: Vec2,
}

impl ProjectileGroup {
    /// Creates a group that grows on demand.
    #[must_use]
    pub fn unbounded(size: Vec2) -> Self {
        Self {
            items: Vec::new(),
            capacity: None,
            size,
        }
    }

    /// Creates a group that never holds more than `capacity` projectiles.
    #[must_use]
    pub fn pooled(capacity: usize, size: Vec2) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity: Some(capacity),
            size,
        }
    }

    /// Launches a projectile, reusing an inactive slot when possible.
    ///
    /// Returns `false` when the pool is exhausted.
    pub fn fire(&mut self, origin: Vec2, velocity: Vec2, expires_at: Option<Duration>) -> bool {
        let mut body = Body::new(origin, self.size);
        body.set_velocity(velocity);
        let projectile = Projectile {
            body,
            active: true,
            expires_at,
        };

        if let Some(slot) = self.items.iter_mut().find(|slot| !slot.active) {
            *slot = projectile;
            return true;
        }
        if self
            .capacity
            .is_some_and(|capacity| self.items.len() >= capacity)
        {
            return false;
        }
        self.items.push(projectile);
        true
    }

    /// Moves every projectile in flight.
    pub fn integrate(&mut self, dt: Duration) {
        for projectile in self.items.iter_mut().filter(|p| p.active) {
            projectile.body.integrate(dt);
        }
    }

    /// Overrides the vertical velocity of every projectile in flight.
    pub fn set_velocity_y(&mut self, vy: f32) {
        for projectile in self.items.iter_mut().filter(|p| p.active) {
            projectile.body.set_velocity_y(vy);
        }
    }

    /// Iterator over projectiles in flight.
    pub fn iter_active(&self) -> impl Iterator<Item = &Projectile> {
        self.items.iter().filter(|projectile| projectile.active)
    }

    /// Mutable iterator over projectiles in flight.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.items.iter_mut().filter(|projectile| projectile.active)
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// Deactivates every projectile whose position matches `predicate`.
    pub fn cull(&mut self, predicate: impl Fn(Vec2) -> bool) -> usize {
        let mut culled = 0;
        for projectile in self.iter_active_mut() {
            if predicate(projectile.body.position()) {
                projectile.deactivate();
                culled += 1;
            }
        }
        culled
    }

    /// Deactivates every projectile further than `margin` outside the viewport.
    pub fn cull_outside(&mut self, layout: &RoadLayout, margin: f32) -> usize {
        let (width, height) = (layout.width(), layout.height());
        self.cull(|p| p.x < -margin || p.x > width + margin || p.y < -margin || p.y > height + margin)
    }

    /// Deactivates every projectile whose lifetime ended at or before `now`.
    pub fn expire(&mut self, now: Duration) -> usize {
        let mut expired = 0;
        for projectile in self.iter_active_mut() {
            if projectile.expires_at.is_some_and(|at| at <= now) {
                projectile.deactivate();
                expired += 1;
            }
        }
        expired
    }

    /// Releases every slot.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Projectile pools fed by the player's weapons.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerShots {
    bullets: ProjectileGroup,
    missiles: ProjectileGroup,
    oil_slicks: ProjectileGroup,
}

impl Default for PlayerShots {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerShots {
    /// Creates empty pools sized for the player's weapons.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bullets: ProjectileGroup::pooled(20, Vec2::new(4.0, 10.0)),
            missiles: ProjectileGroup::pooled(5, Vec2::new(8.0, 16.0)),
            oil_slicks: ProjectileGroup::pooled(10, Vec2::new(30.0, 30.0)),
        }
    }

    /// Pool backing a projectile weapon; smoke screens have none.
    #[must_use]
    pub fn group(&self, weapon: Weapon) -> Option<&ProjectileGroup> {
        match weapon {
            Weapon::MachineGun => Some(&self.bullets),
            Weapon::Missile => Some(&self.missiles),
            Weapon::OilSlick => Some(&self.oil_slicks),
            Weapon::SmokeScreen => None,
        }
    }

    /// Mutable pool backing a projectile weapon.
    pub fn group_mut(&mut self, weapon: Weapon) -> Option<&mut ProjectileGroup> {
        match weapon {
            Weapon::MachineGun => Some(&mut self.bullets),
            Weapon::Missile => Some(&mut self.missiles),
            Weapon::OilSlick => Some(&mut self.oil_slicks),
            Weapon::SmokeScreen => None,
        }
    }

    /// Moves every shot, carries oil with the road and drops spent shots.
    pub fn update(&mut self, dt: Duration, now: Duration, road_speed: f32, layout: &RoadLayout) {
        self.oil_slicks.set_velocity_y(road_speed);
        self.bullets.integrate(dt);
        self.missiles.integrate(dt);
        self.oil_slicks.integrate(dt);

        let _ = self.bullets.cull(|p| p.y < -20.0);
        let _ = self.missiles.cull(|p| p.y < -20.0);
        let height = layout.height();
        let _ = self.oil_slicks.cull(|p| p.y > height + 50.0);
        let _ = self.oil_slicks.expire(now);
    }

    /// Releases every shot.
    pub fn clear(&mut self) {
        self.bullets.clear();
        self.missiles.clear();
        self.oil_slicks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_group_refuses_past_capacity() {
        let mut group = ProjectileGroup::pooled(2, Vec2::splat(4.0));
        assert!(group.fire(Vec2::ZERO, Vec2::ZERO, None));
        assert!(group.fire(Vec2::ZERO, Vec2::ZERO, None));
        assert!(!group.fire(Vec2::ZERO, Vec2::ZERO, None));

        if let Some(first) = group.iter_active_mut().next() {
            first.deactivate();
        }
        assert!(group.fire(Vec2::ZERO, Vec2::ZERO, None));
        assert_eq!(group.active_count(), 2);
    }

    #[test]
    fn expired_projectiles_are_released() {
        let mut group = ProjectileGroup::unbounded(Vec2::splat(4.0));
        assert!(group.fire(Vec2::ZERO, Vec2::ZERO, Some(Duration::from_secs(5))));
        assert_eq!(group.expire(Duration::from_secs(4)), 0);
        assert_eq!(group.expire(Duration::from_secs(5)), 1);
        assert_eq!(group.active_count(), 0);
    }

    #[test]
    fn bullets_leave_through_the_top() {
        let layout = RoadLayout::default();
        let mut shots = PlayerShots::new();
        let bullets = shots.group_mut(Weapon::MachineGun).expect("bullet pool");
        assert!(bullets.fire(Vec2::new(240.0, 0.0), Vec2::new(0.0, -500.0), None));

        shots.update(Duration::from_millis(100), Duration::ZERO, 200.0, &layout);
        assert_eq!(shots.group(Weapon::MachineGun).map(ProjectileGroup::active_count), Some(0));
    }

    #[test]
    fn oil_slicks_drift_with_the_road() {
        let layout = RoadLayout::default();
        let mut shots = PlayerShots::new();
        let oil = shots.group_mut(Weapon::OilSlick).expect("oil pool");
        assert!(oil.fire(Vec2::new(240.0, 500.0), Vec2::ZERO, None));

        shots.update(Duration::from_secs(1), Duration::ZERO, 100.0, &layout);
        let y = shots
            .group(Weapon::OilSlick)
            .and_then(|group| group.iter_active().next())
            .map(|slick| slick.body().position().y);
        assert_eq!(y, Some(600.0));
    }
}
