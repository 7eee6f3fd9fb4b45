use std::time::Duration;

use glam::Vec2;
use road_rush_core::{PowerUpKind, Weapon};
use road_rush_world::Body;

/// Footprint of a pickup.
pub const PICKUP_SIZE: Vec2 = Vec2::new(24.0, 24.0);

/// Invulnerability granted by a shield pickup.
pub const SHIELD_DURATION: Duration = Duration::from_millis(5000);

/// Points granted by a score bonus pickup.
pub const SCORE_BONUS: i64 = 500;

/// Ammunition added by a weapon refill, per limited weapon.
pub const REFILL: [(Weapon, u32); 3] = [
    (Weapon::Missile, 3),
    (Weapon::OilSlick, 2),
    (Weapon::SmokeScreen, 1),
];

/// Chooses a pickup type from a uniform roll.
///
/// Refills are the common case; extra lives are rare.
#[must_use]
pub fn pick_power_up(roll: f32) -> PowerUpKind {
    if roll < 0.50 {
        PowerUpKind::WeaponRefill
    } else if roll < 0.70 {
        PowerUpKind::Shield
    } else if roll < 0.85 {
        PowerUpKind::SpeedBoost
    } else if roll < 0.95 {
        PowerUpKind::ScoreBonus
    } else {
        PowerUpKind::ExtraLife
    }
}

/// Floating text shown when a pickup is collected.
#[must_use]
pub const fn collect_text(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::WeaponRefill => "+AMMO",
        PowerUpKind::Shield => "SHIELD!",
        PowerUpKind::SpeedBoost => "SPEED!",
        PowerUpKind::ScoreBonus => "+500!",
        PowerUpKind::ExtraLife => "+1 LIFE!",
    }
}

/// Pickup drifting down the road.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    kind: PowerUpKind,
    body: Body,
    active: bool,
}

impl PowerUp {
    /// Places a pickup at `position`.
    #[must_use]
    pub fn spawn(kind: PowerUpKind, position: Vec2) -> Self {
        Self {
            kind,
            body: Body::new(position, PICKUP_SIZE),
            active: true,
        }
    }

    /// Pickup type.
    #[must_use]
    pub const fn kind(&self) -> PowerUpKind {
        self.kind
    }

    /// Footprint on the road.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Whether the pickup can still be collected.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Takes the pickup off the road, yielding its type the first time only.
    pub fn collect(&mut self) -> Option<PowerUpKind> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(self.kind)
    }

    pub(crate) fn drift(&mut self, dt: Duration, road_speed: f32, bottom: f32) {
        if !self.active {
            return;
        }
        self.body
            .translate(Vec2::new(0.0, road_speed * dt.as_secs_f32()));
        if self.body.position().y > bottom {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_follow_the_cumulative_table() {
        assert_eq!(pick_power_up(0.0), PowerUpKind::WeaponRefill);
        assert_eq!(pick_power_up(0.49), PowerUpKind::WeaponRefill);
        assert_eq!(pick_power_up(0.5), PowerUpKind::Shield);
        assert_eq!(pick_power_up(0.84), PowerUpKind::SpeedBoost);
        assert_eq!(pick_power_up(0.9), PowerUpKind::ScoreBonus);
        assert_eq!(pick_power_up(0.99), PowerUpKind::ExtraLife);
    }

    #[test]
    fn pickups_are_collected_once() {
        let mut pickup = PowerUp::spawn(PowerUpKind::Shield, Vec2::ZERO);
        assert_eq!(pickup.collect(), Some(PowerUpKind::Shield));
        assert_eq!(pickup.collect(), None);
    }
}
