//! Stat tables for ground archetypes and bosses.

use std::time::Duration;

use glam::Vec2;
use road_rush_core::{Archetype, BossKind, ScoringTuning};

/// Stats and AI parameters of a ground archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArchetypeProfile {
    /// Archetype the profile describes.
    pub archetype: Archetype,
    /// Health at spawn.
    pub health: i32,
    /// Kill reward as a multiple of the base kill points; ignored for civilians.
    pub points_factor: f32,
    /// Forward speed as a multiple of the base road speed.
    pub speed_factor: f32,
    /// Interval between lateral retargets, for archetypes that retarget.
    pub retarget: Option<Duration>,
    /// Lateral steering speed in pixels per second.
    pub lateral_speed: f32,
    /// Horizontal distance inside which the actor stops steering.
    pub dead_zone: f32,
    /// Interval between shots, for archetypes that shoot.
    pub shoot_cooldown: Option<Duration>,
    /// Collision footprint.
    pub size: Vec2,
}

impl ArchetypeProfile {
    /// Points awarded for destroying the archetype under the given scoring.
    #[must_use]
    pub fn points(&self, scoring: &ScoringTuning) -> i64 {
        if self.archetype.is_civilian() {
            -scoring.civilian_penalty
        } else {
            (scoring.enemy_kill_points as f64 * f64::from(self.points_factor)).round() as i64
        }
    }
}

const CAR: Vec2 = Vec2::new(36.0, 56.0);

const ARCHETYPES: [ArchetypeProfile; 7] = [
    ArchetypeProfile {
        archetype: Archetype::Civilian,
        health: 1,
        points_factor: 0.0,
        speed_factor: 0.8,
        retarget: None,
        lateral_speed: 30.0,
        dead_zone: 5.0,
        shoot_cooldown: None,
        size: CAR,
    },
    ArchetypeProfile {
        archetype: Archetype::Chaser,
        health: 2,
        points_factor: 1.0,
        speed_factor: 1.2,
        retarget: Some(Duration::from_millis(2000)),
        lateral_speed: 60.0,
        dead_zone: 15.0,
        shoot_cooldown: None,
        size: CAR,
    },
    ArchetypeProfile {
        archetype: Archetype::Motorcycle,
        health: 1,
        points_factor: 1.0,
        speed_factor: 1.4,
        retarget: Some(Duration::from_millis(1500)),
        lateral_speed: 80.0,
        dead_zone: 5.0,
        shoot_cooldown: None,
        size: CAR,
    },
    ArchetypeProfile {
        archetype: Archetype::Armored,
        health: 5,
        points_factor: 2.0,
        speed_factor: 1.0,
        retarget: Some(Duration::from_millis(3000)),
        lateral_speed: 40.0,
        dead_zone: 20.0,
        shoot_cooldown: None,
        size: Vec2::new(36.0 * 1.3, 56.0 * 1.3),
    },
    ArchetypeProfile {
        archetype: Archetype::Shooter,
        health: 2,
        points_factor: 1.5,
        speed_factor: 0.9,
        retarget: None,
        lateral_speed: 0.0,
        dead_zone: 0.0,
        shoot_cooldown: Some(Duration::from_millis(2000)),
        size: CAR,
    },
    ArchetypeProfile {
        archetype: Archetype::Blocker,
        health: 3,
        points_factor: 1.0,
        speed_factor: 0.6,
        retarget: Some(Duration::from_millis(1000)),
        lateral_speed: 100.0,
        dead_zone: 10.0,
        shoot_cooldown: None,
        size: Vec2::new(36.0 * 1.2, 56.0 * 1.2),
    },
    ArchetypeProfile {
        archetype: Archetype::Rammer,
        health: 3,
        points_factor: 1.5,
        speed_factor: 1.1,
        retarget: Some(Duration::from_millis(1200)),
        lateral_speed: 120.0,
        dead_zone: 8.0,
        shoot_cooldown: None,
        size: Vec2::new(36.0 * 1.1, 56.0 * 1.1),
    },
];

/// Profile of a ground archetype.
#[must_use]
pub fn archetype(archetype: Archetype) -> &'static ArchetypeProfile {
    let index = match archetype {
        Archetype::Civilian => 0,
        Archetype::Chaser => 1,
        Archetype::Motorcycle => 2,
        Archetype::Armored => 3,
        Archetype::Shooter => 4,
        Archetype::Blocker => 5,
        Archetype::Rammer => 6,
    };
    &ARCHETYPES[index]
}

/// Stats of a boss archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossProfile {
    /// Boss the profile describes.
    pub kind: BossKind,
    /// Health at spawn.
    pub health: i32,
    /// Points awarded on defeat.
    pub points: i64,
    /// Forward speed as a multiple of the base road speed.
    pub speed_factor: f32,
    /// Damage dealt to the player on contact.
    pub contact_damage: u32,
    /// Whether the boss fires aimed projectiles.
    pub can_shoot: bool,
    /// Attack interval in phase one; later phases divide it by the phase number.
    pub attack_cooldown: Duration,
    /// Collision footprint.
    pub size: Vec2,
}

const BOSSES: [BossProfile; 4] = [
    BossProfile {
        kind: BossKind::ArmoredTruck,
        health: 12,
        points: 500,
        speed_factor: 0.9,
        contact_damage: 25,
        can_shoot: false,
        attack_cooldown: Duration::from_millis(2000),
        size: Vec2::new(40.0 * 1.5, 60.0 * 1.5),
    },
    BossProfile {
        kind: BossKind::WeaponVan,
        health: 10,
        points: 750,
        speed_factor: 0.85,
        contact_damage: 20,
        can_shoot: true,
        attack_cooldown: Duration::from_millis(1800),
        size: Vec2::new(40.0 * 1.4, 60.0 * 1.4),
    },
    BossProfile {
        kind: BossKind::Tank,
        health: 18,
        points: 1000,
        speed_factor: 0.7,
        contact_damage: 35,
        can_shoot: true,
        attack_cooldown: Duration::from_millis(2500),
        size: Vec2::new(40.0 * 1.8, 60.0 * 1.8),
    },
    BossProfile {
        kind: BossKind::AttackChopper,
        health: 15,
        points: 1500,
        speed_factor: 0.5,
        contact_damage: 30,
        can_shoot: true,
        attack_cooldown: Duration::from_millis(1200),
        size: Vec2::new(40.0 * 1.6, 60.0 * 1.6),
    },
];

/// Profile of a boss archetype.
#[must_use]
pub fn boss(kind: BossKind) -> &'static BossProfile {
    let index = match kind {
        BossKind::ArmoredTruck => 0,
        BossKind::WeaponVan => 1,
        BossKind::Tank => 2,
        BossKind::AttackChopper => 3,
    };
    &BOSSES[index]
}
