//! Tunable parameters for a run, loadable from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RoadLayout;

/// Errors raised when a tuning configuration cannot drive a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The viewport has a zero or negative dimension.
    #[error("viewport must have positive dimensions, got {width}x{height}")]
    InvalidViewport {
        /// Configured viewport width.
        width: f32,
        /// Configured viewport height.
        height: f32,
    },
    /// The road was configured without lanes.
    #[error("road must contain at least one lane")]
    NoLanes,
    /// The lane grid extends past the right edge of the viewport.
    #[error("{lanes} lanes of width {lane_width} starting at {margin} overflow a {width} wide viewport")]
    LanesOverflow {
        /// Configured lane count.
        lanes: u32,
        /// Configured lane width.
        lane_width: f32,
        /// Configured distance from the viewport edge to the first lane.
        margin: f32,
        /// Configured viewport width.
        width: f32,
    },
    /// A timer interval was configured as zero.
    #[error("{name} must be greater than zero")]
    ZeroInterval {
        /// Name of the offending setting.
        name: &'static str,
    },
    /// The player speed range is empty.
    #[error("player speed range {min}..{max} is empty")]
    InvalidSpeedRange {
        /// Configured minimum speed.
        min: f32,
        /// Configured maximum speed.
        max: f32,
    },
    /// The player would start without lives or health.
    #[error("player must start with at least one life and positive health")]
    NoLives,
    /// A vehicle or wave cap was configured as zero.
    #[error("{name} must allow at least one vehicle")]
    EmptyCap {
        /// Name of the offending setting.
        name: &'static str,
    },
    /// A spawn table contains no usable entries.
    #[error("spawn table must contain at least one rule with a threshold in 0..=1")]
    EmptySpawnTable,
}

/// Enemy archetype tables shipped with the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnTableRevision {
    /// Armored, Shooter, Blocker, Chaser with a Motorcycle fallback.
    #[default]
    Classic,
    /// Classic table with the Rammer unlocked from level three.
    Rammer,
}

/// Complete set of tunables for a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningConfig {
    /// Seed for the deterministic random number generator.
    pub seed: u64,
    /// Viewport and lane grid.
    pub road: RoadTuning,
    /// Player health, lives and speed limits.
    pub player: PlayerTuning,
    /// Weapon cadence, projectile speeds and starting ammunition.
    pub weapons: WeaponTuning,
    /// Spawn rates and caps.
    pub traffic: TrafficTuning,
    /// Point values.
    pub scoring: ScoringTuning,
}

impl TuningConfig {
    /// Checks that the configuration can drive a simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.road.validate()?;
        self.player.validate()?;
        self.weapons.validate()?;
        self.traffic.validate()
    }
}

/// Viewport and lane grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadTuning {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Number of lanes.
    pub lanes: u32,
    /// Width of every lane in pixels.
    pub lane_width: f32,
    /// Distance from the left viewport edge to the first lane.
    pub margin: f32,
    /// Road speed every actor speed multiplier is relative to.
    pub base_speed: f32,
}

impl RoadTuning {
    /// Lane grid described by these settings.
    #[must_use]
    pub fn layout(&self) -> RoadLayout {
        RoadLayout::new(
            self.width,
            self.height,
            self.lanes,
            self.lane_width,
            self.margin,
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.margin < 0.0
            || self.lane_width <= 0.0
            || self.margin + self.lanes as f32 * self.lane_width > self.width
        {
            return Err(ConfigError::LanesOverflow {
                lanes: self.lanes,
                lane_width: self.lane_width,
                margin: self.margin,
                width: self.width,
            });
        }
        Ok(())
    }
}

impl Default for RoadTuning {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            lanes: 5,
            lane_width: 80.0,
            margin: 40.0,
            base_speed: 200.0,
        }
    }
}

/// Player survivability and speed limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerTuning {
    /// Health restored on every new life.
    pub starting_health: i32,
    /// Lives at the start of a run.
    pub starting_lives: u32,
    /// Slowest allowed speed.
    pub min_speed: f32,
    /// Fastest allowed speed.
    pub max_speed: f32,
    /// Grace period after taking damage, in milliseconds.
    pub damage_invulnerability_ms: u64,
    /// Grace period after respawning, in milliseconds.
    pub respawn_invulnerability_ms: u64,
}

impl PlayerTuning {
    /// Grace period after taking damage.
    #[must_use]
    pub fn damage_invulnerability(&self) -> Duration {
        Duration::from_millis(self.damage_invulnerability_ms)
    }

    /// Grace period after respawning.
    #[must_use]
    pub fn respawn_invulnerability(&self) -> Duration {
        Duration::from_millis(self.respawn_invulnerability_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 || self.starting_health <= 0 {
            return Err(ConfigError::NoLives);
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        Ok(())
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            starting_health: 100,
            starting_lives: 3,
            min_speed: 100.0,
            max_speed: 400.0,
            damage_invulnerability_ms: 1000,
            respawn_invulnerability_ms: 2000,
        }
    }
}

/// Weapon cadence, projectile speeds and starting ammunition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeaponTuning {
    /// Minimum time between machine gun shots, in milliseconds.
    pub machine_gun_interval_ms: u64,
    /// Minimum time between missiles, oil slicks and smoke screens, in milliseconds.
    pub heavy_interval_ms: u64,
    /// Bullet speed in pixels per second.
    pub bullet_speed: f32,
    /// Missile speed in pixels per second.
    pub missile_speed: f32,
    /// Missiles carried at the start of a run.
    pub starting_missiles: u32,
    /// Oil slicks carried at the start of a run.
    pub starting_oil: u32,
    /// Smoke screens carried at the start of a run.
    pub starting_smoke: u32,
    /// Lifetime of a dropped oil slick, in milliseconds.
    pub oil_lifetime_ms: u64,
    /// Invulnerability granted by a smoke screen, in milliseconds.
    pub smoke_duration_ms: u64,
}

impl WeaponTuning {
    /// Minimum time between machine gun shots.
    #[must_use]
    pub fn machine_gun_interval(&self) -> Duration {
        Duration::from_millis(self.machine_gun_interval_ms)
    }

    /// Minimum time between shots of the limited weapons.
    #[must_use]
    pub fn heavy_interval(&self) -> Duration {
        Duration::from_millis(self.heavy_interval_ms)
    }

    /// Lifetime of a dropped oil slick.
    #[must_use]
    pub fn oil_lifetime(&self) -> Duration {
        Duration::from_millis(self.oil_lifetime_ms)
    }

    /// Invulnerability granted by a smoke screen.
    #[must_use]
    pub fn smoke_duration(&self) -> Duration {
        Duration::from_millis(self.smoke_duration_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.machine_gun_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "weapons.machine_gun_interval_ms",
            });
        }
        if self.heavy_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "weapons.heavy_interval_ms",
            });
        }
        Ok(())
    }
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            machine_gun_interval_ms: 150,
            heavy_interval_ms: 500,
            bullet_speed: 500.0,
            missile_speed: 350.0,
            starting_missiles: 5,
            starting_oil: 3,
            starting_smoke: 2,
            oil_lifetime_ms: 5000,
            smoke_duration_ms: 3000,
        }
    }
}

/// Spawn rates, caps and encounter cooldowns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrafficTuning {
    /// Delay before the first spawn, in milliseconds.
    pub start_delay_ms: u64,
    /// Enemy rate the wave cooldown is derived from, in milliseconds.
    pub enemy_spawn_rate_ms: u64,
    /// Interval between civilian spawn attempts, in milliseconds.
    pub civilian_spawn_rate_ms: u64,
    /// Cap on concurrently active ground vehicles.
    pub max_vehicles: u32,
    /// Cap on enemies spawned by one wave.
    pub max_enemies_per_wave: u32,
    /// Delay between enemies of the same wave, in milliseconds.
    pub wave_enemy_interval_ms: u64,
    /// Whether the helicopter may appear from the start.
    pub helicopter_enabled: bool,
    /// Time that must accumulate between helicopters, in milliseconds.
    pub helicopter_cooldown_ms: u64,
    /// Whether the weapons van may appear.
    pub weapons_van_enabled: bool,
    /// Time that must accumulate between weapons vans, in milliseconds.
    pub weapons_van_cooldown_ms: u64,
    /// Interval of the periodic difficulty bump, in milliseconds.
    pub difficulty_interval_ms: u64,
    /// Whether civilians also avoid the player's lane when spawning.
    pub civilians_avoid_player_lane: bool,
    /// Enemy archetype table used for wave spawns.
    pub spawn_table: SpawnTableRevision,
}

impl TrafficTuning {
    /// Delay before the first spawn.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Enemy rate the wave cooldown is derived from.
    #[must_use]
    pub fn enemy_spawn_rate(&self) -> Duration {
        Duration::from_millis(self.enemy_spawn_rate_ms)
    }

    /// Interval between civilian spawn attempts.
    #[must_use]
    pub fn civilian_spawn_rate(&self) -> Duration {
        Duration::from_millis(self.civilian_spawn_rate_ms)
    }

    /// Delay between enemies of the same wave.
    #[must_use]
    pub fn wave_enemy_interval(&self) -> Duration {
        Duration::from_millis(self.wave_enemy_interval_ms)
    }

    /// Time that must accumulate between helicopters.
    #[must_use]
    pub fn helicopter_cooldown(&self) -> Duration {
        Duration::from_millis(self.helicopter_cooldown_ms)
    }

    /// Time that must accumulate between weapons vans.
    #[must_use]
    pub fn weapons_van_cooldown(&self) -> Duration {
        Duration::from_millis(self.weapons_van_cooldown_ms)
    }

    /// Interval of the periodic difficulty bump.
    #[must_use]
    pub fn difficulty_interval(&self) -> Duration {
        Duration::from_millis(self.difficulty_interval_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("traffic.enemy_spawn_rate_ms", self.enemy_spawn_rate_ms),
            ("traffic.civilian_spawn_rate_ms", self.civilian_spawn_rate_ms),
            ("traffic.wave_enemy_interval_ms", self.wave_enemy_interval_ms),
            ("traffic.helicopter_cooldown_ms", self.helicopter_cooldown_ms),
            ("traffic.weapons_van_cooldown_ms", self.weapons_van_cooldown_ms),
            ("traffic.difficulty_interval_ms", self.difficulty_interval_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroInterval { name: *name });
        }
        if self.max_vehicles == 0 {
            return Err(ConfigError::EmptyCap {
                name: "traffic.max_vehicles",
            });
        }
        if self.max_enemies_per_wave == 0 {
            return Err(ConfigError::EmptyCap {
                name: "traffic.max_enemies_per_wave",
            });
        }
        Ok(())
    }
}

impl Default for TrafficTuning {
    fn default() -> Self {
        Self {
            start_delay_ms: 2000,
            enemy_spawn_rate_ms: 5000,
            civilian_spawn_rate_ms: 4000,
            max_vehicles: 4,
            max_enemies_per_wave: 2,
            wave_enemy_interval_ms: 1500,
            helicopter_enabled: false,
            helicopter_cooldown_ms: 20_000,
            weapons_van_enabled: true,
            weapons_van_cooldown_ms: 25_000,
            difficulty_interval_ms: 30_000,
            civilians_avoid_player_lane: false,
            spawn_table: SpawnTableRevision::Classic,
        }
    }
}

/// Point values for kills, penalties and distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringTuning {
    /// Base points for destroying an enemy; archetypes scale this value.
    pub enemy_kill_points: i64,
    /// Points deducted for destroying a civilian.
    pub civilian_penalty: i64,
    /// Points accrued per second of driving.
    pub distance_points_per_second: f64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            enemy_kill_points: 100,
            civilian_penalty: 50,
            distance_points_per_second: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TuningConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: TuningConfig = toml::from_str(
            r#"
            seed = 7

            [traffic]
            max_vehicles = 6
            spawn_table = "rammer"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.seed, 7);
        assert_eq!(config.traffic.max_vehicles, 6);
        assert_eq!(config.traffic.spawn_table, SpawnTableRevision::Rammer);
        assert_eq!(config.traffic.civilian_spawn_rate_ms, 4000);
        assert_eq!(config.road, RoadTuning::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<TuningConfig, _> = toml::from_str("[road]\nlanez = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn lanes_must_fit_the_viewport() {
        let mut config = TuningConfig::default();
        config.road.lanes = 6;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LanesOverflow { lanes: 6, .. })
        ));
    }

    #[test]
    fn zero_intervals_name_the_setting() {
        let mut config = TuningConfig::default();
        config.traffic.civilian_spawn_rate_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroInterval {
                name: "traffic.civilian_spawn_rate_ms"
            })
        );
    }

    #[test]
    fn empty_speed_range_is_rejected() {
        let mut config = TuningConfig::default();
        config.player.min_speed = 500.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeedRange { .. })
        ));
    }
}
