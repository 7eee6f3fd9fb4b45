//! Time-driven difficulty of endless mode.
//!
//! Tier and palette are pure functions of elapsed time so they can be
//! recomputed from scratch at any point of a run.

use std::time::Duration;

use road_rush_core::{Command, Theme};

use crate::levels;

/// Elapsed time per difficulty tier.
pub const TIER_INTERVAL: Duration = Duration::from_millis(45_000);
/// Elapsed time per palette rotation.
pub const THEME_INTERVAL: Duration = Duration::from_millis(60_000);

/// One-based difficulty tier after `elapsed` time.
#[must_use]
pub fn tier_for(elapsed: Duration) -> u32 {
    let tier = elapsed.as_millis() / TIER_INTERVAL.as_millis() + 1;
    u32::try_from(tier).unwrap_or(u32::MAX)
}

/// Number of palette rotations after `elapsed` time.
#[must_use]
pub fn rotation_for(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis() / THEME_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}

/// Index into the campaign palettes after `elapsed` time.
#[must_use]
pub fn theme_index_for(elapsed: Duration) -> usize {
    (rotation_for(elapsed) % levels::LEVELS.len() as u64) as usize
}

/// Palette after `elapsed` time.
#[must_use]
pub fn theme_for(elapsed: Duration) -> Theme {
    levels::palette(theme_index_for(elapsed))
}

/// Traffic settings for an endless tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierSettings {
    /// Enemy rate the wave cooldown is derived from.
    pub enemy_spawn_rate: Duration,
    /// Interval between civilian spawn attempts.
    pub civilian_spawn_rate: Duration,
    /// Cap on concurrently active ground vehicles.
    pub max_vehicles: u32,
    /// Cap on enemies per wave.
    pub max_enemies_per_wave: u32,
    /// Helicopter cooldown once helicopters are unlocked.
    pub helicopter_cooldown: Option<Duration>,
    /// Weapons van cooldown.
    pub van_cooldown: Duration,
}

impl TierSettings {
    /// Commands that retune traffic to this tier.
    pub fn traffic_commands(&self, out: &mut Vec<Command>) {
        out.push(Command::SetSpawnRates {
            enemy: self.enemy_spawn_rate,
            civilian: self.civilian_spawn_rate,
        });
        out.push(Command::SetMaxVehicles {
            max: self.max_vehicles,
        });
        out.push(Command::SetMaxWaveSize {
            max: self.max_enemies_per_wave,
        });
        if let Some(cooldown) = self.helicopter_cooldown {
            out.push(Command::SetHelicopterEnabled { enabled: true });
            out.push(Command::SetHelicopterCooldown { cooldown });
        }
        out.push(Command::SetWeaponsVanCooldown {
            cooldown: self.van_cooldown,
        });
    }
}

fn floored(base: u64, step: u64, tier: u32, floor: u64) -> Duration {
    let value = base.saturating_sub(step.saturating_mul(u64::from(tier)));
    Duration::from_millis(value.max(floor))
}

/// Traffic settings for `tier`.
#[must_use]
pub fn tier_settings(tier: u32) -> TierSettings {
    TierSettings {
        enemy_spawn_rate: floored(5000, 300, tier, 3000),
        civilian_spawn_rate: floored(4000, 200, tier, 2500),
        max_vehicles: (4 + tier / 2).min(6),
        max_enemies_per_wave: (2 + tier / 3).min(4),
        helicopter_cooldown: (tier >= 2).then(|| floored(20_000, 1500, tier, 12_000)),
        van_cooldown: floored(25_000, 2000, tier, 15_000),
    }
}
