//! Campaign level table and the endless-mode baseline.

use std::time::Duration;

use road_rush_core::{BossKind, Command, Theme};

/// Traffic settings, palette and boss of one campaign level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelRecord {
    /// One-based level number; zero for the endless baseline.
    pub number: u32,
    /// Display name.
    pub name: &'static str,
    /// Short tagline shown under the name.
    pub description: &'static str,
    /// Road palette.
    pub theme: Theme,
    /// Enemy rate the wave cooldown is derived from.
    pub enemy_spawn_rate: Duration,
    /// Interval between civilian spawn attempts.
    pub civilian_spawn_rate: Duration,
    /// Cap on concurrently active ground vehicles.
    pub max_vehicles: u32,
    /// Cap on enemies per wave.
    pub max_enemies_per_wave: u32,
    /// Whether the helicopter may appear.
    pub helicopter_enabled: bool,
    /// Boss fought when leaving the level.
    pub boss: Option<BossKind>,
    /// Score at which the level is entered.
    pub score_threshold: i64,
}

impl LevelRecord {
    /// Commands that retune traffic to this level.
    pub fn traffic_commands(&self, out: &mut Vec<Command>) {
        out.push(Command::SetSpawnRates {
            enemy: self.enemy_spawn_rate,
            civilian: self.civilian_spawn_rate,
        });
        out.push(Command::SetHelicopterEnabled {
            enabled: self.helicopter_enabled,
        });
        out.push(Command::SetMaxVehicles {
            max: self.max_vehicles,
        });
        out.push(Command::SetMaxWaveSize {
            max: self.max_enemies_per_wave,
        });
    }
}

const fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// The five campaign levels in play order.
pub static LEVELS: [LevelRecord; 5] = [
    LevelRecord {
        number: 1,
        name: "HIGHWAY",
        description: "Easy Drive",
        theme: Theme::new(0x33_33_33, 0x2d_5a_27, 0xff_ff_00),
        enemy_spawn_rate: ms(6000),
        civilian_spawn_rate: ms(4500),
        max_vehicles: 3,
        max_enemies_per_wave: 2,
        helicopter_enabled: false,
        boss: None,
        score_threshold: 0,
    },
    LevelRecord {
        number: 2,
        name: "CITY STREETS",
        description: "More Traffic",
        theme: Theme::new(0x44_44_44, 0x1a_3d_1a, 0xff_ff_ff),
        enemy_spawn_rate: ms(5500),
        civilian_spawn_rate: ms(4000),
        max_vehicles: 4,
        max_enemies_per_wave: 2,
        helicopter_enabled: false,
        boss: Some(BossKind::ArmoredTruck),
        score_threshold: 750,
    },
    LevelRecord {
        number: 3,
        name: "DESERT ROAD",
        description: "Helicopter Incoming",
        theme: Theme::new(0x8b_73_55, 0xc2_b2_80, 0xff_ff_ff),
        enemy_spawn_rate: ms(5000),
        civilian_spawn_rate: ms(3800),
        max_vehicles: 4,
        max_enemies_per_wave: 3,
        helicopter_enabled: true,
        boss: Some(BossKind::WeaponVan),
        score_threshold: 2000,
    },
    LevelRecord {
        number: 4,
        name: "MOUNTAIN PASS",
        description: "Enemy Territory",
        theme: Theme::new(0x55_55_55, 0x4a_7c_4e, 0xff_ff_00),
        enemy_spawn_rate: ms(4500),
        civilian_spawn_rate: ms(3500),
        max_vehicles: 5,
        max_enemies_per_wave: 3,
        helicopter_enabled: true,
        boss: Some(BossKind::Tank),
        score_threshold: 4000,
    },
    LevelRecord {
        number: 5,
        name: "NIGHT MISSION",
        description: "Final Challenge",
        theme: Theme::new(0x1a_1a_1a, 0x0d_1a_0d, 0x88_88_88),
        enemy_spawn_rate: ms(4000),
        civilian_spawn_rate: ms(3000),
        max_vehicles: 5,
        max_enemies_per_wave: 4,
        helicopter_enabled: true,
        boss: Some(BossKind::AttackChopper),
        score_threshold: 6500,
    },
];

/// Score at which the boss of the final level appears.
pub const FINALE_THRESHOLD: i64 = 9000;

/// Settings an endless run starts from.
pub static ENDLESS: LevelRecord = LevelRecord {
    number: 0,
    name: "ENDLESS ARCADE",
    description: "Survive as long as you can!",
    theme: Theme::new(0x33_33_33, 0x2d_5a_27, 0xff_ff_00),
    enemy_spawn_rate: ms(5000),
    civilian_spawn_rate: ms(4000),
    max_vehicles: 4,
    max_enemies_per_wave: 2,
    helicopter_enabled: false,
    boss: None,
    score_threshold: 0,
};

/// Palette of the campaign level at `index`, wrapping around the table.
#[must_use]
pub fn palette(index: usize) -> Theme {
    LEVELS[index % LEVELS.len()].theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_increase_through_the_campaign() {
        assert!(LEVELS
            .windows(2)
            .all(|pair| pair[0].score_threshold < pair[1].score_threshold));
        assert!(LEVELS[0].boss.is_none());
        assert!(LEVELS[1..].iter().all(|level| level.boss.is_some()));
    }

    #[test]
    fn level_commands_cover_every_traffic_setting() {
        let mut commands = Vec::new();
        LEVELS[2].traffic_commands(&mut commands);
        assert_eq!(
            commands,
            vec![
                Command::SetSpawnRates {
                    enemy: ms(5000),
                    civilian: ms(3800),
                },
                Command::SetHelicopterEnabled { enabled: true },
                Command::SetMaxVehicles { max: 4 },
                Command::SetMaxWaveSize { max: 3 },
            ]
        );
    }

    #[test]
    fn palettes_wrap_around() {
        assert_eq!(palette(5), LEVELS[0].theme);
        assert_eq!(palette(9), LEVELS[4].theme);
    }
}
