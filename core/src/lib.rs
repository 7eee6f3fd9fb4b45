#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Road Rush encounter director.
//!
//! This crate defines the message surface that connects adapters, the
//! director, and the per-concern systems. Adapters submit [`Command`] values
//! describing desired mutations or the passage of time, the director executes
//! them through its `apply` entry point, and then reports [`Event`] values so
//! adapters can react deterministically. Systems never talk to each other
//! directly; tuning flows between them exclusively as new commands.

mod config;
mod effects;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, PlayerTuning, RoadTuning, ScoringTuning, SpawnTableRevision, TrafficTuning,
    TuningConfig, WeaponTuning,
};
pub use effects::{Cue, Effect, EffectLog, EffectSink, NullEffects, TextTone};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Road Rush.";

/// Selects how the run progresses once it has started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Five handcrafted levels separated by boss fights.
    Campaign,
    /// Open-ended run whose difficulty tier grows with elapsed time.
    Endless,
}

/// Commands that express all permissible mutations of a running encounter.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player car to the provided position.
    PlacePlayer {
        /// Requested centre of the player car in road coordinates.
        position: Vec2,
    },
    /// Changes the player's forward speed, which doubles as the road speed.
    SetPlayerSpeed {
        /// Requested speed in pixels per second.
        speed: f32,
    },
    /// Fires the currently selected weapon if it is ready.
    FireWeapon,
    /// Cycles the selected weapon to the next one in the rack.
    SwitchWeapon,
    /// Selects a specific weapon.
    SelectWeapon {
        /// Weapon that should become active.
        weapon: Weapon,
    },
    /// Updates the enemy wave and civilian spawn intervals.
    SetSpawnRates {
        /// Interval driving the enemy wave cooldown.
        enemy: Duration,
        /// Interval between civilian spawn attempts.
        civilian: Duration,
    },
    /// Updates only the civilian spawn interval.
    SetCivilianRate {
        /// Interval between civilian spawn attempts.
        civilian: Duration,
    },
    /// Toggles whether the helicopter may appear.
    SetHelicopterEnabled {
        /// Whether helicopter spawning is allowed.
        enabled: bool,
    },
    /// Updates the time that must accumulate between helicopter spawns.
    SetHelicopterCooldown {
        /// Minimum time between helicopter appearances.
        cooldown: Duration,
    },
    /// Updates the time that must accumulate between weapons van spawns.
    SetWeaponsVanCooldown {
        /// Minimum time between weapons van appearances.
        cooldown: Duration,
    },
    /// Updates the cap on concurrently active ground vehicles.
    SetMaxVehicles {
        /// Maximum number of active ground vehicles.
        max: u32,
    },
    /// Updates the cap on enemies spawned by a single wave.
    SetMaxWaveSize {
        /// Maximum number of enemies per wave.
        max: u32,
    },
    /// Nudges every traffic rate one step toward harder play.
    IncreaseDifficulty,
    /// Removes every regular ground vehicle from the road.
    ClearTraffic,
    /// Cancels all pending timers and releases every actor.
    Teardown,
}

/// Events broadcast by the director after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor entered the road.
    ActorSpawned {
        /// Identifier assigned to the actor.
        actor: ActorId,
        /// Kind of actor that appeared.
        kind: ActorKind,
        /// Lane the actor was placed in, when it spawned in one.
        lane: Option<Lane>,
    },
    /// Confirms that an actor left play.
    ActorRemoved {
        /// Identifier of the actor that was removed.
        actor: ActorId,
        /// Kind of actor that was removed.
        kind: ActorKind,
        /// Reason the actor left play.
        cause: RemovalCause,
    },
    /// Announces that a wave of enemies started spawning.
    WaveStarted {
        /// One-based ordinal of the wave within the run.
        wave: u32,
    },
    /// Announces that a wave stopped spawning enemies.
    WaveEnded {
        /// One-based ordinal of the wave within the run.
        wave: u32,
        /// Number of enemies the wave placed on the road.
        spawned: u32,
    },
    /// Announces that a boss entered the road.
    BossSpawned {
        /// Identifier assigned to the boss.
        actor: ActorId,
        /// Boss archetype that appeared.
        kind: BossKind,
    },
    /// Reports that a boss entered a harder phase.
    BossPhaseChanged {
        /// Boss archetype whose phase changed.
        kind: BossKind,
        /// Phase the boss entered.
        phase: BossPhase,
    },
    /// Reports that a boss was destroyed by the player.
    BossDefeated {
        /// Identifier of the defeated boss.
        actor: ActorId,
        /// Boss archetype that was defeated.
        kind: BossKind,
        /// Points awarded for the kill.
        points: i64,
    },
    /// Announces that the campaign moved on to a new level.
    LevelAdvanced {
        /// One-based number of the level that became active.
        level: u32,
        /// Display name of the level.
        name: &'static str,
        /// Colour palette of the level.
        theme: Theme,
    },
    /// Announces that the final campaign level was cleared.
    CampaignComplete,
    /// Reports that the periodic difficulty bump was applied.
    DifficultyIncreased {
        /// Number of bumps applied so far.
        steps: u32,
    },
    /// Reports that the endless difficulty tier increased.
    DifficultyTierRaised {
        /// Tier that became active.
        tier: u32,
    },
    /// Reports that the endless road palette rotated.
    ThemeChanged {
        /// Palette that became active.
        theme: Theme,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Health removed by the hit.
        amount: u32,
        /// Health remaining after the hit.
        health: i32,
    },
    /// Reports the player's score after a discrete award or penalty.
    ScoreChanged {
        /// Whole points held by the player.
        score: i64,
    },
    /// Reports that the player's remaining lives changed.
    LivesChanged {
        /// Lives remaining.
        lives: u32,
    },
    /// Reports that the player picked up a roadside power-up.
    PowerUpCollected {
        /// Power-up that was collected.
        kind: PowerUpKind,
    },
    /// Reports that the player drove over a road hazard.
    HazardTriggered {
        /// Hazard that affected the player.
        kind: HazardKind,
    },
    /// Reports that the player climbed into the weapons van.
    PlayerEnteredVan {
        /// Identifier of the van.
        van: ActorId,
    },
    /// Reports that the weapons van restocked the player.
    SuppliesGranted,
    /// Reports that the player left the weapons van.
    PlayerLeftVan {
        /// Identifier of the van.
        van: ActorId,
    },
    /// Reports that the reduced-load performance mode was toggled.
    PerformanceModeChanged {
        /// Whether performance mode is now active.
        enabled: bool,
    },
    /// Reports that the player ran out of lives.
    GameOver {
        /// Final whole-point score.
        score: i64,
    },
}

/// Reason an actor left play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalCause {
    /// Destroyed by combat.
    Killed,
    /// Drove out of the viewport bounds.
    LeftRoad,
    /// Swept away to make room for a boss.
    Cleared,
    /// Released while the manager was torn down.
    Teardown,
}

/// Unique identifier assigned to every spawned actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hands out run-unique actor identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorIds {
    next: u32,
}

impl ActorIds {
    /// Creates an allocator whose first identifier is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh identifier.
    pub fn allocate(&mut self) -> ActorId {
        let id = ActorId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Zero-based index of a lane counted from the left road edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lane(u32);

impl Lane {
    /// Creates a lane index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Retrieves the zero-based lane index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behaviour and stats profile a regular ground vehicle is created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    /// Innocent traffic that costs points when destroyed.
    Civilian,
    /// Follows the player's lateral position.
    Chaser,
    /// Weaves between adjacent lanes.
    Motorcycle,
    /// Slow to react but hard to destroy.
    Armored,
    /// Holds its lane and fires at the player.
    Shooter,
    /// Throttles itself to stay in front of the player.
    Blocker,
    /// Lines up with the player's lane and surges alongside.
    Rammer,
}

impl Archetype {
    /// Every archetype in declaration order.
    pub const ALL: [Archetype; 7] = [
        Archetype::Civilian,
        Archetype::Chaser,
        Archetype::Motorcycle,
        Archetype::Armored,
        Archetype::Shooter,
        Archetype::Blocker,
        Archetype::Rammer,
    ];

    /// Reports whether the archetype is innocent traffic.
    #[must_use]
    pub const fn is_civilian(self) -> bool {
        matches!(self, Archetype::Civilian)
    }

    /// Short label drawn above the vehicle.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Archetype::Civilian => "AVOID",
            Archetype::Chaser => "ENEMY",
            Archetype::Motorcycle => "ENEMY",
            Archetype::Armored => "ARMOR",
            Archetype::Shooter => "SNIPER",
            Archetype::Blocker => "BLOCK",
            Archetype::Rammer => "RAMMER",
        }
    }
}

/// Boss archetypes guarding the campaign level thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Heavy truck that relies on contact damage.
    ArmoredTruck,
    /// Armed van that fires aimed shots.
    WeaponVan,
    /// Slow tank with heavy shells.
    Tank,
    /// Fast-firing gunship.
    AttackChopper,
}

impl BossKind {
    /// Display name announced when the boss arrives.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BossKind::ArmoredTruck => "ARMORED TRUCK",
            BossKind::WeaponVan => "WEAPON VAN",
            BossKind::Tank => "BATTLE TANK",
            BossKind::AttackChopper => "ATTACK CHOPPER",
        }
    }
}

/// Difficulty phase of a boss, advanced by remaining health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BossPhase {
    /// Full strength opening phase.
    One,
    /// Entered at or below sixty percent health.
    Two,
    /// Enraged phase entered at or below thirty percent health.
    Three,
}

impl BossPhase {
    /// Numeric phase used to scale speed and attack cadence.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }

    /// Phase implied by the provided remaining health fraction.
    #[must_use]
    pub fn for_health_fraction(fraction: f32) -> Self {
        if fraction <= 0.3 {
            BossPhase::Three
        } else if fraction <= 0.6 {
            BossPhase::Two
        } else {
            BossPhase::One
        }
    }
}

/// Broad classification of every actor the director manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// Regular ground vehicle.
    Ground(Archetype),
    /// Bomb-dropping helicopter.
    Helicopter,
    /// Level boss.
    Boss(BossKind),
    /// Non-combat resupply van.
    WeaponsVan,
}

/// Weapons carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Rapid-fire gun with unlimited ammunition.
    MachineGun,
    /// Slow heavy missile.
    Missile,
    /// Dropped slick that spins out enemies.
    OilSlick,
    /// Cloud that makes the player briefly untouchable.
    SmokeScreen,
}

impl Weapon {
    /// Every weapon in rack order.
    pub const ALL: [Weapon; 4] = [
        Weapon::MachineGun,
        Weapon::Missile,
        Weapon::OilSlick,
        Weapon::SmokeScreen,
    ];

    /// Weapon that follows this one when cycling.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Weapon::MachineGun => Weapon::Missile,
            Weapon::Missile => Weapon::OilSlick,
            Weapon::OilSlick => Weapon::SmokeScreen,
            Weapon::SmokeScreen => Weapon::MachineGun,
        }
    }
}

/// Hazards that may appear on the road surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HazardKind {
    /// Slick that may spin the player out.
    OilSpill,
    /// Slippery patch that bleeds speed.
    IcePatch,
    /// Permanent hole that damages the car.
    Pothole,
}

/// Pickups that may appear on the road surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Restocks limited weapons.
    WeaponRefill,
    /// Grants temporary invulnerability.
    Shield,
    /// Pushes the player to top speed.
    SpeedBoost,
    /// Grants bonus points.
    ScoreBonus,
    /// Grants an extra life.
    ExtraLife,
}

/// RGB colour stored as a packed `0xRRGGBB` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(u32);

impl Color {
    /// Creates a colour from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    /// Packed `0xRRGGBB` representation.
    #[must_use]
    pub const fn hex(&self) -> u32 {
        self.0
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }
}

/// Palette applied to the road while a level or endless segment is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Theme {
    /// Asphalt colour.
    pub road: Color,
    /// Verge colour on both sides of the road.
    pub grass: Color,
    /// Lane marking colour.
    pub line: Color,
}

impl Theme {
    /// Creates a palette from packed `0xRRGGBB` values.
    #[must_use]
    pub const fn new(road: u32, grass: u32, line: u32) -> Self {
        Self {
            road: Color::from_hex(road),
            grass: Color::from_hex(grass),
            line: Color::from_hex(line),
        }
    }
}

/// Edge of the viewport new traffic enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnEdge {
    /// Traffic entering from above, slower than the player.
    Top,
    /// Chasing traffic entering from below.
    Bottom,
}

/// Geometry of the viewport and its lane grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadLayout {
    width: f32,
    height: f32,
    lanes: u32,
    lane_width: f32,
    margin: f32,
}

impl RoadLayout {
    /// Creates a new layout description.
    #[must_use]
    pub const fn new(width: f32, height: f32, lanes: u32, lane_width: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            lanes,
            lane_width,
            margin,
        }
    }

    /// Width of the viewport in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the viewport in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Number of lanes on the road.
    #[must_use]
    pub const fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Width of a single lane in pixels.
    #[must_use]
    pub const fn lane_width(&self) -> f32 {
        self.lane_width
    }

    /// Distance between the viewport edge and the first lane.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Left edge of the drivable road.
    #[must_use]
    pub const fn road_left(&self) -> f32 {
        self.margin
    }

    /// Right edge of the drivable road.
    #[must_use]
    pub fn road_right(&self) -> f32 {
        self.margin + self.lanes as f32 * self.lane_width
    }

    /// Horizontal centre of the viewport.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Horizontal centre of the provided lane.
    #[must_use]
    pub fn lane_center(&self, lane: Lane) -> f32 {
        self.margin + lane.get() as f32 * self.lane_width + self.lane_width / 2.0
    }

    /// Lane containing the provided x coordinate, if it lies on the road.
    #[must_use]
    pub fn lane_of(&self, x: f32) -> Option<Lane> {
        let index = ((x - self.margin) / self.lane_width).floor();
        if index >= 0.0 && index < self.lanes as f32 {
            Some(Lane::new(index as u32))
        } else {
            None
        }
    }

    /// Lane nearest to the provided x coordinate, clamped onto the road.
    #[must_use]
    pub fn nearest_lane(&self, x: f32) -> Lane {
        let index = ((x - self.margin) / self.lane_width).floor();
        let last = self.lanes.saturating_sub(1) as f32;
        Lane::new(index.clamp(0.0, last) as u32)
    }

    /// Iterator over every lane from left to right.
    pub fn iter_lanes(&self) -> impl Iterator<Item = Lane> {
        (0..self.lanes).map(Lane::new)
    }
}

impl Default for RoadLayout {
    fn default() -> Self {
        RoadTuning::default().layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_center_maps_back_to_its_lane() {
        let layout = RoadLayout::default();
        for lane in layout.iter_lanes() {
            assert_eq!(layout.lane_of(layout.lane_center(lane)), Some(lane));
        }
    }

    #[test]
    fn lane_of_rejects_positions_off_the_road() {
        let layout = RoadLayout::default();
        assert_eq!(layout.lane_of(10.0), None);
        assert_eq!(layout.lane_of(layout.road_right() + 1.0), None);
        assert_eq!(layout.lane_of(layout.road_left()), Some(Lane::new(0)));
    }

    #[test]
    fn nearest_lane_clamps_to_road_edges() {
        let layout = RoadLayout::default();
        assert_eq!(layout.nearest_lane(-500.0), Lane::new(0));
        assert_eq!(layout.nearest_lane(5000.0), Lane::new(4));
    }

    #[test]
    fn boss_phase_thresholds_are_inclusive() {
        assert_eq!(BossPhase::for_health_fraction(1.0), BossPhase::One);
        assert_eq!(BossPhase::for_health_fraction(0.6), BossPhase::Two);
        assert_eq!(BossPhase::for_health_fraction(0.3), BossPhase::Three);
        assert_eq!(BossPhase::for_health_fraction(0.0), BossPhase::Three);
    }

    #[test]
    fn weapon_cycle_visits_every_weapon() {
        let mut weapon = Weapon::MachineGun;
        for expected in Weapon::ALL.iter().cycle().skip(1).take(4) {
            weapon = weapon.next();
            assert_eq!(weapon, *expected);
        }
    }

    #[test]
    fn color_components_unpack() {
        let color = Color::from_hex(0x12_34_56);
        assert_eq!((color.red(), color.green(), color.blue()), (0x12, 0x34, 0x56));
    }
}
