#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame orchestration of the Road Rush encounter director.
//!
//! A [`Director`] owns the player, every system and the deterministic RNG.
//! Adapters drive it exclusively through [`apply`], submitting a
//! [`Command`] and collecting the [`Event`]s it produced, and read its state
//! through the [`query`] module. Systems never call each other; when one
//! needs another to change, it emits a command that the director routes.

use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use road_rush_core::{
    ActorIds, Command, ConfigError, Cue, Effect, EffectSink, Event, GameMode, NullEffects,
    RoadLayout, TuningConfig, Weapon,
};
use road_rush_system_actors::{ActorContext, Detonation, VanSignal, EJECT_GRACE};
use road_rush_system_encounter::{Arena, EncounterResolver};
use road_rush_system_performance::{PerformanceMonitor, TrafficLimits};
use road_rush_system_progression::ProgressionController;
use road_rush_system_roadside::Roadside;
use road_rush_system_traffic::{SpawnTable, TrafficDirector};
use road_rush_world::{
    player::{Player, Shot},
    projectiles::PlayerShots,
    TimerQueue,
};
use tracing::{debug, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DirectorTimer {
    Difficulty,
}

/// Complete simulation of one run.
#[derive(Debug)]
pub struct Director<E: EffectSink = NullEffects> {
    config: TuningConfig,
    mode: GameMode,
    layout: RoadLayout,
    rng: ChaCha8Rng,
    effects: E,
    ids: ActorIds,
    clock: Duration,
    tick_index: u64,
    running: bool,
    player: Player,
    shots: PlayerShots,
    traffic: TrafficDirector,
    roadside: Roadside,
    progression: ProgressionController,
    resolver: EncounterResolver,
    performance: PerformanceMonitor,
    timers: TimerQueue<DirectorTimer>,
    fired: Vec<DirectorTimer>,
    detonations: Vec<Detonation>,
    van_signals: Vec<VanSignal>,
    commands: Vec<Command>,
    scratch_events: Vec<Event>,
}

impl Director<NullEffects> {
    /// Creates a director that discards presentation effects.
    pub fn headless(config: TuningConfig, mode: GameMode) -> Result<Self, ConfigError> {
        Self::new(config, mode, NullEffects)
    }
}

impl<E: EffectSink> Director<E> {
    /// Validates `config` and sets up a run that has not ticked yet.
    pub fn new(config: TuningConfig, mode: GameMode, effects: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = config.road.layout();
        let base_speed = config.road.base_speed;

        let mut traffic = TrafficDirector::new(
            &config.traffic,
            layout,
            base_speed,
            config.scoring,
            SpawnTable::for_revision(config.traffic.spawn_table),
        );
        let progression = ProgressionController::new(mode, layout, base_speed);
        let mut opening = Vec::new();
        progression.opening_commands(&mut opening);
        let mut discarded = Vec::new();
        for command in opening {
            configure_traffic(&mut traffic, command, &mut discarded);
        }

        let mut timers = TimerQueue::new();
        let _ = timers.repeating(config.traffic.difficulty_interval(), DirectorTimer::Difficulty);

        info!(seed = config.seed, ?mode, "road rush director ready");
        Ok(Self {
            mode,
            layout,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            effects,
            ids: ActorIds::new(),
            clock: Duration::ZERO,
            tick_index: 0,
            running: true,
            player: Player::new(config.player, config.weapons, layout, base_speed),
            shots: PlayerShots::new(),
            traffic,
            roadside: Roadside::new(layout),
            progression,
            resolver: EncounterResolver::new(),
            performance: PerformanceMonitor::new(),
            timers,
            fired: Vec::new(),
            detonations: Vec::new(),
            van_signals: Vec::new(),
            commands: Vec::new(),
            scratch_events: Vec::new(),
            config,
        })
    }

    /// Presentation sink receiving the run's effects.
    #[must_use]
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Mutable presentation sink, for adapters that drain it every frame.
    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    fn execute(&mut self, command: Command, out: &mut Vec<Event>) {
        match command {
            Command::Tick { dt } => self.tick(dt, out),
            Command::PlacePlayer { position } => self.player.place(position),
            Command::SetPlayerSpeed { speed } => self.player.set_speed(speed),
            Command::FireWeapon => self.fire_weapon(),
            Command::SwitchWeapon => self.player.switch_weapon(),
            Command::SelectWeapon { weapon } => self.player.select_weapon(weapon),
            Command::Teardown => self.teardown(out),
            other => configure_traffic(&mut self.traffic, other, out),
        }
    }

    fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let first_event = out.len();
        self.clock += dt;
        self.tick_index = self.tick_index.saturating_add(1);
        out.push(Event::TimeAdvanced { dt });
        if !self.running {
            return;
        }

        let road_speed = self.player.speed();
        self.player.tick(
            self.clock,
            dt,
            self.config.scoring.distance_points_per_second,
        );
        self.shots.update(dt, self.clock, road_speed, &self.layout);
        let level = self.progression.level_number();

        let resolution = {
            let mut ctx = ActorContext {
                now: self.clock,
                dt,
                road_speed,
                base_speed: self.config.road.base_speed,
                player: self.player.view(),
                layout: &self.layout,
                rng: &mut self.rng,
                effects: &mut self.effects,
                events: out,
            };
            self.traffic.update(&mut ctx, &mut self.ids, level);
            self.roadside.update(&mut ctx, level);

            self.detonations.clear();
            self.van_signals.clear();
            self.traffic.drain_detonations(&mut self.detonations);
            self.traffic.drain_van_signals(&mut self.van_signals);

            let parts = self.traffic.parts_mut();
            let arena = Arena {
                player: &mut self.player,
                shots: &mut self.shots,
                ground: parts.actors,
                helicopter: parts.helicopter,
                van: parts.van,
                boss: self.progression.boss_mut(),
                roadside: &mut self.roadside,
                detonations: &self.detonations,
                van_signals: &self.van_signals,
            };
            self.resolver.resolve(arena, &mut ctx)
        };
        if let Some(boss) = resolution.boss_defeated {
            self.progression.on_boss_defeated(boss);
        }

        self.commands.clear();
        {
            let mut ctx = ActorContext {
                now: self.clock,
                dt,
                road_speed: self.player.speed(),
                base_speed: self.config.road.base_speed,
                player: self.player.view(),
                layout: &self.layout,
                rng: &mut self.rng,
                effects: &mut self.effects,
                events: out,
            };
            self.progression.update(
                &mut ctx,
                &mut self.ids,
                self.player.score(),
                &mut self.commands,
            );
        }
        self.route_pending(out);

        self.fired.clear();
        self.timers.advance(dt, &mut self.fired);
        let fired = std::mem::take(&mut self.fired);
        for timer in &fired {
            match timer {
                DirectorTimer::Difficulty => self.execute(Command::IncreaseDifficulty, out),
            }
        }
        self.fired = fired;

        let rates = self.traffic.rates();
        let (max_vehicles, civilian_rate) = self.progression.traffic_baseline();
        self.scratch_events.clear();
        self.performance.handle(
            &out[first_event..],
            TrafficLimits {
                max_vehicles: rates.max_vehicles,
                civilian_rate: rates.civilian,
            },
            TrafficLimits {
                max_vehicles,
                civilian_rate,
            },
            &mut self.commands,
            &mut self.scratch_events,
        );
        out.append(&mut self.scratch_events);
        self.route_pending(out);

        if out[first_event..]
            .iter()
            .any(|event| matches!(event, Event::GameOver { .. } | Event::CampaignComplete))
        {
            self.running = false;
            info!(
                tick = self.tick_index,
                score = self.player.score(),
                "run finished"
            );
        }
        trace!(
            tick = self.tick_index,
            score = self.player.score(),
            vehicles = self.traffic.active_vehicle_count(),
            "tick complete"
        );
    }

    fn route_pending(&mut self, out: &mut Vec<Event>) {
        let mut commands = std::mem::take(&mut self.commands);
        for command in commands.drain(..) {
            self.execute(command, out);
        }
        self.commands = commands;
    }

    fn fire_weapon(&mut self) {
        let Some(Shot { weapon, origin }) = self.player.fire() else {
            return;
        };
        let tuning = self.config.weapons;
        let (velocity, expires_at, cue) = match weapon {
            Weapon::MachineGun => (Vec2::new(0.0, -tuning.bullet_speed), None, Some(Cue::Shoot)),
            Weapon::Missile => (
                Vec2::new(0.0, -tuning.missile_speed),
                None,
                Some(Cue::Missile),
            ),
            Weapon::OilSlick => (
                Vec2::new(0.0, self.player.speed()),
                Some(self.clock + tuning.oil_lifetime()),
                None,
            ),
            Weapon::SmokeScreen => {
                debug!("smoke screen deployed");
                return;
            }
        };
        let Some(group) = self.shots.group_mut(weapon) else {
            return;
        };
        if group.fire(origin, velocity, expires_at) {
            if let Some(cue) = cue {
                self.effects.emit(Effect::Sound(cue));
            }
        }
    }

    fn teardown(&mut self, out: &mut Vec<Event>) {
        if self.traffic.teardown(out) {
            let at = Vec2::new(self.layout.center_x(), self.layout.height() - 100.0);
            if let Some(van) = self.player.leave_van(at, EJECT_GRACE) {
                out.push(Event::PlayerLeftVan { van });
            }
        }
        self.progression.teardown(out);
        self.roadside.teardown();
        self.shots.clear();
        self.timers.clear();
        self.performance.reset();
        self.running = false;
        info!(tick = self.tick_index, "director torn down");
    }
}

/// Applies a traffic tuning command; anything else is ignored.
fn configure_traffic(traffic: &mut TrafficDirector, command: Command, out: &mut Vec<Event>) {
    match command {
        Command::SetSpawnRates { enemy, civilian } => traffic.set_spawn_rates(enemy, civilian),
        Command::SetCivilianRate { civilian } => traffic.set_civilian_rate(civilian),
        Command::SetHelicopterEnabled { enabled } => traffic.set_helicopter_enabled(enabled),
        Command::SetHelicopterCooldown { cooldown } => traffic.set_helicopter_cooldown(cooldown),
        Command::SetWeaponsVanCooldown { cooldown } => traffic.set_van_cooldown(cooldown),
        Command::SetMaxVehicles { max } => traffic.set_max_vehicles(max),
        Command::SetMaxWaveSize { max } => traffic.set_max_wave_size(max),
        Command::IncreaseDifficulty => {
            let steps = traffic.increase_difficulty();
            out.push(Event::DifficultyIncreased { steps });
        }
        Command::ClearTraffic => traffic.clear(out),
        Command::Tick { .. }
        | Command::PlacePlayer { .. }
        | Command::SetPlayerSpeed { .. }
        | Command::FireWeapon
        | Command::SwitchWeapon
        | Command::SelectWeapon { .. }
        | Command::Teardown => {}
    }
}

/// Executes a command against the director, broadcasting resulting events.
pub fn apply<E: EffectSink>(director: &mut Director<E>, command: Command, out_events: &mut Vec<Event>) {
    director.execute(command, out_events);
}

/// Query functions that provide read-only access to the director state.
pub mod query {
    use std::time::Duration;

    use road_rush_core::{EffectSink, GameMode, RoadLayout, Theme, TuningConfig};
    use road_rush_system_actors::{Boss, Combatant, GroundActor, Helicopter, WeaponsVan};
    use road_rush_system_progression::{levels::LevelRecord, ProgressionState};
    use road_rush_system_roadside::{Hazard, PowerUp};
    use road_rush_system_traffic::{TrafficRates, WaveStatus};
    use road_rush_world::{player::Player, projectiles::PlayerShots};

    use super::Director;

    /// Configuration the run was created with.
    #[must_use]
    pub fn config<E: EffectSink>(director: &Director<E>) -> &TuningConfig {
        &director.config
    }

    /// Run mode.
    #[must_use]
    pub fn mode<E: EffectSink>(director: &Director<E>) -> GameMode {
        director.mode
    }

    /// Viewport and lane grid.
    #[must_use]
    pub fn layout<E: EffectSink>(director: &Director<E>) -> &RoadLayout {
        &director.layout
    }

    /// Simulated time since the run started.
    #[must_use]
    pub fn clock<E: EffectSink>(director: &Director<E>) -> Duration {
        director.clock
    }

    /// Number of ticks processed.
    #[must_use]
    pub fn tick_index<E: EffectSink>(director: &Director<E>) -> u64 {
        director.tick_index
    }

    /// Whether the run still advances; false after game over, campaign
    /// completion or teardown.
    #[must_use]
    pub fn is_running<E: EffectSink>(director: &Director<E>) -> bool {
        director.running
    }

    /// The player car.
    #[must_use]
    pub fn player<E: EffectSink>(director: &Director<E>) -> &Player {
        &director.player
    }

    /// Projectiles fired by the player.
    #[must_use]
    pub fn player_shots<E: EffectSink>(director: &Director<E>) -> &PlayerShots {
        &director.shots
    }

    /// Ground vehicles still on the road.
    pub fn ground_actors<E: EffectSink>(
        director: &Director<E>,
    ) -> impl Iterator<Item = &GroundActor> {
        director.traffic.actors().iter().filter(|actor| actor.is_active())
    }

    /// The helicopter, when one is on screen.
    #[must_use]
    pub fn helicopter<E: EffectSink>(director: &Director<E>) -> Option<&Helicopter> {
        director.traffic.helicopter()
    }

    /// The weapons van, when one is on screen.
    #[must_use]
    pub fn weapons_van<E: EffectSink>(director: &Director<E>) -> Option<&WeaponsVan> {
        director.traffic.van()
    }

    /// The boss, when one is fighting.
    #[must_use]
    pub fn boss<E: EffectSink>(director: &Director<E>) -> Option<&Boss> {
        director.progression.boss()
    }

    /// Hazards on the road.
    pub fn hazards<E: EffectSink>(director: &Director<E>) -> impl Iterator<Item = &Hazard> {
        director.roadside.hazards()
    }

    /// Pickups on the road.
    pub fn power_ups<E: EffectSink>(director: &Director<E>) -> impl Iterator<Item = &PowerUp> {
        director.roadside.power_ups()
    }

    /// Record of the level being played, or the endless baseline.
    #[must_use]
    pub fn level<E: EffectSink>(director: &Director<E>) -> &'static LevelRecord {
        director.progression.level()
    }

    /// Level number gating enemy archetypes.
    #[must_use]
    pub fn level_number<E: EffectSink>(director: &Director<E>) -> u32 {
        director.progression.level_number()
    }

    /// Endless difficulty tier.
    #[must_use]
    pub fn tier<E: EffectSink>(director: &Director<E>) -> u32 {
        director.progression.tier()
    }

    /// Road palette in force.
    #[must_use]
    pub fn theme<E: EffectSink>(director: &Director<E>) -> Theme {
        director.progression.theme()
    }

    /// State of the progression machine.
    #[must_use]
    pub fn phase<E: EffectSink>(director: &Director<E>) -> ProgressionState {
        director.progression.state()
    }

    /// Traffic rates and caps in force.
    #[must_use]
    pub fn traffic_rates<E: EffectSink>(director: &Director<E>) -> TrafficRates {
        director.traffic.rates()
    }

    /// Wave sub-scheduler state.
    #[must_use]
    pub fn wave<E: EffectSink>(director: &Director<E>) -> WaveStatus {
        director.traffic.wave()
    }

    /// Periodic difficulty bumps applied so far.
    #[must_use]
    pub fn difficulty_steps<E: EffectSink>(director: &Director<E>) -> u32 {
        director.traffic.difficulty_steps()
    }

    /// Whether the frame-rate throttle is thinning out traffic.
    #[must_use]
    pub fn performance_mode<E: EffectSink>(director: &Director<E>) -> bool {
        director.performance.is_performance_mode()
    }

    /// Smoothed frame rate measured by the throttle.
    #[must_use]
    pub fn average_fps<E: EffectSink>(director: &Director<E>) -> f32 {
        director.performance.average_fps()
    }
}

#[cfg(test)]
mod tests {
    use road_rush_core::{EffectLog, RoadTuning};

    use super::*;

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = TuningConfig {
            road: RoadTuning {
                lanes: 0,
                ..RoadTuning::default()
            },
            ..TuningConfig::default()
        };
        assert_eq!(
            Director::headless(config, GameMode::Campaign).err(),
            Some(ConfigError::NoLanes)
        );
    }

    #[test]
    fn opening_level_tunes_traffic_before_the_first_tick() {
        let director = Director::headless(TuningConfig::default(), GameMode::Campaign)
            .expect("default config is valid");
        let rates = director.traffic.rates();
        assert_eq!(rates.max_vehicles, 3);
        assert_eq!(rates.civilian, Duration::from_millis(4500));
        assert_eq!(rates.max_wave_size, 2);
    }

    #[test]
    fn firing_plays_the_weapon_cue() {
        let mut director = Director::new(TuningConfig::default(), GameMode::Campaign, EffectLog::new())
            .expect("default config is valid");
        let mut events = Vec::new();
        apply(&mut director, Command::FireWeapon, &mut events);
        assert_eq!(
            director.effects().count(|effect| *effect == Effect::Sound(Cue::Shoot)),
            1
        );
        assert_eq!(
            director
                .shots
                .group(Weapon::MachineGun)
                .map(|group| group.active_count()),
            Some(1)
        );
    }
}
