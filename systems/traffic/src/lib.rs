#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Traffic director responsible for populating the road.
//!
//! Civilians arrive from the top edge on a repeating timer while enemies
//! arrive from behind in waves. Both respect the vehicle cap and only use
//! lanes whose spawn zone is clear; a blocked attempt is skipped and retried
//! on the next firing of its timer. The director also owns the helicopter and
//! the weapons van, each gated by its own accumulated cooldown.

mod spawn_table;

use std::time::Duration;

use rand::{Rng, RngCore};
use road_rush_core::{
    ActorIds, ActorKind, Archetype, Cue, Effect, Event, Lane, RemovalCause, RoadLayout,
    ScoringTuning, SpawnEdge, TextTone, TrafficTuning,
};
use road_rush_system_actors::{
    ActorContext, Combatant, Detonation, GroundActor, Helicopter, VanSignal, WeaponsVan,
};
use road_rush_world::{TimerHandle, TimerQueue};
use tracing::{debug, info};

pub use spawn_table::{SpawnRule, SpawnTable};

const CIVILIAN_SPAWN_Y: f32 = -60.0;
const ENEMY_SPAWN_OFFSET: f32 = 60.0;
const TOP_ZONE: f32 = 0.4;
const BOTTOM_ZONE: f32 = 0.6;
const MIN_WAVE_COOLDOWN: Duration = Duration::from_millis(5000);
const DIFFICULTY_WAVE_FLOOR: Duration = Duration::from_millis(6000);
const DIFFICULTY_WAVE_STEP: Duration = Duration::from_millis(300);
const CIVILIAN_RATE_FLOOR: Duration = Duration::from_millis(3000);
const HELICOPTER_COOLDOWN_FLOOR: Duration = Duration::from_millis(15_000);
const HELICOPTER_COOLDOWN_STEP: Duration = Duration::from_millis(1500);
const MAX_WAVE_CEILING: u32 = 4;
const HELICOPTER_EDGE: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrafficTimer {
    StartSpawning,
    CivilianSpawn,
    WaveStart,
    WaveEnemy,
}

/// Snapshot of the wave sub-scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveStatus {
    /// Whether a wave is currently placing enemies.
    pub active: bool,
    /// Enemies placed by the current or most recent wave.
    pub spawned: u32,
    /// Number of waves started so far.
    pub number: u32,
}

/// Rates and caps currently in force.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficRates {
    /// Enemy rate the wave cooldown was last derived from.
    pub enemy: Duration,
    /// Interval between civilian spawn attempts.
    pub civilian: Duration,
    /// Interval between wave start attempts.
    pub wave_cooldown: Duration,
    /// Cap on concurrently active ground vehicles.
    pub max_vehicles: u32,
    /// Cap on enemies per wave.
    pub max_wave_size: u32,
    /// Whether the helicopter may appear.
    pub helicopter_enabled: bool,
    /// Accumulated time required between helicopters.
    pub helicopter_cooldown: Duration,
    /// Accumulated time required between weapons vans.
    pub van_cooldown: Duration,
    /// Aggregate difficulty multiplier, starting at one.
    pub difficulty_multiplier: f32,
}

/// Disjoint mutable borrows of the actors a [`TrafficDirector`] owns.
#[derive(Debug)]
pub struct TrafficParts<'a> {
    /// Ground vehicles, including ones killed this tick.
    pub actors: &'a mut [GroundActor],
    /// The helicopter, when one is on screen.
    pub helicopter: Option<&'a mut Helicopter>,
    /// The weapons van, when one is on screen.
    pub van: Option<&'a mut WeaponsVan>,
}

/// Spawn scheduler owning every ground vehicle, the helicopter and the van.
#[derive(Debug)]
pub struct TrafficDirector {
    layout: RoadLayout,
    base_speed: f32,
    scoring: ScoringTuning,
    table: SpawnTable,
    timers: TimerQueue<TrafficTimer>,
    fired: Vec<TrafficTimer>,
    civilian_timer: Option<TimerHandle>,
    wave_timer: Option<TimerHandle>,
    wave_enemy_timer: Option<TimerHandle>,
    started: bool,
    rates: TrafficRates,
    wave_enemy_interval: Duration,
    wave: WaveStatus,
    difficulty_steps: u32,
    helicopter_timer: Duration,
    van_enabled: bool,
    van_timer: Duration,
    civilians_avoid_player_lane: bool,
    actors: Vec<GroundActor>,
    helicopter: Option<Helicopter>,
    van: Option<WeaponsVan>,
    detonations: Vec<Detonation>,
    van_signals: Vec<VanSignal>,
}

impl TrafficDirector {
    /// Creates a director whose spawning starts after the configured delay.
    #[must_use]
    pub fn new(
        tuning: &TrafficTuning,
        layout: RoadLayout,
        base_speed: f32,
        scoring: ScoringTuning,
        table: SpawnTable,
    ) -> Self {
        let mut timers = TimerQueue::new();
        let _ = timers.once(tuning.start_delay(), TrafficTimer::StartSpawning);
        Self {
            layout,
            base_speed,
            scoring,
            table,
            timers,
            fired: Vec::new(),
            civilian_timer: None,
            wave_timer: None,
            wave_enemy_timer: None,
            started: false,
            rates: TrafficRates {
                enemy: tuning.enemy_spawn_rate(),
                civilian: tuning.civilian_spawn_rate(),
                wave_cooldown: wave_cooldown_for(tuning.enemy_spawn_rate()),
                max_vehicles: tuning.max_vehicles,
                max_wave_size: tuning.max_enemies_per_wave,
                helicopter_enabled: tuning.helicopter_enabled,
                helicopter_cooldown: tuning.helicopter_cooldown(),
                van_cooldown: tuning.weapons_van_cooldown(),
                difficulty_multiplier: 1.0,
            },
            wave_enemy_interval: tuning.wave_enemy_interval(),
            wave: WaveStatus::default(),
            difficulty_steps: 0,
            helicopter_timer: Duration::ZERO,
            van_enabled: tuning.weapons_van_enabled,
            van_timer: Duration::ZERO,
            civilians_avoid_player_lane: tuning.civilians_avoid_player_lane,
            actors: Vec::new(),
            helicopter: None,
            van: None,
            detonations: Vec::new(),
            van_signals: Vec::new(),
        }
    }

    /// Runs one tick: timers, actor AI, air and van spawns, movement, culling.
    pub fn update(&mut self, ctx: &mut ActorContext<'_>, ids: &mut ActorIds, level: u32) {
        self.sweep();

        self.fired.clear();
        self.timers.advance(ctx.dt, &mut self.fired);
        let fired = std::mem::take(&mut self.fired);
        for timer in &fired {
            match timer {
                TrafficTimer::StartSpawning => self.start_spawning(),
                TrafficTimer::CivilianSpawn => self.try_spawn_civilian(ctx, ids),
                TrafficTimer::WaveStart => self.start_wave(ctx, ids, level),
                TrafficTimer::WaveEnemy => self.spawn_wave_enemy(ctx, ids, level),
            }
        }
        self.fired = fired;

        for actor in &mut self.actors {
            actor.update(ctx);
        }
        if let Some(helicopter) = self.helicopter.as_mut() {
            helicopter.update(ctx);
            helicopter.drain_detonations(&mut self.detonations);
        }
        if let Some(van) = self.van.as_mut() {
            van.update(ctx);
            van.drain_signals(&mut self.van_signals);
        }

        if self.started {
            self.advance_helicopter_cooldown(ctx, ids);
            self.advance_van_cooldown(ctx, ids);
        }

        for actor in &mut self.actors {
            actor.integrate(ctx.dt);
        }
        if let Some(helicopter) = self.helicopter.as_mut() {
            helicopter.integrate(ctx.dt);
        }
        if let Some(van) = self.van.as_mut() {
            van.integrate(ctx.dt);
        }

        self.cull(ctx.events);
    }

    fn start_spawning(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.civilian_timer = Some(
            self.timers
                .repeating(self.rates.civilian, TrafficTimer::CivilianSpawn),
        );
        self.wave_timer = Some(
            self.timers
                .repeating(self.rates.wave_cooldown, TrafficTimer::WaveStart),
        );
        debug!(
            civilian_ms = self.rates.civilian.as_millis() as u64,
            wave_ms = self.rates.wave_cooldown.as_millis() as u64,
            "traffic spawning started"
        );
    }

    /// Picks a random lane whose spawn zone for `edge` is clear.
    pub fn find_open_lane(
        &self,
        edge: SpawnEdge,
        exclude: Option<Lane>,
        rng: &mut dyn RngCore,
    ) -> Option<Lane> {
        let lanes = self.layout.lanes() as usize;
        let mut occupied = vec![false; lanes];
        let height = self.layout.height();
        for actor in self.actors.iter().filter(|actor| actor.is_active()) {
            let position = actor.body().position();
            let Some(lane) = self.layout.lane_of(position.x) else {
                continue;
            };
            let blocking = match edge {
                SpawnEdge::Top => position.y < height * TOP_ZONE,
                SpawnEdge::Bottom => position.y > height * BOTTOM_ZONE,
            };
            if blocking {
                occupied[lane.get() as usize] = true;
            }
        }

        let open: Vec<Lane> = self
            .layout
            .iter_lanes()
            .filter(|lane| Some(*lane) != exclude && !occupied[lane.get() as usize])
            .collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.gen_range(0..open.len())])
    }

    fn try_spawn_civilian(&mut self, ctx: &mut ActorContext<'_>, ids: &mut ActorIds) {
        if !self.started || self.active_vehicle_count() >= self.rates.max_vehicles as usize {
            return;
        }
        let exclude = if self.civilians_avoid_player_lane {
            ctx.player.lane
        } else {
            None
        };
        let Some(lane) = self.find_open_lane(SpawnEdge::Top, exclude, ctx.rng) else {
            return;
        };
        self.spawn_ground(Archetype::Civilian, lane, CIVILIAN_SPAWN_Y, ctx, ids);
    }

    fn start_wave(&mut self, ctx: &mut ActorContext<'_>, ids: &mut ActorIds, level: u32) {
        if !self.started || self.wave.active {
            return;
        }
        self.wave.active = true;
        self.wave.spawned = 0;
        self.wave.number += 1;
        ctx.events.push(Event::WaveStarted {
            wave: self.wave.number,
        });
        debug!(wave = self.wave.number, cap = self.rates.max_wave_size, "wave started");

        if self.rates.max_wave_size > 1 {
            self.wave_enemy_timer = self.timers.repeating_times(
                self.wave_enemy_interval,
                self.rates.max_wave_size - 1,
                TrafficTimer::WaveEnemy,
            );
        }
        self.spawn_wave_enemy(ctx, ids, level);
    }

    fn spawn_wave_enemy(&mut self, ctx: &mut ActorContext<'_>, ids: &mut ActorIds, level: u32) {
        if !self.wave.active {
            return;
        }
        if self.active_vehicle_count() >= self.rates.max_vehicles as usize {
            self.end_wave(ctx.events);
            return;
        }
        let Some(lane) = self.find_open_lane(SpawnEdge::Bottom, ctx.player.lane, ctx.rng) else {
            self.end_wave(ctx.events);
            return;
        };

        let roll: f32 = ctx.rng.gen();
        let archetype = self.table.pick(level, roll);
        let y = self.layout.height() + ENEMY_SPAWN_OFFSET;
        self.spawn_ground(archetype, lane, y, ctx, ids);
        self.wave.spawned += 1;

        let more_scheduled = self
            .wave_enemy_timer
            .is_some_and(|handle| self.timers.is_scheduled(handle));
        if self.wave.spawned >= self.rates.max_wave_size || !more_scheduled {
            self.end_wave(ctx.events);
        }
    }

    fn end_wave(&mut self, events: &mut Vec<Event>) {
        if !self.wave.active {
            return;
        }
        self.wave.active = false;
        if let Some(handle) = self.wave_enemy_timer.take() {
            let _ = self.timers.cancel(handle);
        }
        events.push(Event::WaveEnded {
            wave: self.wave.number,
            spawned: self.wave.spawned,
        });
        debug!(wave = self.wave.number, spawned = self.wave.spawned, "wave ended");
    }

    fn spawn_ground(
        &mut self,
        archetype: Archetype,
        lane: Lane,
        y: f32,
        ctx: &mut ActorContext<'_>,
        ids: &mut ActorIds,
    ) {
        let id = ids.allocate();
        let actor = GroundActor::spawn(
            id,
            archetype,
            lane,
            y,
            &self.layout,
            self.base_speed,
            &self.scoring,
        );
        self.actors.push(actor);
        ctx.events.push(Event::ActorSpawned {
            actor: id,
            kind: ActorKind::Ground(archetype),
            lane: Some(lane),
        });
        debug!(actor = id.get(), ?archetype, lane = lane.get(), "ground vehicle spawned");
    }

    fn advance_helicopter_cooldown(&mut self, ctx: &mut ActorContext<'_>, ids: &mut ActorIds) {
        if !self.rates.helicopter_enabled {
            return;
        }
        self.helicopter_timer += ctx.dt;
        if self.helicopter_timer < self.rates.helicopter_cooldown || self.helicopter.is_some() {
            return;
        }
        self.helicopter_timer = Duration::ZERO;

        let id = ids.allocate();
        let low = self.layout.margin() + HELICOPTER_EDGE;
        let high = self.layout.width() - self.layout.margin() - HELICOPTER_EDGE;
        let x = if high > low {
            ctx.rng.gen_range(low..=high)
        } else {
            self.layout.center_x()
        };
        let from_left = ctx.rng.gen_bool(0.5);
        self.helicopter = Some(Helicopter::spawn(id, x, &self.layout, from_left));

        ctx.effects.emit(Effect::Sound(Cue::Missile));
        ctx.effects.emit(Effect::Banner {
            text: "WARNING: HELICOPTER!".to_owned(),
            tone: TextTone::Warning,
        });
        ctx.events.push(Event::ActorSpawned {
            actor: id,
            kind: ActorKind::Helicopter,
            lane: None,
        });
        info!(actor = id.get(), "helicopter inbound");
    }

    fn advance_van_cooldown(&mut self, ctx: &mut ActorContext<'_>, ids: &mut ActorIds) {
        if !self.van_enabled {
            return;
        }
        self.van_timer += ctx.dt;
        if self.van_timer < self.rates.van_cooldown || self.van.is_some() {
            return;
        }
        self.van_timer = Duration::ZERO;

        let id = ids.allocate();
        self.van = Some(WeaponsVan::spawn(id, &self.layout, self.base_speed));
        ctx.effects.emit(Effect::Banner {
            text: "WEAPONS VAN AHEAD".to_owned(),
            tone: TextTone::Info,
        });
        ctx.events.push(Event::ActorSpawned {
            actor: id,
            kind: ActorKind::WeaponsVan,
            lane: None,
        });
        info!(actor = id.get(), "weapons van inbound");
    }

    fn cull(&mut self, events: &mut Vec<Event>) {
        let layout = &self.layout;
        self.actors.retain_mut(|actor| {
            if actor.is_active() && actor.is_off_road(layout) {
                actor.destroy();
                events.push(Event::ActorRemoved {
                    actor: actor.id(),
                    kind: actor.kind(),
                    cause: RemovalCause::LeftRoad,
                });
                return false;
            }
            true
        });

        if self
            .helicopter
            .as_ref()
            .is_some_and(|heli| !heli.is_active() && heli.has_drifted_out(layout))
        {
            if let Some(heli) = self.helicopter.take() {
                events.push(Event::ActorRemoved {
                    actor: heli.id(),
                    kind: ActorKind::Helicopter,
                    cause: RemovalCause::LeftRoad,
                });
            }
        }

        if self.van.as_ref().is_some_and(|van| !van.is_active()) {
            if let Some(van) = self.van.take() {
                events.push(Event::ActorRemoved {
                    actor: van.id(),
                    kind: ActorKind::WeaponsVan,
                    cause: RemovalCause::LeftRoad,
                });
            }
        }
    }

    /// Drops actors that were killed since the last tick.
    fn sweep(&mut self) {
        self.actors.retain(|actor| actor.is_active());
        if self.helicopter.as_ref().is_some_and(|heli| !heli.is_active()) {
            self.helicopter = None;
        }
    }

    /// Live-updates the civilian timer and the wave cooldown derived from `enemy`.
    pub fn set_spawn_rates(&mut self, enemy: Duration, civilian: Duration) {
        self.rates.enemy = enemy;
        self.set_civilian_rate(civilian);
        self.set_wave_cooldown(wave_cooldown_for(enemy));
    }

    /// Live-updates only the civilian timer.
    pub fn set_civilian_rate(&mut self, civilian: Duration) {
        self.rates.civilian = civilian;
        if let Some(handle) = self.civilian_timer {
            let _ = self.timers.set_interval(handle, civilian);
        }
    }

    fn set_wave_cooldown(&mut self, cooldown: Duration) {
        self.rates.wave_cooldown = cooldown;
        if let Some(handle) = self.wave_timer {
            let _ = self.timers.set_interval(handle, cooldown);
        }
    }

    /// Allows or forbids helicopter appearances.
    pub fn set_helicopter_enabled(&mut self, enabled: bool) {
        self.rates.helicopter_enabled = enabled;
    }

    /// Sets the accumulated time required between helicopters.
    pub fn set_helicopter_cooldown(&mut self, cooldown: Duration) {
        self.rates.helicopter_cooldown = cooldown;
    }

    /// Sets the accumulated time required between weapons vans.
    pub fn set_van_cooldown(&mut self, cooldown: Duration) {
        self.rates.van_cooldown = cooldown;
    }

    /// Sets the cap on concurrently active ground vehicles.
    pub fn set_max_vehicles(&mut self, max: u32) {
        self.rates.max_vehicles = max;
    }

    /// Sets the cap on enemies per wave.
    pub fn set_max_wave_size(&mut self, max: u32) {
        self.rates.max_wave_size = max;
    }

    /// Applies one difficulty bump and returns how many were applied so far.
    pub fn increase_difficulty(&mut self) -> u32 {
        self.difficulty_steps += 1;
        self.rates.difficulty_multiplier += 0.08;

        let civilian = self.rates.civilian.mul_f32(0.95).max(CIVILIAN_RATE_FLOOR);
        self.set_civilian_rate(civilian);

        if self.difficulty_steps % 2 == 0 {
            self.rates.max_wave_size = (self.rates.max_wave_size + 1).min(MAX_WAVE_CEILING);
        }

        let cooldown = self
            .rates
            .wave_cooldown
            .saturating_sub(DIFFICULTY_WAVE_STEP)
            .max(DIFFICULTY_WAVE_FLOOR);
        self.set_wave_cooldown(cooldown);

        self.rates.helicopter_cooldown = self
            .rates
            .helicopter_cooldown
            .saturating_sub(HELICOPTER_COOLDOWN_STEP)
            .max(HELICOPTER_COOLDOWN_FLOOR);

        debug!(
            steps = self.difficulty_steps,
            civilian_ms = self.rates.civilian.as_millis() as u64,
            wave_ms = self.rates.wave_cooldown.as_millis() as u64,
            max_wave = self.rates.max_wave_size,
            "difficulty increased"
        );
        self.difficulty_steps
    }

    /// Removes every ground vehicle, leaving the helicopter and van alone.
    pub fn clear(&mut self, events: &mut Vec<Event>) {
        for mut actor in self.actors.drain(..) {
            if actor.is_active() {
                actor.destroy();
                events.push(Event::ActorRemoved {
                    actor: actor.id(),
                    kind: actor.kind(),
                    cause: RemovalCause::Cleared,
                });
            }
        }
        self.end_wave(events);
        info!("traffic cleared");
    }

    /// Cancels every timer and releases every actor; returns whether the van was occupied.
    pub fn teardown(&mut self, events: &mut Vec<Event>) -> bool {
        self.timers.clear();
        self.civilian_timer = None;
        self.wave_timer = None;
        self.wave_enemy_timer = None;
        self.started = false;
        self.wave.active = false;

        for mut actor in self.actors.drain(..) {
            if actor.is_active() {
                actor.destroy();
                events.push(Event::ActorRemoved {
                    actor: actor.id(),
                    kind: actor.kind(),
                    cause: RemovalCause::Teardown,
                });
            }
        }
        if let Some(mut heli) = self.helicopter.take() {
            if heli.is_active() {
                heli.destroy();
                events.push(Event::ActorRemoved {
                    actor: heli.id(),
                    kind: ActorKind::Helicopter,
                    cause: RemovalCause::Teardown,
                });
            }
        }
        let mut occupied = false;
        if let Some(mut van) = self.van.take() {
            if van.is_active() {
                occupied = van.destroy();
                events.push(Event::ActorRemoved {
                    actor: van.id(),
                    kind: ActorKind::WeaponsVan,
                    cause: RemovalCause::Teardown,
                });
            }
        }
        self.detonations.clear();
        self.van_signals.clear();
        info!("traffic torn down");
        occupied
    }

    /// Number of ground vehicles still in play.
    #[must_use]
    pub fn active_vehicle_count(&self) -> usize {
        self.actors.iter().filter(|actor| actor.is_active()).count()
    }

    /// Ground vehicles, including ones killed this tick.
    #[must_use]
    pub fn actors(&self) -> &[GroundActor] {
        &self.actors
    }

    /// Mutable ground vehicles.
    pub fn actors_mut(&mut self) -> &mut [GroundActor] {
        &mut self.actors
    }

    /// The helicopter, when one is on screen.
    #[must_use]
    pub fn helicopter(&self) -> Option<&Helicopter> {
        self.helicopter.as_ref()
    }

    /// Mutable helicopter.
    pub fn helicopter_mut(&mut self) -> Option<&mut Helicopter> {
        self.helicopter.as_mut()
    }

    /// The weapons van, when one is on screen.
    #[must_use]
    pub fn van(&self) -> Option<&WeaponsVan> {
        self.van.as_ref()
    }

    /// Mutable weapons van.
    pub fn van_mut(&mut self) -> Option<&mut WeaponsVan> {
        self.van.as_mut()
    }

    /// Mutable access to every actor at once, for collision passes.
    pub fn parts_mut(&mut self) -> TrafficParts<'_> {
        TrafficParts {
            actors: &mut self.actors,
            helicopter: self.helicopter.as_mut(),
            van: self.van.as_mut(),
        }
    }

    /// Moves pending bomb blasts into `out`.
    pub fn drain_detonations(&mut self, out: &mut Vec<Detonation>) {
        out.append(&mut self.detonations);
    }

    /// Moves pending van requests into `out`.
    pub fn drain_van_signals(&mut self, out: &mut Vec<VanSignal>) {
        out.append(&mut self.van_signals);
    }

    /// Whether the start delay has elapsed.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Wave sub-scheduler state.
    #[must_use]
    pub const fn wave(&self) -> WaveStatus {
        self.wave
    }

    /// Rates and caps currently in force.
    #[must_use]
    pub const fn rates(&self) -> TrafficRates {
        self.rates
    }

    /// Difficulty bumps applied so far.
    #[must_use]
    pub const fn difficulty_steps(&self) -> u32 {
        self.difficulty_steps
    }

    /// Table used to pick wave archetypes.
    #[must_use]
    pub fn spawn_table(&self) -> &SpawnTable {
        &self.table
    }
}

fn wave_cooldown_for(enemy: Duration) -> Duration {
    enemy.mul_f32(1.5).max(MIN_WAVE_COOLDOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> TrafficDirector {
        TrafficDirector::new(
            &TrafficTuning::default(),
            RoadLayout::default(),
            200.0,
            ScoringTuning::default(),
            SpawnTable::default(),
        )
    }

    #[test]
    fn wave_cooldown_derives_from_enemy_rate() {
        assert_eq!(
            wave_cooldown_for(Duration::from_millis(6000)),
            Duration::from_millis(9000)
        );
        assert_eq!(
            wave_cooldown_for(Duration::from_millis(2000)),
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn difficulty_converges_to_documented_floors() {
        let mut traffic = director();
        for _ in 0..200 {
            let _ = traffic.increase_difficulty();
            let rates = traffic.rates();
            assert!(rates.civilian >= CIVILIAN_RATE_FLOOR);
            assert!(rates.wave_cooldown >= DIFFICULTY_WAVE_FLOOR);
            assert!(rates.helicopter_cooldown >= HELICOPTER_COOLDOWN_FLOOR);
            assert!(rates.max_wave_size <= MAX_WAVE_CEILING);
        }
        let rates = traffic.rates();
        assert_eq!(rates.civilian, CIVILIAN_RATE_FLOOR);
        assert_eq!(rates.wave_cooldown, DIFFICULTY_WAVE_FLOOR);
        assert_eq!(rates.helicopter_cooldown, HELICOPTER_COOLDOWN_FLOOR);
        assert_eq!(rates.max_wave_size, MAX_WAVE_CEILING);
        assert_eq!(traffic.difficulty_steps(), 200);
    }

    #[test]
    fn wave_size_grows_every_other_bump() {
        let mut traffic = director();
        let _ = traffic.increase_difficulty();
        assert_eq!(traffic.rates().max_wave_size, 2);
        let _ = traffic.increase_difficulty();
        assert_eq!(traffic.rates().max_wave_size, 3);
    }
}
