#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Road surface features: hazards to avoid and pickups to collect.
//!
//! Both kinds of feature are placed at a random lane centre above the
//! viewport and drift down with the road. This crate only schedules, moves
//! and retires them; the encounter resolver decides what happens when the
//! player drives over one.

/// Road hazards the player should avoid.
pub mod hazards;
/// Pickups the player can collect.
pub mod power_ups;

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use road_rush_core::{HazardKind, Lane, PowerUpKind, RoadLayout};
use road_rush_system_actors::ActorContext;
use road_rush_world::TimerQueue;
use tracing::debug;

pub use hazards::{Hazard, HazardEffect};
pub use power_ups::PowerUp;

const HAZARD_START: Duration = Duration::from_millis(5000);
const HAZARD_RATE_MS: u64 = 8000;
const HAZARD_SPAWN_Y: f32 = -50.0;
const HAZARD_CULL_MARGIN: f32 = 100.0;
const POWER_UP_START: Duration = Duration::from_millis(3000);
const POWER_UP_MIN_MS: u64 = 5000;
const POWER_UP_MAX_MS: u64 = 10_000;
const POWER_UP_SPAWN_Y: f32 = -30.0;
const POWER_UP_CULL_MARGIN: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoadsideTimer {
    StartHazards,
    NextHazard,
    NextPowerUp,
}

/// Scheduler and owner of every hazard and pickup on the road.
#[derive(Debug)]
pub struct Roadside {
    layout: RoadLayout,
    timers: TimerQueue<RoadsideTimer>,
    fired: Vec<RoadsideTimer>,
    hazards: Vec<Hazard>,
    power_ups: Vec<PowerUp>,
}

impl Roadside {
    /// Creates an empty road with the opening spawns scheduled.
    #[must_use]
    pub fn new(layout: RoadLayout) -> Self {
        let mut timers = TimerQueue::new();
        let _ = timers.once(HAZARD_START, RoadsideTimer::StartHazards);
        let _ = timers.once(POWER_UP_START, RoadsideTimer::NextPowerUp);
        Self {
            layout,
            timers,
            fired: Vec::new(),
            hazards: Vec::new(),
            power_ups: Vec::new(),
        }
    }

    /// Runs one tick: spawns that came due, then drift and retirement.
    pub fn update(&mut self, ctx: &mut ActorContext<'_>, level: u32) {
        self.hazards.retain(Hazard::is_active);
        self.power_ups.retain(PowerUp::is_active);

        self.fired.clear();
        self.timers.advance(ctx.dt, &mut self.fired);
        let fired = std::mem::take(&mut self.fired);
        for timer in &fired {
            match timer {
                RoadsideTimer::StartHazards => self.schedule_hazard(ctx),
                RoadsideTimer::NextHazard => {
                    self.spawn_hazard(ctx, level);
                    self.schedule_hazard(ctx);
                }
                RoadsideTimer::NextPowerUp => {
                    self.spawn_power_up(ctx);
                    let delay = ctx.rng.gen_range(POWER_UP_MIN_MS..=POWER_UP_MAX_MS);
                    let _ = self
                        .timers
                        .once(Duration::from_millis(delay), RoadsideTimer::NextPowerUp);
                }
            }
        }
        self.fired = fired;

        let height = self.layout.height();
        for hazard in &mut self.hazards {
            hazard.drift(ctx.dt, ctx.now, ctx.road_speed, height + HAZARD_CULL_MARGIN);
        }
        for power_up in &mut self.power_ups {
            power_up.drift(ctx.dt, ctx.road_speed, height + POWER_UP_CULL_MARGIN);
        }
    }

    fn schedule_hazard(&mut self, ctx: &mut ActorContext<'_>) {
        let low = HAZARD_RATE_MS * 7 / 10;
        let high = HAZARD_RATE_MS * 13 / 10;
        let delay = ctx.rng.gen_range(low..=high);
        let _ = self
            .timers
            .once(Duration::from_millis(delay), RoadsideTimer::NextHazard);
    }

    fn random_lane_center(&self, ctx: &mut ActorContext<'_>) -> f32 {
        let lane = Lane::new(ctx.rng.gen_range(0..self.layout.lanes()));
        self.layout.lane_center(lane)
    }

    fn spawn_hazard(&mut self, ctx: &mut ActorContext<'_>, level: u32) {
        let x = self.random_lane_center(ctx);
        let kind = hazards::pick_hazard(level, ctx.rng.gen());
        self.place_hazard(kind, Vec2::new(x, HAZARD_SPAWN_Y), ctx.now);
    }

    fn spawn_power_up(&mut self, ctx: &mut ActorContext<'_>) {
        let x = self.random_lane_center(ctx);
        let kind = power_ups::pick_power_up(ctx.rng.gen());
        self.place_power_up(kind, Vec2::new(x, POWER_UP_SPAWN_Y));
    }

    /// Puts a hazard on the road at `position`; its lifetime starts at `now`.
    pub fn place_hazard(&mut self, kind: HazardKind, position: Vec2, now: Duration) {
        self.hazards.push(Hazard::spawn(kind, position, now));
        debug!(?kind, x = position.x, y = position.y, "hazard placed");
    }

    /// Puts a pickup on the road at `position`.
    pub fn place_power_up(&mut self, kind: PowerUpKind, position: Vec2) {
        self.power_ups.push(PowerUp::spawn(kind, position));
        debug!(?kind, x = position.x, y = position.y, "power-up placed");
    }

    /// Cancels pending spawns and removes every feature.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.hazards.clear();
        self.power_ups.clear();
    }

    /// Hazards currently on the road.
    pub fn hazards(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter().filter(|hazard| hazard.is_active())
    }

    /// Mutable hazards currently on the road.
    pub fn hazards_mut(&mut self) -> impl Iterator<Item = &mut Hazard> {
        self.hazards.iter_mut().filter(|hazard| hazard.is_active())
    }

    /// Pickups currently on the road.
    pub fn power_ups(&self) -> impl Iterator<Item = &PowerUp> {
        self.power_ups.iter().filter(|power_up| power_up.is_active())
    }

    /// Mutable pickups currently on the road.
    pub fn power_ups_mut(&mut self) -> impl Iterator<Item = &mut PowerUp> {
        self.power_ups
            .iter_mut()
            .filter(|power_up| power_up.is_active())
    }
}
