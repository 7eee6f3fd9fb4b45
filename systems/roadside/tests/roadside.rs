use std::{collections::HashSet, time::Duration};

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use road_rush_core::{EffectLog, Event, HazardKind, Lane, RoadLayout};
use road_rush_system_actors::ActorContext;
use road_rush_system_roadside::Roadside;
use road_rush_world::player::PlayerView;

const DT: Duration = Duration::from_millis(50);

struct Harness {
    roadside: Roadside,
    layout: RoadLayout,
    rng: ChaCha8Rng,
    effects: EffectLog,
    now: Duration,
    road_speed: f32,
}

impl Harness {
    fn new(seed: u64, road_speed: f32) -> Self {
        let layout = RoadLayout::default();
        Self {
            roadside: Roadside::new(layout),
            layout,
            rng: ChaCha8Rng::seed_from_u64(seed),
            effects: EffectLog::new(),
            now: Duration::ZERO,
            road_speed,
        }
    }

    fn tick(&mut self, level: u32) {
        let mut events: Vec<Event> = Vec::new();
        self.now += DT;
        let mut ctx = ActorContext {
            now: self.now,
            dt: DT,
            road_speed: self.road_speed,
            base_speed: 200.0,
            player: PlayerView {
                position: Vec2::new(240.0, 540.0),
                speed: self.road_speed,
                active: true,
                invulnerable: false,
                in_van: false,
                lane: Some(Lane::new(2)),
            },
            layout: &self.layout,
            rng: &mut self.rng,
            effects: &mut self.effects,
            events: &mut events,
        };
        self.roadside.update(&mut ctx, level);
    }

    fn run(&mut self, duration: Duration, level: u32) {
        for _ in 0..(duration.as_millis() / DT.as_millis()) {
            self.tick(level);
        }
    }
}

#[test]
fn first_pickup_arrives_after_three_seconds() {
    let mut harness = Harness::new(1, 0.0);
    harness.run(Duration::from_millis(2950), 1);
    assert_eq!(harness.roadside.power_ups().count(), 0);
    harness.run(Duration::from_millis(50), 1);
    assert_eq!(harness.roadside.power_ups().count(), 1);
}

#[test]
fn hazards_wait_for_the_opening_delay_and_a_randomised_gap() {
    let mut harness = Harness::new(2, 0.0);
    harness.run(Duration::from_millis(10_550), 1);
    assert_eq!(harness.roadside.hazards().count(), 0);
    harness.run(Duration::from_millis(4_850), 1);
    assert_eq!(harness.roadside.hazards().count(), 1);
}

#[test]
fn pickups_drift_with_the_road_and_leave_below_it() {
    let mut harness = Harness::new(3, 200.0);
    harness.run(Duration::from_millis(3000), 1);
    let y = |harness: &Harness| {
        harness
            .roadside
            .power_ups()
            .next()
            .map(|pickup| pickup.body().position().y)
    };
    let spawned = y(&harness).expect("first pickup");
    assert!((spawned - -20.0).abs() < 1e-3);

    harness.run(Duration::from_secs(1), 1);
    let moved = y(&harness).expect("pickup still on the road");
    assert!((moved - 180.0).abs() < 1e-2);

    harness.run(Duration::from_secs(3), 1);
    assert_eq!(harness.roadside.power_ups().count(), 0);
}

#[test]
fn ice_only_appears_on_later_levels() {
    let kinds_seen = |level: u32| {
        let mut harness = Harness::new(4, 0.0);
        let mut kinds = HashSet::new();
        for _ in 0..(300_000 / DT.as_millis()) {
            harness.tick(level);
            kinds.extend(harness.roadside.hazards().map(|hazard| hazard.kind()));
        }
        kinds
    };

    let early = kinds_seen(1);
    assert!(!early.contains(&HazardKind::IcePatch));
    assert!(early.contains(&HazardKind::Pothole));

    let late = kinds_seen(5);
    assert!(late.contains(&HazardKind::IcePatch));
}

#[test]
fn teardown_clears_the_road_for_good() {
    let mut harness = Harness::new(5, 0.0);
    harness.run(Duration::from_secs(20), 2);
    assert!(harness.roadside.power_ups().count() > 0);

    harness.roadside.teardown();
    assert_eq!(harness.roadside.hazards().count(), 0);
    harness.run(Duration::from_secs(60), 2);
    assert_eq!(harness.roadside.hazards().count(), 0);
    assert_eq!(harness.roadside.power_ups().count(), 0);
}
