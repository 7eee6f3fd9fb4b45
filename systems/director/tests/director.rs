use std::time::Duration;

use road_rush_core::{
    ActorKind, Command, Event, GameMode, PlayerTuning, ScoringTuning, TuningConfig, Weapon,
};
use road_rush_director::{apply, query, Director};
use road_rush_system_progression::ProgressionState;

const DT: Duration = Duration::from_millis(50);

struct Run {
    director: Director,
    log: Vec<Event>,
}

impl Run {
    fn new(config: TuningConfig, mode: GameMode) -> Self {
        Self {
            director: Director::headless(config, mode).expect("valid configuration"),
            log: Vec::new(),
        }
    }

    fn durable(mode: GameMode) -> Self {
        Self::new(
            TuningConfig {
                player: PlayerTuning {
                    starting_lives: 99,
                    ..PlayerTuning::default()
                },
                ..TuningConfig::default()
            },
            mode,
        )
    }

    fn send(&mut self, command: Command) {
        apply(&mut self.director, command, &mut self.log);
    }

    fn drive(&mut self, duration: Duration, dt: Duration) {
        let ticks = duration.as_millis() / dt.as_millis();
        for _ in 0..ticks {
            self.send(Command::Tick { dt });
        }
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().filter(|event| predicate(event)).count()
    }

    fn position(&self, predicate: impl Fn(&Event) -> bool) -> Option<usize> {
        self.log.iter().position(predicate)
    }
}

#[test]
fn every_tick_reports_the_time_it_advanced() {
    let mut run = Run::durable(GameMode::Campaign);
    run.drive(Duration::from_secs(1), DT);
    assert_eq!(
        run.count(|event| *event == Event::TimeAdvanced { dt: DT }),
        20
    );
    assert_eq!(query::clock(&run.director), Duration::from_secs(1));
    assert_eq!(query::tick_index(&run.director), 20);
}

#[test]
fn distance_earns_points_before_traffic_arrives() {
    let mut run = Run::durable(GameMode::Campaign);
    run.drive(Duration::from_secs(1), DT);
    assert_eq!(query::player(&run.director).score(), 10);
    assert!(query::ground_actors(&run.director).next().is_none());
}

#[test]
fn traffic_waits_for_the_start_delay() {
    let mut run = Run::durable(GameMode::Campaign);
    run.drive(Duration::from_millis(2000), DT);
    assert_eq!(
        run.count(|event| matches!(event, Event::ActorSpawned { .. })),
        0
    );

    run.drive(Duration::from_secs(13), DT);
    assert!(run.count(|event| matches!(
        event,
        Event::ActorSpawned {
            kind: ActorKind::Ground(_),
            ..
        }
    )) > 0);
}

#[test]
fn difficulty_rises_every_thirty_seconds() {
    let mut run = Run::durable(GameMode::Campaign);
    run.drive(Duration::from_millis(29_950), DT);
    assert_eq!(query::difficulty_steps(&run.director), 0);

    run.drive(Duration::from_millis(50), DT);
    assert_eq!(query::difficulty_steps(&run.director), 1);
    assert_eq!(
        run.count(|event| *event == Event::DifficultyIncreased { steps: 1 }),
        1
    );
}

#[test]
fn weapons_fire_through_commands() {
    let mut run = Run::durable(GameMode::Campaign);
    run.send(Command::SelectWeapon {
        weapon: Weapon::Missile,
    });
    run.send(Command::FireWeapon);
    run.send(Command::FireWeapon);

    let player = query::player(&run.director);
    assert_eq!(player.ammo(Weapon::Missile), Some(4));
    assert_eq!(
        query::player_shots(&run.director)
            .group(Weapon::Missile)
            .map(|group| group.active_count()),
        Some(1)
    );

    run.drive(Duration::from_millis(500), DT);
    run.send(Command::FireWeapon);
    assert_eq!(query::player(&run.director).ammo(Weapon::Missile), Some(3));
}

#[test]
fn smoke_screen_protects_the_player() {
    let mut run = Run::durable(GameMode::Campaign);
    run.send(Command::SelectWeapon {
        weapon: Weapon::SmokeScreen,
    });
    run.send(Command::FireWeapon);
    assert!(query::player(&run.director).is_invulnerable());
    assert_eq!(
        query::player(&run.director).ammo(Weapon::SmokeScreen),
        Some(1)
    );
}

#[test]
fn scoring_through_the_first_threshold_brings_the_first_boss() {
    let mut run = Run::new(
        TuningConfig {
            player: PlayerTuning {
                starting_lives: 99,
                ..PlayerTuning::default()
            },
            scoring: ScoringTuning {
                distance_points_per_second: 1000.0,
                ..ScoringTuning::default()
            },
            ..TuningConfig::default()
        },
        GameMode::Campaign,
    );
    run.drive(Duration::from_secs(5), DT);

    let advanced = run
        .position(|event| matches!(event, Event::LevelAdvanced { level: 2, .. }))
        .expect("level two reached");
    let boss = run
        .position(|event| matches!(event, Event::BossSpawned { .. }))
        .expect("boss spawned");
    assert!(advanced < boss);
    assert_eq!(query::level_number(&run.director), 2);
    assert_eq!(query::phase(&run.director), ProgressionState::BossActive);
    assert!(query::boss(&run.director).is_some());
    assert_eq!(query::traffic_rates(&run.director).max_vehicles, 4);
}

#[test]
fn endless_runs_climb_tiers_with_time() {
    let mut run = Run::durable(GameMode::Endless);
    assert!(!query::traffic_rates(&run.director).helicopter_enabled);

    run.drive(Duration::from_secs(46), DT);
    assert_eq!(query::tier(&run.director), 2);
    assert_eq!(
        run.count(|event| *event == Event::DifficultyTierRaised { tier: 2 }),
        1
    );
    assert!(query::traffic_rates(&run.director).helicopter_enabled);
}

#[test]
fn a_slow_frame_rate_thins_traffic_until_it_recovers() {
    let mut run = Run::durable(GameMode::Campaign);
    run.drive(Duration::from_secs(10), Duration::from_millis(50));
    assert!(query::performance_mode(&run.director));
    assert_eq!(query::traffic_rates(&run.director).max_vehicles, 2);
    assert_eq!(
        query::traffic_rates(&run.director).civilian,
        Duration::from_millis(5850)
    );

    run.drive(Duration::from_secs(6), Duration::from_millis(10));
    assert!(!query::performance_mode(&run.director));
    assert_eq!(query::traffic_rates(&run.director).max_vehicles, 3);
    assert_eq!(
        run.count(|event| matches!(event, Event::PerformanceModeChanged { .. })),
        2
    );
}

#[test]
fn teardown_empties_the_road_and_stops_the_run() {
    let mut run = Run::durable(GameMode::Campaign);
    run.drive(Duration::from_secs(20), DT);
    run.send(Command::Teardown);

    assert!(!query::is_running(&run.director));
    assert!(query::ground_actors(&run.director).next().is_none());
    assert!(query::helicopter(&run.director).is_none());
    assert!(query::weapons_van(&run.director).is_none());
    assert!(query::boss(&run.director).is_none());
    assert_eq!(query::hazards(&run.director).count(), 0);
    assert_eq!(query::power_ups(&run.director).count(), 0);
    assert!(query::player(&run.director).van().is_none());

    run.log.clear();
    run.drive(Duration::from_secs(5), DT);
    assert!(run
        .log
        .iter()
        .all(|event| matches!(event, Event::TimeAdvanced { .. })));
}
