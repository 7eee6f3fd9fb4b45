use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use road_rush_core::{
    ActorId, ActorKind, Archetype, BossKind, EffectLog, Event, HazardKind, Lane, PlayerTuning,
    PowerUpKind, RemovalCause, RoadLayout, ScoringTuning, Weapon, WeaponTuning,
};
use road_rush_system_actors::{
    ActorContext, Boss, Combatant, Detonation, GroundActor, Helicopter, VanSignal, VanState,
    WeaponsVan,
};
use road_rush_system_encounter::{Arena, EncounterResolver, Resolution};
use road_rush_system_roadside::Roadside;
use road_rush_world::{player::Player, projectiles::PlayerShots};

const DT: Duration = Duration::from_millis(100);

struct Scene {
    layout: RoadLayout,
    rng: ChaCha8Rng,
    effects: EffectLog,
    events: Vec<Event>,
    now: Duration,
    player: Player,
    shots: PlayerShots,
    ground: Vec<GroundActor>,
    helicopter: Option<Helicopter>,
    van: Option<WeaponsVan>,
    boss: Option<Boss>,
    roadside: Roadside,
    detonations: Vec<Detonation>,
    van_signals: Vec<VanSignal>,
    resolver: EncounterResolver,
}

impl Scene {
    fn new() -> Self {
        Self::with_tuning(PlayerTuning::default())
    }

    fn with_tuning(tuning: PlayerTuning) -> Self {
        let layout = RoadLayout::default();
        Self {
            layout,
            rng: ChaCha8Rng::seed_from_u64(11),
            effects: EffectLog::new(),
            events: Vec::new(),
            now: Duration::ZERO,
            player: Player::new(tuning, WeaponTuning::default(), layout, 200.0),
            shots: PlayerShots::new(),
            ground: Vec::new(),
            helicopter: None,
            van: None,
            boss: None,
            roadside: Roadside::new(layout),
            detonations: Vec::new(),
            van_signals: Vec::new(),
            resolver: EncounterResolver::new(),
        }
    }

    fn spawn(&mut self, id: u32, archetype: Archetype, at: Vec2) -> usize {
        let mut actor = GroundActor::spawn(
            ActorId::new(id),
            archetype,
            Lane::new(0),
            at.y,
            &self.layout,
            200.0,
            &ScoringTuning::default(),
        );
        actor.nudge(at.x - actor.body().position().x);
        self.ground.push(actor);
        self.ground.len() - 1
    }

    fn fire(&mut self, weapon: Weapon, at: Vec2) {
        let group = self.shots.group_mut(weapon).expect("projectile weapon");
        assert!(group.fire(at, Vec2::ZERO, None));
    }

    /// Lets time pass without resolving anything.
    fn wait(&mut self, duration: Duration) {
        self.now += duration;
        self.player.tick(self.now, Duration::ZERO, 0.0);
    }

    fn drive_van(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.now += DT;
            self.player.tick(self.now, Duration::ZERO, 0.0);
            let Some(van) = self.van.as_mut() else {
                return;
            };
            let mut ctx = ActorContext {
                now: self.now,
                dt: DT,
                road_speed: 200.0,
                base_speed: 200.0,
                player: self.player.view(),
                layout: &self.layout,
                rng: &mut self.rng,
                effects: &mut self.effects,
                events: &mut self.events,
            };
            van.update(&mut ctx);
            van.integrate(DT);
            van.drain_signals(&mut self.van_signals);
        }
    }

    fn resolve(&mut self) -> Resolution {
        self.events.clear();
        let mut ctx = ActorContext {
            now: self.now,
            dt: DT,
            road_speed: 200.0,
            base_speed: 200.0,
            player: self.player.view(),
            layout: &self.layout,
            rng: &mut self.rng,
            effects: &mut self.effects,
            events: &mut self.events,
        };
        let arena = Arena {
            player: &mut self.player,
            shots: &mut self.shots,
            ground: &mut self.ground,
            helicopter: self.helicopter.as_mut(),
            van: self.van.as_mut(),
            boss: self.boss.as_mut(),
            roadside: &mut self.roadside,
            detonations: &self.detonations,
            van_signals: &self.van_signals,
        };
        let resolution = self.resolver.resolve(arena, &mut ctx);
        self.detonations.clear();
        self.van_signals.clear();
        resolution
    }

    fn player_position(&self) -> Vec2 {
        self.player.position()
    }
}

#[test]
fn bullets_wear_an_enemy_down_and_the_kill_is_scored_once() {
    let mut scene = Scene::new();
    let at = Vec2::new(160.0, 200.0);
    let chaser = scene.spawn(1, Archetype::Chaser, at);

    scene.fire(Weapon::MachineGun, at);
    let first = scene.resolve();
    assert_eq!(first.kills, 0);
    assert_eq!(scene.ground[chaser].vitals().health(), 1);
    assert_eq!(scene.shots.group(Weapon::MachineGun).map(|g| g.active_count()), Some(0));

    scene.fire(Weapon::MachineGun, at);
    let second = scene.resolve();
    assert_eq!(second.kills, 1);
    assert!(!scene.ground[chaser].is_active());
    assert_eq!(scene.player.score(), 100);
    assert!(scene.events.contains(&Event::ActorRemoved {
        actor: ActorId::new(1),
        kind: ActorKind::Ground(Archetype::Chaser),
        cause: RemovalCause::Killed,
    }));
    assert!(scene.events.contains(&Event::ScoreChanged { score: 100 }));

    scene.fire(Weapon::MachineGun, at);
    let third = scene.resolve();
    assert_eq!(third.kills, 0);
    assert_eq!(scene.player.score(), 100);
    assert_eq!(scene.shots.group(Weapon::MachineGun).map(|g| g.active_count()), Some(1));
}

#[test]
fn a_missile_hits_for_three() {
    let mut scene = Scene::new();
    let at = Vec2::new(320.0, 150.0);
    let armored = scene.spawn(1, Archetype::Armored, at);

    scene.fire(Weapon::Missile, at);
    let _ = scene.resolve();
    assert_eq!(scene.ground[armored].vitals().health(), 2);

    scene.fire(Weapon::Missile, at);
    let resolution = scene.resolve();
    assert_eq!(resolution.kills, 1);
    assert_eq!(scene.player.score(), 200);
}

#[test]
fn a_shot_only_hits_one_target() {
    let mut scene = Scene::new();
    let at = Vec2::new(160.0, 200.0);
    let first = scene.spawn(1, Archetype::Motorcycle, at);
    let second = scene.spawn(2, Archetype::Motorcycle, at + Vec2::new(0.0, 200.0));

    scene.fire(Weapon::MachineGun, at);
    let resolution = scene.resolve();
    assert_eq!(resolution.kills, 1);
    assert!(!scene.ground[first].is_active());
    assert!(scene.ground[second].is_active());
}

#[test]
fn side_contact_rams_the_player_sideways() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    let chaser = scene.spawn(1, Archetype::Chaser, player + Vec2::new(30.0, 0.0));

    let _ = scene.resolve();
    assert!((scene.player_position().x - (player.x - 15.0)).abs() < 1e-3);
    assert_eq!(scene.player.health(), 80);
    assert_eq!(scene.ground[chaser].vitals().health(), 1);
    assert!(scene.events.contains(&Event::PlayerDamaged {
        amount: 20,
        health: 80
    }));
}

#[test]
fn head_on_contact_hurts_both_cars_more() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    let blocker = scene.spawn(1, Archetype::Blocker, player - Vec2::new(0.0, 50.0));

    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 70);
    assert_eq!(scene.ground[blocker].vitals().health(), 1);
    assert!((scene.player_position().x - player.x).abs() < 1e-3);
}

#[test]
fn hitting_a_civilian_destroys_it_and_costs_points() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    let civilian = scene.spawn(1, Archetype::Civilian, player + Vec2::new(30.0, 0.0));

    let resolution = scene.resolve();
    assert_eq!(resolution.kills, 1);
    assert!(!scene.ground[civilian].is_active());
    assert_eq!(scene.player.health(), 70);
    assert_eq!(scene.player.score(), -50);
    assert!(scene.events.contains(&Event::ScoreChanged { score: -50 }));
}

#[test]
fn an_invulnerable_player_passes_through_traffic() {
    let mut scene = Scene::new();
    scene.player.grant_invulnerability(Duration::from_secs(2));
    let player = scene.player_position();
    let chaser = scene.spawn(1, Archetype::Chaser, player);

    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 100);
    assert_eq!(scene.ground[chaser].vitals().health(), 2);
    assert!(scene.events.is_empty());
}

#[test]
fn only_the_first_contact_of_a_tick_lands() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    let _ = scene.spawn(1, Archetype::Chaser, player - Vec2::new(0.0, 50.0));
    let _ = scene.spawn(2, Archetype::Chaser, player + Vec2::new(0.0, 50.0));

    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 70);
}

#[test]
fn hostile_shots_are_absorbed_while_protected() {
    let mut scene = Scene::new();
    let shooter = scene.spawn(1, Archetype::Shooter, Vec2::new(80.0, 100.0));
    let target = scene.player_position();
    let group = scene.ground[shooter].projectiles_mut().expect("shooter is armed");
    assert!(group.fire(target, Vec2::ZERO, None));
    assert!(group.fire(target, Vec2::ZERO, None));

    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 85);
    assert_eq!(
        scene.ground[shooter].projectiles().map(|g| g.active_count()),
        Some(0)
    );
    let damage_events = scene
        .events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .count();
    assert_eq!(damage_events, 1);
}

#[test]
fn bomb_blasts_hurt_only_within_their_radius() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    scene.detonations.push(Detonation {
        at: player + Vec2::new(70.0, 0.0),
        radius: 60.0,
        damage: 35,
    });
    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 100);

    scene.detonations.push(Detonation {
        at: player + Vec2::new(50.0, 0.0),
        radius: 60.0,
        damage: 35,
    });
    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 65);
}

#[test]
fn the_last_life_ends_the_game() {
    let mut scene = Scene::with_tuning(PlayerTuning {
        starting_lives: 1,
        ..PlayerTuning::default()
    });
    let player = scene.player_position();
    for _ in 0..3 {
        scene.detonations.push(Detonation {
            at: player,
            radius: 60.0,
            damage: 35,
        });
        let _ = scene.resolve();
        scene.wait(Duration::from_millis(1000));
    }
    assert!(!scene.player.is_active());
    assert!(scene.events.contains(&Event::GameOver { score: 0 }));
    assert!(scene.events.contains(&Event::LivesChanged { lives: 0 }));
}

#[test]
fn overlapping_vehicles_are_pushed_apart() {
    let mut scene = Scene::new();
    let left = scene.spawn(1, Archetype::Civilian, Vec2::new(200.0, 100.0));
    let right = scene.spawn(2, Archetype::Civilian, Vec2::new(210.0, 100.0));

    let _ = scene.resolve();
    assert!((scene.ground[left].body().position().x - 195.0).abs() < 1e-3);
    assert!((scene.ground[right].body().position().x - 215.0).abs() < 1e-3);
}

#[test]
fn oil_spins_a_car_out_before_it_takes_damage() {
    let mut scene = Scene::new();
    let at = Vec2::new(320.0, 200.0);
    let chaser = scene.spawn(1, Archetype::Chaser, at);
    scene.fire(Weapon::OilSlick, at);

    let _ = scene.resolve();
    assert!(scene.ground[chaser].is_spinning());
    assert_eq!(scene.ground[chaser].vitals().health(), 2);

    scene.wait(Duration::from_millis(500));
    let _ = scene.resolve();
    assert_eq!(scene.ground[chaser].vitals().health(), 1);
}

#[test]
fn a_hazard_applies_once_per_contact() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    scene
        .roadside
        .place_hazard(HazardKind::Pothole, player, scene.now);

    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 90);
    assert!((scene.player.speed() - 140.0).abs() < 1e-3);
    assert!(scene.events.contains(&Event::HazardTriggered {
        kind: HazardKind::Pothole
    }));

    scene.wait(Duration::from_millis(1500));
    let _ = scene.resolve();
    assert_eq!(scene.player.health(), 90);
    assert!(scene.events.is_empty());
}

#[test]
fn pickups_are_collected_once() {
    let mut scene = Scene::new();
    let player = scene.player_position();
    scene
        .roadside
        .place_power_up(PowerUpKind::ScoreBonus, player);
    scene
        .roadside
        .place_power_up(PowerUpKind::ExtraLife, player + Vec2::new(0.0, 10.0));

    let _ = scene.resolve();
    assert_eq!(scene.player.score(), 500);
    assert_eq!(scene.player.lives(), 4);
    assert!(scene.events.contains(&Event::PowerUpCollected {
        kind: PowerUpKind::ScoreBonus
    }));
    assert!(scene.events.contains(&Event::ScoreChanged { score: 500 }));
    assert!(scene.events.contains(&Event::LivesChanged { lives: 4 }));
    assert_eq!(scene.roadside.power_ups().count(), 0);

    let _ = scene.resolve();
    assert_eq!(scene.player.score(), 500);
}

#[test]
fn the_van_seats_restocks_and_ejects_the_player() {
    let mut scene = Scene::new();
    scene.van = Some(WeaponsVan::spawn(ActorId::new(9), &scene.layout, 200.0));
    let _ = scene.player.take_damage(60);
    scene.wait(Duration::from_millis(1000));
    let missiles = scene.player.ammo(Weapon::Missile);

    scene.drive_van(20);
    let van_at = scene.van.as_ref().map(|van| van.body().position()).expect("van");
    assert!((van_at.y - 150.0).abs() < 1e-3);
    scene.player.place(van_at + Vec2::new(0.0, 50.0));
    let _ = scene.resolve();
    assert_eq!(scene.player.van(), Some(ActorId::new(9)));
    assert!(scene.events.contains(&Event::PlayerEnteredVan {
        van: ActorId::new(9)
    }));

    let mut granted = 0;
    let mut left = false;
    for _ in 0..40 {
        scene.drive_van(1);
        let _ = scene.resolve();
        granted += scene
            .events
            .iter()
            .filter(|event| **event == Event::SuppliesGranted)
            .count();
        if scene.events.contains(&Event::PlayerLeftVan {
            van: ActorId::new(9),
        }) {
            left = true;
            break;
        }
        let seat = scene.van.as_ref().map(WeaponsVan::seat_position);
        assert_eq!(Some(scene.player_position()), seat);
    }
    assert!(left, "player was never ejected");
    assert_eq!(granted, 1);
    assert_eq!(scene.player.van(), None);
    assert!(scene.player.is_invulnerable());
    assert_eq!(scene.player.health(), 90);
    assert!(scene.player.ammo(Weapon::Missile) > missiles);
    assert_eq!(
        scene.van.as_ref().map(WeaponsVan::state),
        Some(VanState::DrivingAway)
    );
}

#[test]
fn a_vanished_van_releases_its_passenger() {
    let mut scene = Scene::new();
    scene.player.enter_van(ActorId::new(9), 60.0);

    let _ = scene.resolve();
    assert_eq!(scene.player.van(), None);
    assert!(scene.events.contains(&Event::PlayerLeftVan {
        van: ActorId::new(9)
    }));
    assert!(scene.player.is_invulnerable());
}

#[test]
fn a_boss_can_be_shot_while_it_enters_and_its_defeat_is_reported() {
    let mut scene = Scene::new();
    let boss = Boss::spawn(ActorId::new(5), BossKind::ArmoredTruck, &scene.layout, 200.0);
    let at = boss.body().position();
    let health = boss.vitals().health();
    scene.boss = Some(boss);
    assert!(scene.boss.as_ref().is_some_and(Boss::is_entering));

    let volleys = (health as u32).div_ceil(3);
    for _ in 0..volleys - 1 {
        scene.fire(Weapon::Missile, at);
    }
    let resolution = scene.resolve();
    assert_eq!(resolution.boss_defeated, None);

    scene.fire(Weapon::Missile, at);
    let resolution = scene.resolve();
    assert_eq!(resolution.boss_defeated, Some(ActorId::new(5)));
    assert!(scene
        .events
        .iter()
        .any(|event| matches!(event, Event::BossDefeated { actor, .. } if *actor == ActorId::new(5))));
    assert!(scene.player.score() > 0);
}
