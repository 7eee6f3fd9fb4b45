#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Encounter resolver reconciling every overlap on the road.
//!
//! The resolver runs once per tick after all actors have moved. Each pass
//! checks that both participants are still active before acting, so an actor
//! killed earlier in the tick can neither deal nor absorb damage. Kills are
//! only recorded during the passes; scoring, effects and removal events are
//! applied together at the end.

/// Contact classification between the player and other bodies.
pub mod contact;
pub mod supplies;

use std::time::Duration;

use glam::Vec2;
use road_rush_core::{
    ActorId, ActorKind, Cue, Effect, Event, PowerUpKind, RemovalCause, TextTone, Weapon,
};
use road_rush_system_actors::{
    ActorContext, Boss, Combatant, Detonation, GroundActor, Helicopter, VanSignal, WeaponsVan,
    EJECT_GRACE, SEATED_SPEED_FACTOR,
};
use road_rush_system_roadside::{power_ups, Roadside};
use road_rush_world::{
    player::{DamageOutcome, Player},
    projectiles::{PlayerShots, ProjectileGroup},
    Body,
};
use tracing::{debug, info};

use crate::contact::Contact;

/// Damage of one machine gun bullet.
pub const BULLET_DAMAGE: u32 = 1;
/// Damage of one missile.
pub const MISSILE_DAMAGE: u32 = 3;
/// Damage to the player from a side ram.
pub const RAM_PLAYER_DAMAGE: u32 = 20;
/// Damage to the rammed vehicle.
pub const RAM_ENEMY_DAMAGE: u32 = 1;
/// Sideways velocity given to the player by a ram.
pub const RAM_IMPULSE: f32 = 150.0;
/// Immediate sideways displacement of the player by a ram.
pub const RAM_DISPLACEMENT: f32 = 15.0;
/// Damage to the player from a head-on or rear-end hit.
pub const FRONTAL_PLAYER_DAMAGE: u32 = 30;
/// Damage to the other vehicle in a head-on or rear-end hit.
pub const FRONTAL_ENEMY_DAMAGE: u32 = 2;
/// Damage of a projectile fired by a shooter or a boss.
pub const HOSTILE_SHOT_DAMAGE: u32 = 15;
/// How long an oil slick spins a vehicle before it takes damage.
pub const OIL_SPIN_OUT: Duration = Duration::from_millis(500);
/// Damage taken by a vehicle at the end of an oil spin-out.
pub const OIL_SPIN_DAMAGE: u32 = 1;
/// Horizontal push applied to each of two overlapping vehicles.
pub const SEPARATION: f32 = 5.0;
/// Spin-out of the player caused by a hazard.
pub const HAZARD_SPIN_OUT: Duration = Duration::from_millis(500);

/// Mutable view of everything the resolver reconciles in one tick.
#[derive(Debug)]
pub struct Arena<'a> {
    /// The player car.
    pub player: &'a mut Player,
    /// Projectiles fired by the player.
    pub shots: &'a mut PlayerShots,
    /// Ground vehicles, including ones killed this tick.
    pub ground: &'a mut [GroundActor],
    /// The helicopter, when present.
    pub helicopter: Option<&'a mut Helicopter>,
    /// The weapons van, when present.
    pub van: Option<&'a mut WeaponsVan>,
    /// The boss, when present.
    pub boss: Option<&'a mut Boss>,
    /// Hazards and pickups.
    pub roadside: &'a mut Roadside,
    /// Bomb blasts produced this tick.
    pub detonations: &'a [Detonation],
    /// Requests made by the weapons van this tick.
    pub van_signals: &'a [VanSignal],
}

/// Summary of one resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Actors killed this tick.
    pub kills: u32,
    /// Boss killed this tick, to be reported to progression.
    pub boss_defeated: Option<ActorId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Kill {
    actor: ActorId,
    kind: ActorKind,
    points: i64,
    at: Vec2,
}

impl Kill {
    fn of<C: Combatant + ?Sized>(combatant: &C) -> Self {
        Self {
            actor: combatant.id(),
            kind: combatant.kind(),
            points: combatant.points(),
            at: combatant.body().position(),
        }
    }
}

/// Collision and damage reconciliation between the player and the road.
#[derive(Debug, Default)]
pub struct EncounterResolver {
    kills: Vec<Kill>,
    score_changed: bool,
}

impl EncounterResolver {
    /// Creates a resolver with no pending kills.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every interaction of the tick.
    pub fn resolve(&mut self, mut arena: Arena<'_>, ctx: &mut ActorContext<'_>) -> Resolution {
        self.kills.clear();
        self.score_changed = false;

        self.resolve_van(&mut arena, ctx);
        self.resolve_player_fire(&mut arena, ctx);
        self.resolve_oil(&mut arena, ctx.now);
        self.resolve_traffic_contact(&mut arena, ctx);
        resolve_boss_contact(&mut arena, ctx);
        resolve_hostile_fire(&mut arena, ctx);
        resolve_detonations(&mut arena, ctx);
        separate(arena.ground);
        resolve_hazards(&mut arena, ctx);
        self.resolve_power_ups(&mut arena, ctx);

        let resolution = self.apply_kills(arena.player, ctx);
        if self.score_changed {
            ctx.events.push(Event::ScoreChanged {
                score: arena.player.score(),
            });
        }
        resolution
    }

    fn resolve_van(&mut self, arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
        let player = &mut *arena.player;
        for signal in arena.van_signals {
            match *signal {
                VanSignal::SuppliesReady { van } if player.van() == Some(van) => {
                    supplies::restock_from_van(player);
                    ctx.events.push(Event::SuppliesGranted);
                    debug!(van = van.get(), "player restocked");
                }
                VanSignal::Ejected { van, at } if player.van() == Some(van) => {
                    if let Some(left) = player.leave_van(at, EJECT_GRACE) {
                        ctx.events.push(Event::PlayerLeftVan { van: left });
                        debug!(van = left.get(), "player ejected from van");
                    }
                }
                _ => {}
            }
        }

        if let Some(seated) = player.van() {
            let van = arena
                .van
                .as_deref()
                .filter(|van| van.is_active() && van.id() == seated);
            match van {
                Some(van) => player.ride_at(van.seat_position()),
                None => {
                    let at = Vec2::new(ctx.layout.center_x(), ctx.layout.height() - 100.0);
                    if let Some(left) = player.leave_van(at, EJECT_GRACE) {
                        ctx.events.push(Event::PlayerLeftVan { van: left });
                        debug!(van = left.get(), "van vanished with the player inside");
                    }
                }
            }
            return;
        }

        if !player.is_active() {
            return;
        }
        let Some(van) = arena.van.as_deref_mut() else {
            return;
        };
        if !van.is_active() || !van.body().overlaps(player.body()) {
            return;
        }
        if van.try_enter(&player.view(), ctx.effects) {
            player.enter_van(van.id(), ctx.base_speed * SEATED_SPEED_FACTOR);
            ctx.events.push(Event::PlayerEnteredVan { van: van.id() });
            info!(van = van.id().get(), "player entered weapons van");
        }
    }

    fn resolve_player_fire(&mut self, arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
        for (weapon, damage, cue) in [
            (Weapon::MachineGun, BULLET_DAMAGE, Cue::EnemyHit),
            (Weapon::Missile, MISSILE_DAMAGE, Cue::Explosion),
        ] {
            let Some(group) = arena.shots.group_mut(weapon) else {
                continue;
            };
            for shot in group.iter_active_mut() {
                let body = *shot.body();
                let struck = strike(
                    &body,
                    damage,
                    arena.ground,
                    arena.helicopter.as_deref_mut(),
                    arena.boss.as_deref_mut(),
                    &mut self.kills,
                    ctx,
                );
                if struck {
                    shot.deactivate();
                    ctx.effects.emit(Effect::Sound(cue));
                }
            }
        }
    }

    fn resolve_oil(&mut self, arena: &mut Arena<'_>, now: Duration) {
        if let Some(oil) = arena.shots.group(Weapon::OilSlick) {
            for slick in oil.iter_active() {
                for actor in arena.ground.iter_mut() {
                    if actor.is_active() && actor.body().overlaps(slick.body()) {
                        let _ = actor.start_spin_out(now, OIL_SPIN_OUT);
                    }
                }
            }
        }
        for actor in arena.ground.iter_mut() {
            if actor.finish_spin_out(now) && actor.take_damage(OIL_SPIN_DAMAGE) {
                self.kills.push(Kill::of(&*actor));
            }
        }
    }

    fn resolve_traffic_contact(&mut self, arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
        let player = &mut *arena.player;
        for actor in arena.ground.iter_mut() {
            if !player.is_active() || player.is_invulnerable() {
                return;
            }
            if !actor.is_active() || !actor.body().overlaps(player.body()) {
                continue;
            }
            ctx.effects.emit(Effect::DamageFlash);
            ctx.effects.emit(Effect::Sound(Cue::Hit));

            let civilian = actor.archetype().is_civilian();
            let (player_damage, enemy_damage) =
                match contact::classify(player.position(), actor.body().position(), civilian) {
                    Contact::Ram { direction } => {
                        player.shove(direction, RAM_IMPULSE, RAM_DISPLACEMENT);
                        ctx.effects.emit(Effect::FloatingText {
                            at: player.position(),
                            text: "RAMMED!".to_owned(),
                            tone: TextTone::Warning,
                        });
                        (RAM_PLAYER_DAMAGE, RAM_ENEMY_DAMAGE)
                    }
                    Contact::Frontal if civilian => (FRONTAL_PLAYER_DAMAGE, u32::MAX),
                    Contact::Frontal => (FRONTAL_PLAYER_DAMAGE, FRONTAL_ENEMY_DAMAGE),
                };

            let _ = hurt_player(player, player_damage, ctx);
            if actor.take_damage(enemy_damage) {
                self.kills.push(Kill::of(&*actor));
            }
        }
    }

    fn resolve_power_ups(&mut self, arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
        let player = &mut *arena.player;
        for pickup in arena.roadside.power_ups_mut() {
            if !player.is_active() || player.van().is_some() {
                return;
            }
            if !pickup.body().overlaps(player.body()) {
                continue;
            }
            let Some(kind) = pickup.collect() else {
                continue;
            };
            supplies::apply_power_up(player, kind);
            ctx.effects.emit(Effect::Sound(Cue::PowerUp));
            ctx.effects.emit(Effect::FloatingText {
                at: pickup.body().position() - Vec2::new(0.0, 20.0),
                text: power_ups::collect_text(kind).to_owned(),
                tone: TextTone::Reward,
            });
            ctx.events.push(Event::PowerUpCollected { kind });
            match kind {
                PowerUpKind::ScoreBonus => self.score_changed = true,
                PowerUpKind::ExtraLife => ctx.events.push(Event::LivesChanged {
                    lives: player.lives(),
                }),
                _ => {}
            }
            debug!(?kind, "power-up collected");
        }
    }

    fn apply_kills(&mut self, player: &mut Player, ctx: &mut ActorContext<'_>) -> Resolution {
        let mut resolution = Resolution::default();
        for kill in self.kills.drain(..) {
            resolution.kills += 1;
            player.add_score(kill.points);
            self.score_changed = true;

            let scale = match kill.kind {
                ActorKind::Ground(_) | ActorKind::WeaponsVan => 1.0,
                ActorKind::Helicopter | ActorKind::Boss(_) => 1.5,
            };
            ctx.effects.emit(Effect::Explosion { at: kill.at, scale });
            ctx.effects.emit(Effect::Sound(Cue::Explosion));
            ctx.effects.emit(Effect::FloatingText {
                at: kill.at,
                text: format!("{:+}", kill.points),
                tone: if kill.points < 0 {
                    TextTone::Penalty
                } else {
                    TextTone::Reward
                },
            });

            if let ActorKind::Boss(kind) = kill.kind {
                ctx.effects.emit(Effect::ScreenShake {
                    duration: Duration::from_millis(500),
                    intensity: 0.02,
                });
                ctx.effects.emit(Effect::Banner {
                    text: "BOSS DEFEATED!".to_owned(),
                    tone: TextTone::Reward,
                });
                ctx.events.push(Event::BossDefeated {
                    actor: kill.actor,
                    kind,
                    points: kill.points,
                });
                resolution.boss_defeated = Some(kill.actor);
                info!(actor = kill.actor.get(), boss = kind.name(), "boss defeated");
            } else {
                debug!(actor = kill.actor.get(), kind = ?kill.kind, points = kill.points, "actor killed");
            }
            ctx.events.push(Event::ActorRemoved {
                actor: kill.actor,
                kind: kill.kind,
                cause: RemovalCause::Killed,
            });
        }
        resolution
    }
}

/// Damages the first live target under `body`; returns whether anything was hit.
fn strike(
    body: &Body,
    damage: u32,
    ground: &mut [GroundActor],
    helicopter: Option<&mut Helicopter>,
    boss: Option<&mut Boss>,
    kills: &mut Vec<Kill>,
    ctx: &mut ActorContext<'_>,
) -> bool {
    if let Some(actor) = ground
        .iter_mut()
        .find(|actor| actor.is_active() && actor.body().overlaps(body))
    {
        if actor.take_damage(damage) {
            kills.push(Kill::of(&*actor));
        }
        return true;
    }
    if let Some(helicopter) = helicopter.filter(|heli| heli.is_active() && heli.body().overlaps(body)) {
        if helicopter.take_damage(damage) {
            kills.push(Kill::of(&*helicopter));
        }
        return true;
    }
    if let Some(boss) = boss.filter(|boss| boss.is_active() && boss.body().overlaps(body)) {
        ctx.effects.emit(Effect::ScreenShake {
            duration: Duration::from_millis(100),
            intensity: 0.005,
        });
        if boss.take_damage(damage) {
            kills.push(Kill::of(&*boss));
        }
        return true;
    }
    false
}

/// Applies damage to the player and reports the outcome as events.
pub fn hurt_player(player: &mut Player, amount: u32, ctx: &mut ActorContext<'_>) -> DamageOutcome {
    let outcome = player.take_damage(amount);
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Wounded { health } => {
            ctx.events.push(Event::PlayerDamaged { amount, health });
        }
        DamageOutcome::LifeLost { lives } => {
            ctx.events.push(Event::PlayerDamaged { amount, health: 0 });
            ctx.events.push(Event::LivesChanged { lives });
            info!(lives, "player lost a life");
        }
        DamageOutcome::GameOver => {
            ctx.events.push(Event::PlayerDamaged { amount, health: 0 });
            ctx.events.push(Event::LivesChanged { lives: 0 });
            ctx.events.push(Event::GameOver {
                score: player.score(),
            });
            ctx.effects.emit(Effect::Explosion {
                at: player.position(),
                scale: 2.0,
            });
            info!(score = player.score(), "game over");
        }
    }
    outcome
}

fn resolve_boss_contact(arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
    let player = &mut *arena.player;
    let Some(boss) = arena.boss.as_deref() else {
        return;
    };
    if !boss.is_active()
        || boss.is_entering()
        || !player.is_active()
        || player.is_invulnerable()
        || !boss.body().overlaps(player.body())
    {
        return;
    }
    ctx.effects.emit(Effect::DamageFlash);
    ctx.effects.emit(Effect::Sound(Cue::Hit));
    let _ = hurt_player(player, boss.contact_damage(), ctx);
}

fn resolve_hostile_fire(arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
    let player = &mut *arena.player;
    if !player.is_active() {
        return;
    }
    let target = *player.body();
    let mut hits = 0;
    for actor in arena.ground.iter_mut() {
        if let Some(group) = actor.projectiles_mut() {
            hits += absorb_hits(group, &target);
        }
    }
    if let Some(group) = arena.boss.as_deref_mut().and_then(Boss::projectiles_mut) {
        hits += absorb_hits(group, &target);
    }

    for _ in 0..hits {
        if player.is_invulnerable() {
            continue;
        }
        ctx.effects.emit(Effect::DamageFlash);
        ctx.effects.emit(Effect::Sound(Cue::Hit));
        ctx.effects.emit(Effect::FloatingText {
            at: player.position(),
            text: format!("-{HOSTILE_SHOT_DAMAGE}"),
            tone: TextTone::Penalty,
        });
        let _ = hurt_player(player, HOSTILE_SHOT_DAMAGE, ctx);
    }
}

fn absorb_hits(group: &mut ProjectileGroup, target: &Body) -> u32 {
    let mut hits = 0;
    for projectile in group.iter_active_mut() {
        if projectile.body().overlaps(target) {
            projectile.deactivate();
            hits += 1;
        }
    }
    hits
}

fn resolve_detonations(arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
    let player = &mut *arena.player;
    for blast in arena.detonations {
        if !player.is_active() || player.is_invulnerable() {
            return;
        }
        if player.position().distance(blast.at) < blast.radius {
            ctx.effects.emit(Effect::DamageFlash);
            let _ = hurt_player(player, blast.damage, ctx);
        }
    }
}

/// Pushes overlapping ground vehicles apart horizontally.
fn separate(ground: &mut [GroundActor]) {
    for index in 0..ground.len() {
        let (head, tail) = ground.split_at_mut(index + 1);
        let first = &mut head[index];
        if !first.is_active() {
            continue;
        }
        for second in tail.iter_mut().filter(|actor| actor.is_active()) {
            if !first.body().overlaps(second.body()) {
                continue;
            }
            let side = if first.body().position().x < second.body().position().x {
                -SEPARATION
            } else {
                SEPARATION
            };
            first.nudge(side);
            second.nudge(-side);
        }
    }
}

fn resolve_hazards(arena: &mut Arena<'_>, ctx: &mut ActorContext<'_>) {
    let player = &mut *arena.player;
    for hazard in arena.roadside.hazards_mut() {
        let overlapping = player.is_active() && hazard.body().overlaps(player.body());
        let Some(effect) = hazard.contact(overlapping, player.is_invulnerable(), ctx.rng) else {
            continue;
        };
        if effect.slow > 0.0 {
            player.apply_slowdown(effect.slow);
        }
        if effect.spin {
            let _ = player.spin_out(HAZARD_SPIN_OUT);
        }
        if effect.damage > 0 {
            ctx.effects.emit(Effect::DamageFlash);
            let _ = hurt_player(player, effect.damage, ctx);
        }
        ctx.effects.emit(Effect::Sound(Cue::Hit));
        ctx.effects.emit(Effect::FloatingText {
            at: effect.at - Vec2::new(0.0, 30.0),
            text: effect.warning.to_owned(),
            tone: TextTone::Warning,
        });
        ctx.events.push(Event::HazardTriggered { kind: effect.kind });
        debug!(kind = ?effect.kind, spin = effect.spin, "hazard triggered");
    }
}
