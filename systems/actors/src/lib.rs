#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity actors that populate the road.
//!
//! Every combat-capable actor implements [`Combatant`]: it updates its AI
//! against an [`ActorContext`] carrying a read-only [`PlayerView`], takes
//! damage through a single entry point, and releases its projectiles when it
//! dies. Per-archetype differences live in the [`stats`] tables rather than
//! in separate types, so the ground vehicles share one implementation.

mod boss;
mod ground;
mod helicopter;
pub mod stats;
mod van;

use std::time::Duration;

use rand::RngCore;
use road_rush_core::{ActorId, ActorKind, EffectSink, Event, RoadLayout};
use road_rush_world::{player::PlayerView, Body};

pub use boss::Boss;
pub use ground::GroundActor;
pub use helicopter::{Bomb, BombShadow, Detonation, Helicopter};
pub use van::{VanSignal, VanState, WeaponsVan, EJECT_GRACE, SEATED_SPEED_FACTOR};

/// Everything an actor may read or emit while updating.
pub struct ActorContext<'a> {
    /// Simulation clock after the current tick.
    pub now: Duration,
    /// Duration of the current tick.
    pub dt: Duration,
    /// Current road speed, which equals the player's speed.
    pub road_speed: f32,
    /// Road speed every actor speed multiplier is relative to.
    pub base_speed: f32,
    /// Snapshot of the player taken before actors update.
    pub player: PlayerView,
    /// Viewport and lane grid.
    pub layout: &'a RoadLayout,
    /// Deterministic randomness source.
    pub rng: &'a mut dyn RngCore,
    /// Presentation sink for sounds, text and particles.
    pub effects: &'a mut dyn EffectSink,
    /// Events raised while updating.
    pub events: &'a mut Vec<Event>,
}

/// Health, score value and liveness shared by every combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vitals {
    health: i32,
    max_health: i32,
    points: i64,
    active: bool,
}

impl Vitals {
    /// Creates full-health vitals.
    #[must_use]
    pub const fn new(health: i32, points: i64) -> Self {
        Self {
            health,
            max_health: health,
            points,
            active: true,
        }
    }

    /// Health remaining.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health the actor spawned with.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Points awarded when the actor is killed; negative for penalties.
    #[must_use]
    pub const fn points(&self) -> i64 {
        self.points
    }

    /// Whether the actor is still in play.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health.max(0) as f32 / self.max_health as f32
    }

    /// Removes health; returns `true` only on the hit that kills.
    pub fn damage(&mut self, amount: u32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= i32::try_from(amount).unwrap_or(i32::MAX);
        if self.health <= 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Marks the actor as out of play without awarding anything.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Capability shared by every actor that can fight.
pub trait Combatant {
    /// Identifier assigned at spawn.
    fn id(&self) -> ActorId;

    /// Classification reported in events.
    fn kind(&self) -> ActorKind;

    /// Collision body.
    fn body(&self) -> &Body;

    /// Health and score value.
    fn vitals(&self) -> &Vitals;

    /// Mutable health and score value.
    fn vitals_mut(&mut self) -> &mut Vitals;

    /// Runs one tick of AI.
    fn update(&mut self, ctx: &mut ActorContext<'_>);

    /// Releases resources owned by the actor once it leaves play.
    fn on_death(&mut self) {}

    /// Applies damage and reports whether this hit killed the actor.
    fn take_damage(&mut self, amount: u32) -> bool {
        let killed = self.vitals_mut().damage(amount);
        if killed {
            self.on_death();
        }
        killed
    }

    /// Removes the actor from play without a kill.
    fn destroy(&mut self) {
        self.vitals_mut().deactivate();
        self.on_death();
    }

    /// Whether the actor is still in play.
    fn is_active(&self) -> bool {
        self.vitals().is_active()
    }

    /// Points awarded when the actor is killed.
    fn points(&self) -> i64 {
        self.vitals().points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lethal_damage_reports_the_kill_once() {
        let mut vitals = Vitals::new(3, 100);
        assert!(!vitals.damage(2));
        assert_eq!(vitals.health(), 1);
        assert!(vitals.damage(1));
        assert!(!vitals.is_active());
        assert!(!vitals.damage(5));
    }

    #[test]
    fn fraction_is_clamped_at_zero() {
        let mut vitals = Vitals::new(4, 0);
        let _ = vitals.damage(9);
        assert_eq!(vitals.fraction(), 0.0);
    }
}
