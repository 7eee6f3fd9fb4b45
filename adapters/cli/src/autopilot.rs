//! Scripted driver that steers and shoots through the public command set.

use std::time::Duration;

use glam::Vec2;
use road_rush_core::{Command, EffectSink, RoadLayout, Weapon};
use road_rush_director::{query, Director};
use road_rush_system_actors::Combatant;

/// Horizontal steering speed in pixels per second.
const STEER_SPEED: f32 = 260.0;

/// Vertical reach within which a civilian ahead blocks a lane.
const CIVILIAN_CAUTION: f32 = 220.0;

/// Something on the road the autopilot reacts to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Sighting {
    pub(crate) position: Vec2,
    pub(crate) hostile: bool,
}

/// Chooses the x coordinate to steer towards.
///
/// Hostiles ahead are chased, nearest first. Lanes with a civilian close
/// ahead are avoided by moving to the nearest free neighbour.
pub(crate) fn choose_target(player: Vec2, sightings: &[Sighting], layout: &RoadLayout) -> f32 {
    let desired = sightings
        .iter()
        .filter(|sighting| sighting.hostile && sighting.position.y < player.y)
        .min_by(|a, b| {
            (player.y - a.position.y).total_cmp(&(player.y - b.position.y))
        })
        .map_or(player.x, |target| target.position.x);

    let blocked = |x: f32| {
        let lane = layout.nearest_lane(x);
        sightings.iter().any(|sighting| {
            !sighting.hostile
                && layout.nearest_lane(sighting.position.x) == lane
                && sighting.position.y < player.y
                && player.y - sighting.position.y < CIVILIAN_CAUTION
        })
    };
    if !blocked(desired) {
        return desired;
    }

    let current = layout.nearest_lane(desired).get();
    layout
        .iter_lanes()
        .filter(|lane| !blocked(layout.lane_center(*lane)))
        .min_by_key(|lane| lane.get().abs_diff(current))
        .map_or(desired, |lane| layout.lane_center(lane))
}

/// Moves `from` towards `to` by at most `STEER_SPEED * dt`.
pub(crate) fn steer(from: f32, to: f32, dt: Duration) -> f32 {
    let reach = STEER_SPEED * dt.as_secs_f32();
    from + (to - from).clamp(-reach, reach)
}

/// Drives the player car for a headless run.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    sightings: Vec<Sighting>,
}

impl Autopilot {
    /// Issues the steering and weapon commands for the next frame.
    pub(crate) fn plan<E: EffectSink>(
        &mut self,
        director: &Director<E>,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let player = query::player(director);
        if !player.is_active() || player.van().is_some() {
            return;
        }

        self.sightings.clear();
        self.sightings
            .extend(query::ground_actors(director).map(|actor| Sighting {
                position: actor.body().position(),
                hostile: !actor.archetype().is_civilian(),
            }));
        if let Some(helicopter) = query::helicopter(director).filter(|heli| heli.is_active()) {
            self.sightings.push(Sighting {
                position: helicopter.body().position(),
                hostile: true,
            });
        }
        let boss = query::boss(director).filter(|boss| boss.is_active());
        if let Some(boss) = boss {
            self.sightings.push(Sighting {
                position: boss.body().position(),
                hostile: true,
            });
        }

        let position = player.position();
        let target = choose_target(position, &self.sightings, query::layout(director));
        let x = steer(position.x, target, dt);
        if (x - position.x).abs() > f32::EPSILON {
            out.push(Command::PlacePlayer {
                position: Vec2::new(x, position.y),
            });
        }

        let weapon = if boss.is_some() && player.ammo(Weapon::Missile).unwrap_or(0) > 0 {
            Weapon::Missile
        } else {
            Weapon::MachineGun
        };
        if player.selected_weapon() != weapon {
            out.push(Command::SelectWeapon { weapon });
        }
        if self.sightings.iter().any(|sighting| sighting.hostile) {
            out.push(Command::FireWeapon);
        }
    }
}
