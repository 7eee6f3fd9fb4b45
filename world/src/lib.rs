#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Kinematic substrate for Road Rush.
//!
//! The encounter systems never depend on a physics engine. Instead they move
//! [`Body`] values by explicit velocities, test axis-aligned overlap, and
//! schedule deferred work on a [`TimerQueue`] owned by whichever manager
//! created it. The player car and its projectile pools live here as well so
//! every system can share them without reaching into one another.

pub mod player;
pub mod projectiles;
mod timers;
mod tween;

use std::time::Duration;

use glam::Vec2;

pub use timers::{TimerHandle, TimerQueue};
pub use tween::{Easing, Tween};

/// Converts a frame delta to fractional seconds.
#[must_use]
pub fn seconds(dt: Duration) -> f32 {
    dt.as_secs_f32()
}

/// Converts a frame delta to fractional milliseconds.
#[must_use]
pub fn millis(dt: Duration) -> f32 {
    dt.as_secs_f32() * 1000.0
}

/// Axis-aligned rectangle used for overlap tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Creates a rectangle from its centre and half extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether two rectangles share any area.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Position, velocity and extent of anything that moves on the road.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    position: Vec2,
    velocity: Vec2,
    half_extents: Vec2,
}

impl Body {
    /// Creates a resting body centred on `position` with the given full size.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents: size * 0.5,
        }
    }

    /// Centre of the body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Half of the body's width and height.
    #[must_use]
    pub const fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Moves the body to an absolute position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Moves the body horizontally to an absolute coordinate.
    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    /// Moves the body vertically to an absolute coordinate.
    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    /// Offsets the body by the provided delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Replaces the velocity.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Replaces the horizontal velocity.
    pub fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    /// Replaces the vertical velocity.
    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    /// Advances the position by the velocity over `dt`.
    pub fn integrate(&mut self, dt: Duration) {
        self.position += self.velocity * seconds(dt);
    }

    /// Bounding rectangle of the body.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    /// Reports whether the two bodies overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.bounds().intersects(&other.bounds())
    }

    /// Distance between the centres of two bodies.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }
}
