#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-rate monitor that thins out traffic while the game runs slowly.
//!
//! The monitor counts `Event::TimeAdvanced` notifications as frames and
//! samples the frame rate every [`SAMPLE_INTERVAL`]. The samples feed an
//! exponential moving average; when the average falls below
//! [`LOW_FPS`] the monitor enters performance mode and asks the traffic
//! director for fewer, slower spawns. Once the average climbs back above
//! [`RECOVERED_FPS`] the level's own settings are requested again.

use std::time::Duration;

use road_rush_core::{Command, Event};
use tracing::{info, trace};

/// Time between frame-rate samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(2000);

/// Average frame rate below which performance mode starts.
pub const LOW_FPS: f32 = 30.0;

/// Average frame rate above which performance mode ends.
pub const RECOVERED_FPS: f32 = 45.0;

/// Frame rate the moving average starts from.
pub const INITIAL_FPS: f32 = 60.0;

/// Weight kept by the previous average on every sample.
const SMOOTHING: f32 = 0.7;

/// Fewest vehicles performance mode will cap the road at.
const MIN_VEHICLES: u32 = 2;

/// Stretch of the civilian spawn interval in performance mode, in tenths.
const CIVILIAN_SLOWDOWN_TENTHS: u32 = 13;

/// Traffic settings the monitor reads and rewrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrafficLimits {
    /// Cap on concurrently active ground vehicles.
    pub max_vehicles: u32,
    /// Interval between civilian spawn attempts.
    pub civilian_rate: Duration,
}

/// Moving-average frame-rate monitor with a two-threshold throttle.
#[derive(Clone, Debug, PartialEq)]
pub struct PerformanceMonitor {
    frames: u32,
    elapsed: Duration,
    average_fps: f32,
    performance_mode: bool,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    /// Creates a monitor that assumes the game starts at full speed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: 0,
            elapsed: Duration::ZERO,
            average_fps: INITIAL_FPS,
            performance_mode: false,
        }
    }

    /// Smoothed frame rate.
    #[must_use]
    pub const fn average_fps(&self) -> f32 {
        self.average_fps
    }

    /// Whether traffic is currently thinned out.
    #[must_use]
    pub const fn is_performance_mode(&self) -> bool {
        self.performance_mode
    }

    /// Consumes the events of a tick and requests traffic changes when the
    /// smoothed frame rate crosses a threshold.
    ///
    /// `current` are the limits in force now; `baseline` are the limits the
    /// current level asks for and are restored on recovery.
    pub fn handle(
        &mut self,
        events: &[Event],
        current: TrafficLimits,
        baseline: TrafficLimits,
        commands: &mut Vec<Command>,
        out: &mut Vec<Event>,
    ) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.frames += 1;
                self.elapsed += *dt;
            }
        }
        if self.elapsed < SAMPLE_INTERVAL {
            return;
        }

        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.average_fps = self.average_fps * SMOOTHING + fps * (1.0 - SMOOTHING);
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        trace!(fps, average = self.average_fps, "frame rate sampled");

        if self.average_fps < LOW_FPS && !self.performance_mode {
            self.performance_mode = true;
            commands.push(Command::SetMaxVehicles {
                max: current.max_vehicles.saturating_sub(1).max(MIN_VEHICLES),
            });
            commands.push(Command::SetCivilianRate {
                civilian: current.civilian_rate * CIVILIAN_SLOWDOWN_TENTHS / 10,
            });
            out.push(Event::PerformanceModeChanged { enabled: true });
            info!(average = self.average_fps, "performance mode enabled");
        } else if self.average_fps > RECOVERED_FPS && self.performance_mode {
            self.performance_mode = false;
            commands.push(Command::SetMaxVehicles {
                max: baseline.max_vehicles,
            });
            commands.push(Command::SetCivilianRate {
                civilian: baseline.civilian_rate,
            });
            out.push(Event::PerformanceModeChanged { enabled: false });
            info!(average = self.average_fps, "performance mode disabled");
        }
    }

    /// Forgets the partial sample and leaves performance mode.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
