use std::time::Duration;

use glam::Vec2;
use road_rush_core::{ActorId, Cue, Effect, EffectSink, RoadLayout, TextTone};
use road_rush_world::{player::PlayerView, Body, Easing, Tween};

use crate::ActorContext;

const SIZE: Vec2 = Vec2::new(50.0, 90.0);
const ENTRY_FROM_Y: f32 = -100.0;
const ENTRY_TO_Y: f32 = 150.0;
const ENTRY: Duration = Duration::from_millis(2000);
const PULL_OVER: Duration = Duration::from_millis(800);
const ARMING: Duration = Duration::from_millis(2500);
const EXIT: Duration = Duration::from_millis(1500);
const EXIT_TO_Y: f32 = -200.0;
const SPEED_FACTOR: f32 = 0.8;

/// Speed of the player while seated, as a multiple of the base road speed.
pub const SEATED_SPEED_FACTOR: f32 = 0.3;

/// Invulnerability granted when the player is ejected.
pub const EJECT_GRACE: Duration = Duration::from_millis(2000);

/// Stage of a weapons van visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VanState {
    /// Driving slightly slower than the road so the player can catch up.
    Approaching,
    /// Steering to the roadside with the player aboard.
    PullingOver,
    /// Parked while the player is restocked.
    Arming,
    /// Leaving through the top of the viewport.
    DrivingAway,
}

/// Requests the van makes of the player, applied by the encounter resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VanSignal {
    /// The seated player should be restocked.
    SuppliesReady {
        /// Van granting the supplies.
        van: ActorId,
    },
    /// The seated player should be put back on the road.
    Ejected {
        /// Van the player leaves.
        van: ActorId,
        /// Where the player lands.
        at: Vec2,
    },
}

/// Non-combat resupply van.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponsVan {
    id: ActorId,
    body: Body,
    active: bool,
    state: VanState,
    doors_open: bool,
    occupied: bool,
    supplies_granted: bool,
    inside_timer: Duration,
    speed: f32,
    pull_over_x: f32,
    entry: Option<Tween>,
    pull_over: Option<Tween>,
    exit: Option<Tween>,
    signals: Vec<VanSignal>,
}

impl WeaponsVan {
    /// Creates a van above the viewport, centred on the road.
    #[must_use]
    pub fn spawn(id: ActorId, layout: &RoadLayout, base_speed: f32) -> Self {
        Self {
            id,
            body: Body::new(Vec2::new(layout.center_x(), ENTRY_FROM_Y), SIZE),
            active: true,
            state: VanState::Approaching,
            doors_open: false,
            occupied: false,
            supplies_granted: false,
            inside_timer: Duration::ZERO,
            speed: base_speed * SPEED_FACTOR,
            pull_over_x: layout.margin() + 50.0,
            entry: Some(Tween::new(ENTRY_FROM_Y, ENTRY_TO_Y, ENTRY, Easing::CubicOut)),
            pull_over: None,
            exit: None,
            signals: Vec::new(),
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Collision body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Whether the van is still on the road.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Current stage of the visit.
    #[must_use]
    pub const fn state(&self) -> VanState {
        self.state
    }

    /// Whether the rear doors accept the player.
    #[must_use]
    pub const fn doors_open(&self) -> bool {
        self.doors_open
    }

    /// Whether the player is seated inside.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Where the seated player is drawn.
    #[must_use]
    pub fn seat_position(&self) -> Vec2 {
        self.body.position() + Vec2::new(0.0, 50.0)
    }

    /// Lets the player in when they reach the open doors from behind.
    pub fn try_enter(&mut self, player: &PlayerView, effects: &mut dyn EffectSink) -> bool {
        if !self.active
            || !self.doors_open
            || self.occupied
            || self.state != VanState::Approaching
            || player.position.y <= self.body.position().y + 20.0
        {
            return false;
        }
        self.occupied = true;
        self.doors_open = false;
        self.inside_timer = Duration::ZERO;
        self.state = VanState::PullingOver;
        self.pull_over = Some(Tween::new(
            self.body.position().x,
            self.pull_over_x,
            PULL_OVER,
            Easing::CubicOut,
        ));
        self.body.set_velocity(Vec2::ZERO);
        effects.emit(Effect::Sound(Cue::PowerUp));
        true
    }

    /// Runs one tick of the visit.
    pub fn update(&mut self, ctx: &mut ActorContext<'_>) {
        if !self.active {
            return;
        }
        match self.state {
            VanState::Approaching => {
                if let Some(entry) = self.entry.as_mut() {
                    let y = entry.advance(ctx.dt);
                    let finished = entry.is_finished();
                    self.body.set_y(y);
                    self.body.set_velocity(Vec2::ZERO);
                    if finished {
                        self.entry = None;
                        self.doors_open = true;
                    }
                } else {
                    self.body
                        .set_velocity(Vec2::new(0.0, ctx.road_speed - self.speed));
                }
            }
            VanState::PullingOver => {
                self.body.set_velocity(Vec2::ZERO);
                if let Some(pull) = self.pull_over.as_mut() {
                    let x = pull.advance(ctx.dt);
                    let finished = pull.is_finished();
                    self.body.set_x(x);
                    if finished {
                        self.pull_over = None;
                        self.state = VanState::Arming;
                        ctx.effects.emit(Effect::FloatingText {
                            at: self.body.position(),
                            text: "ENTERING VAN".to_owned(),
                            tone: TextTone::Reward,
                        });
                    }
                }
            }
            VanState::Arming => {
                self.body.set_velocity(Vec2::new(0.0, ctx.road_speed));
                if self.occupied {
                    self.inside_timer += ctx.dt;
                    if !self.supplies_granted {
                        self.supplies_granted = true;
                        self.signals.push(VanSignal::SuppliesReady { van: self.id });
                        ctx.effects.emit(Effect::FloatingText {
                            at: self.body.position() - Vec2::new(0.0, 30.0),
                            text: "+MISSILES +OIL +SMOKE".to_owned(),
                            tone: TextTone::Reward,
                        });
                    }
                    if self.inside_timer >= ARMING {
                        self.eject(ctx);
                    }
                }
            }
            VanState::DrivingAway => {
                self.body.set_velocity(Vec2::ZERO);
                if let Some(exit) = self.exit.as_mut() {
                    let y = exit.advance(ctx.dt);
                    let finished = exit.is_finished();
                    self.body.set_y(y);
                    if finished {
                        let _ = self.destroy();
                        return;
                    }
                }
            }
        }

        let y = self.body.position().y;
        if y > ctx.layout.height() + 150.0 || y < EXIT_TO_Y {
            let _ = self.destroy();
        }
    }

    fn eject(&mut self, ctx: &mut ActorContext<'_>) {
        self.occupied = false;
        self.state = VanState::DrivingAway;
        let at = Vec2::new(ctx.layout.center_x(), self.body.position().y + 80.0);
        self.signals.push(VanSignal::Ejected { van: self.id, at });
        self.exit = Some(Tween::new(
            self.body.position().y,
            EXIT_TO_Y,
            EXIT,
            Easing::CubicOut,
        ));
        ctx.effects.emit(Effect::FloatingText {
            at,
            text: "FULLY ARMED!".to_owned(),
            tone: TextTone::Reward,
        });
        ctx.effects.emit(Effect::Sound(Cue::PowerUp));
    }

    /// Moves the van by its velocity.
    pub fn integrate(&mut self, dt: Duration) {
        if self.active {
            self.body.integrate(dt);
        }
    }

    /// Moves every pending request into `out`.
    pub fn drain_signals(&mut self, out: &mut Vec<VanSignal>) {
        out.append(&mut self.signals);
    }

    /// Removes the van; returns whether the player was still inside.
    pub fn destroy(&mut self) -> bool {
        let was_occupied = self.occupied;
        self.active = false;
        self.occupied = false;
        self.doors_open = false;
        was_occupied
    }
}
