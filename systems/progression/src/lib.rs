#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progression controller advancing campaign levels and endless tiers.
//!
//! The controller never touches traffic directly. Every retune is emitted as
//! a [`Command`] for the director to apply, and the only actor it owns is the
//! boss guarding the next level threshold.

pub mod endless;
pub mod levels;

use std::time::Duration;

use road_rush_core::{
    ActorId, ActorIds, ActorKind, BossKind, Command, Cue, Effect, Event, GameMode,
    RemovalCause, RoadLayout, TextTone, Theme,
};
use road_rush_system_actors::{ActorContext, Boss, Combatant};
use road_rush_world::TimerQueue;
use tracing::info;

use crate::levels::{LevelRecord, ENDLESS, FINALE_THRESHOLD, LEVELS};

const ADVANCE_AFTER_BOSS: Duration = Duration::from_millis(2000);
const TRANSITION: Duration = Duration::from_millis(3000);

/// Coarse state of the progression machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgressionState {
    /// Watching the score for the next threshold.
    Normal,
    /// A level change is being announced.
    Transitioning,
    /// A boss guards the next level.
    BossActive,
    /// The final campaign level was cleared.
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProgressionTimer {
    AdvanceAfterBoss,
    EndTransition,
}

/// Level and tier state machine owning the active boss.
#[derive(Debug)]
pub struct ProgressionController {
    mode: GameMode,
    state: ProgressionState,
    level_index: usize,
    layout: RoadLayout,
    base_speed: f32,
    boss: Option<Boss>,
    timers: TimerQueue<ProgressionTimer>,
    fired: Vec<ProgressionTimer>,
    elapsed: Duration,
    tier: u32,
    rotation: u64,
    theme: Theme,
}

impl ProgressionController {
    /// Creates a controller at the first level or endless tier.
    #[must_use]
    pub fn new(mode: GameMode, layout: RoadLayout, base_speed: f32) -> Self {
        let theme = match mode {
            GameMode::Campaign => LEVELS[0].theme,
            GameMode::Endless => ENDLESS.theme,
        };
        Self {
            mode,
            state: ProgressionState::Normal,
            level_index: 0,
            layout,
            base_speed,
            boss: None,
            timers: TimerQueue::new(),
            fired: Vec::new(),
            elapsed: Duration::ZERO,
            tier: 1,
            rotation: 0,
            theme,
        }
    }

    /// Commands that tune traffic for the opening level or endless baseline.
    pub fn opening_commands(&self, out: &mut Vec<Command>) {
        self.level().traffic_commands(out);
    }

    /// Runs one tick: boss upkeep first, then the advance check.
    pub fn update(
        &mut self,
        ctx: &mut ActorContext<'_>,
        ids: &mut ActorIds,
        score: i64,
        out_commands: &mut Vec<Command>,
    ) {
        self.update_boss(ctx);

        self.fired.clear();
        self.timers.advance(ctx.dt, &mut self.fired);
        let fired = std::mem::take(&mut self.fired);
        for timer in &fired {
            match timer {
                ProgressionTimer::AdvanceAfterBoss => self.advance_level(ctx, out_commands),
                ProgressionTimer::EndTransition => {
                    if self.state == ProgressionState::Transitioning {
                        self.state = ProgressionState::Normal;
                    }
                }
            }
        }
        self.fired = fired;

        match self.mode {
            GameMode::Campaign => self.check_threshold(ctx, ids, score, out_commands),
            GameMode::Endless => self.update_endless(ctx, out_commands),
        }
    }

    fn update_boss(&mut self, ctx: &mut ActorContext<'_>) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        if boss.is_active() {
            boss.update(ctx);
            boss.integrate(ctx.dt);
        }
        let _ = boss.cull_projectiles(ctx.layout);
    }

    fn check_threshold(
        &mut self,
        ctx: &mut ActorContext<'_>,
        ids: &mut ActorIds,
        score: i64,
        out_commands: &mut Vec<Command>,
    ) {
        if self.state != ProgressionState::Normal {
            return;
        }
        let threshold = LEVELS
            .get(self.level_index + 1)
            .map_or(FINALE_THRESHOLD, |next| next.score_threshold);
        if score < threshold {
            return;
        }
        match LEVELS[self.level_index].boss {
            Some(kind) => self.spawn_boss(kind, ctx, ids, out_commands),
            None => self.advance_level(ctx, out_commands),
        }
    }

    fn spawn_boss(
        &mut self,
        kind: BossKind,
        ctx: &mut ActorContext<'_>,
        ids: &mut ActorIds,
        out_commands: &mut Vec<Command>,
    ) {
        out_commands.push(Command::ClearTraffic);
        let id = ids.allocate();
        self.boss = Some(Boss::spawn(id, kind, &self.layout, self.base_speed));
        self.state = ProgressionState::BossActive;

        ctx.effects.emit(Effect::Banner {
            text: format!("WARNING: {}", kind.name()),
            tone: TextTone::Warning,
        });
        ctx.effects.emit(Effect::Sound(Cue::Missile));
        ctx.events.push(Event::BossSpawned { actor: id, kind });
        info!(actor = id.get(), boss = kind.name(), level = self.level_number(), "boss spawned");
    }

    /// Acknowledges a defeated boss; the next level follows after a pause.
    pub fn on_boss_defeated(&mut self, actor: ActorId) {
        if self.state != ProgressionState::BossActive {
            return;
        }
        if !self.boss.as_ref().is_some_and(|boss| boss.id() == actor) {
            return;
        }
        self.boss = None;
        self.state = ProgressionState::Transitioning;
        let _ = self
            .timers
            .once(ADVANCE_AFTER_BOSS, ProgressionTimer::AdvanceAfterBoss);
        info!(actor = actor.get(), "boss defeated, advancing shortly");
    }

    fn advance_level(&mut self, ctx: &mut ActorContext<'_>, out_commands: &mut Vec<Command>) {
        if self.state == ProgressionState::Complete {
            return;
        }
        if self.level_index + 1 >= LEVELS.len() {
            self.state = ProgressionState::Complete;
            ctx.events.push(Event::CampaignComplete);
            ctx.effects.emit(Effect::Banner {
                text: "CONGRATULATIONS! YOU COMPLETED ALL LEVELS!".to_owned(),
                tone: TextTone::Reward,
            });
            info!("campaign complete");
            return;
        }

        self.level_index += 1;
        self.state = ProgressionState::Transitioning;
        let level = LEVELS[self.level_index];
        self.theme = level.theme;
        level.traffic_commands(out_commands);

        ctx.events.push(Event::LevelAdvanced {
            level: level.number,
            name: level.name,
            theme: level.theme,
        });
        ctx.effects.emit(Effect::Banner {
            text: format!("LEVEL {}: {}", level.number, level.name),
            tone: TextTone::Info,
        });
        let _ = self.timers.once(TRANSITION, ProgressionTimer::EndTransition);
        info!(level = level.number, name = level.name, "level advanced");
    }

    fn update_endless(&mut self, ctx: &mut ActorContext<'_>, out_commands: &mut Vec<Command>) {
        self.elapsed += ctx.dt;

        let tier = endless::tier_for(self.elapsed);
        if tier > self.tier {
            self.tier = tier;
            endless::tier_settings(tier).traffic_commands(out_commands);
            ctx.events.push(Event::DifficultyTierRaised { tier });
            ctx.effects.emit(Effect::Banner {
                text: format!("DIFFICULTY TIER {tier}"),
                tone: TextTone::Warning,
            });
            ctx.effects.emit(Effect::Sound(Cue::PowerUp));
            info!(tier, "endless tier raised");
        }

        let rotation = endless::rotation_for(self.elapsed);
        if rotation > self.rotation {
            self.rotation = rotation;
            self.theme = endless::theme_for(self.elapsed);
            ctx.events.push(Event::ThemeChanged { theme: self.theme });
        }
    }

    /// Destroys the boss and cancels pending transitions.
    pub fn teardown(&mut self, events: &mut Vec<Event>) {
        self.timers.clear();
        if let Some(mut boss) = self.boss.take() {
            if boss.is_active() {
                boss.destroy();
                events.push(Event::ActorRemoved {
                    actor: boss.id(),
                    kind: ActorKind::Boss(boss.boss_kind()),
                    cause: RemovalCause::Teardown,
                });
            }
        }
    }

    /// Run mode.
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ProgressionState {
        self.state
    }

    /// Zero-based campaign level index.
    #[must_use]
    pub const fn level_index(&self) -> usize {
        self.level_index
    }

    /// Record of the active level, or the endless baseline.
    #[must_use]
    pub fn level(&self) -> &'static LevelRecord {
        match self.mode {
            GameMode::Campaign => &LEVELS[self.level_index],
            GameMode::Endless => &ENDLESS,
        }
    }

    /// Level used to gate enemy archetypes; endless tiers map onto the campaign levels.
    #[must_use]
    pub fn level_number(&self) -> u32 {
        match self.mode {
            GameMode::Campaign => LEVELS[self.level_index].number,
            GameMode::Endless => self.tier.min(LEVELS.len() as u32),
        }
    }

    /// Traffic cap and civilian rate a performance throttle should restore.
    #[must_use]
    pub fn traffic_baseline(&self) -> (u32, Duration) {
        match self.mode {
            GameMode::Endless if self.tier > 1 => {
                let settings = endless::tier_settings(self.tier);
                (settings.max_vehicles, settings.civilian_spawn_rate)
            }
            _ => {
                let level = self.level();
                (level.max_vehicles, level.civilian_spawn_rate)
            }
        }
    }

    /// Active boss, including one killed this tick.
    #[must_use]
    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    /// Mutable active boss.
    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.boss.as_mut()
    }

    /// Endless difficulty tier; stays at one in the campaign.
    #[must_use]
    pub const fn tier(&self) -> u32 {
        self.tier
    }

    /// Road palette in force.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }
}
