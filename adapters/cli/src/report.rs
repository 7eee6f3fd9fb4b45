//! Tallies of a finished run and the effect sink that feeds the log.

use std::fmt;

use road_rush_core::{ActorKind, Effect, EffectSink, Event, RemovalCause, TextTone};
use tracing::{debug, info, warn};

/// Effect sink that narrates banners through the log and counts the rest.
#[derive(Debug, Default)]
pub(crate) struct LoggedEffects {
    sounds: u64,
    explosions: u64,
}

impl EffectSink for LoggedEffects {
    fn emit(&mut self, effect: Effect) {
        match effect {
            Effect::Banner { text, tone } => match tone {
                TextTone::Warning => warn!(%text, "banner"),
                _ => info!(%text, "banner"),
            },
            Effect::Sound(_) => self.sounds += 1,
            Effect::Explosion { .. } => self.explosions += 1,
            Effect::FloatingText { text, .. } => debug!(%text, "floating text"),
            Effect::DamageFlash | Effect::ScreenShake { .. } => {}
        }
    }
}

impl LoggedEffects {
    pub(crate) const fn sounds(&self) -> u64 {
        self.sounds
    }

    pub(crate) const fn explosions(&self) -> u64 {
        self.explosions
    }
}

/// Counters accumulated from the event stream of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) ticks: u64,
    pub(crate) vehicles_spawned: u64,
    pub(crate) kills: u64,
    pub(crate) waves: u64,
    pub(crate) bosses_defeated: u64,
    pub(crate) level: u32,
    pub(crate) tier: u32,
    pub(crate) damage_taken: u64,
    pub(crate) pickups: u64,
    pub(crate) hazards: u64,
    pub(crate) resupplies: u64,
    pub(crate) performance_switches: u64,
    pub(crate) final_score: Option<i64>,
    pub(crate) campaign_complete: bool,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            level: 1,
            tier: 1,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => self.ticks += 1,
                Event::ActorSpawned {
                    kind: ActorKind::Ground(_) | ActorKind::Helicopter,
                    ..
                } => self.vehicles_spawned += 1,
                Event::ActorRemoved {
                    cause: RemovalCause::Killed,
                    kind,
                    ..
                } if !matches!(kind, ActorKind::Boss(_)) => self.kills += 1,
                Event::WaveStarted { .. } => self.waves += 1,
                Event::BossDefeated { .. } => self.bosses_defeated += 1,
                Event::LevelAdvanced { level, .. } => self.level = *level,
                Event::DifficultyTierRaised { tier } => self.tier = *tier,
                Event::PlayerDamaged { amount, .. } => self.damage_taken += u64::from(*amount),
                Event::PowerUpCollected { .. } => self.pickups += 1,
                Event::HazardTriggered { .. } => self.hazards += 1,
                Event::SuppliesGranted => self.resupplies += 1,
                Event::PerformanceModeChanged { .. } => self.performance_switches += 1,
                Event::GameOver { score } => self.final_score = Some(*score),
                Event::CampaignComplete => self.campaign_complete = true,
                _ => {}
            }
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:            {}", self.ticks)?;
        writeln!(f, "level / tier:     {} / {}", self.level, self.tier)?;
        writeln!(f, "vehicles spawned: {}", self.vehicles_spawned)?;
        writeln!(f, "kills:            {}", self.kills)?;
        writeln!(f, "waves:            {}", self.waves)?;
        writeln!(f, "bosses defeated:  {}", self.bosses_defeated)?;
        writeln!(f, "damage taken:     {}", self.damage_taken)?;
        writeln!(f, "pickups:          {}", self.pickups)?;
        writeln!(f, "hazards hit:      {}", self.hazards)?;
        writeln!(f, "resupplies:       {}", self.resupplies)?;
        write!(f, "throttle changes: {}", self.performance_switches)?;
        if let Some(score) = self.final_score {
            write!(f, "\ngame over at:     {score}")?;
        }
        if self.campaign_complete {
            write!(f, "\ncampaign complete")?;
        }
        Ok(())
    }
}
