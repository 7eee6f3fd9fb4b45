#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless Road Rush run.
//!
//! The binary loads tuning from an optional TOML file, lets an autopilot
//! steer the player car for a fixed span of simulated time and prints a
//! summary of what happened on the road.

mod autopilot;
mod report;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use road_rush_core::{Command, GameMode, SpawnTableRevision, TuningConfig, WELCOME_BANNER};
use road_rush_director::{apply, query, Director};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    autopilot::Autopilot,
    report::{LoggedEffects, RunReport},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Campaign,
    Endless,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Campaign => GameMode::Campaign,
            ModeArg::Endless => GameMode::Endless,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SpawnTableArg {
    Classic,
    Rammer,
}

impl From<SpawnTableArg> for SpawnTableRevision {
    fn from(table: SpawnTableArg) -> Self {
        match table {
            SpawnTableArg::Classic => SpawnTableRevision::Classic,
            SpawnTableArg::Rammer => SpawnTableRevision::Rammer,
        }
    }
}

/// Headless Road Rush simulation runner.
#[derive(Debug, Parser)]
#[command(name = "road-rush", version, about)]
struct Cli {
    /// Campaign with bosses or the endless arcade run.
    #[arg(long, value_enum, default_value_t = ModeArg::Campaign)]
    mode: ModeArg,
    /// Seed for the traffic generator; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run for.
    #[arg(long, default_value_t = 120)]
    seconds: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=1000))]
    fps: u64,
    /// TOML file with tuning overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Enemy spawn table; overrides the config file.
    #[arg(long, value_enum)]
    spawn_table: Option<SpawnTableArg>,
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn tuning(&self) -> Result<TuningConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => TuningConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(table) = self.spawn_table {
            config.traffic.spawn_table = table.into();
        }
        Ok(config)
    }

    fn frame(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Road Rush command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    println!("{WELCOME_BANNER}");

    let config = cli.tuning()?;
    let mut director = Director::new(config, cli.mode.into(), LoggedEffects::default())
        .context("invalid tuning configuration")?;

    let dt = cli.frame();
    let frames = cli.seconds.saturating_mul(cli.fps);
    let mut autopilot = Autopilot::default();
    let mut report = RunReport::new();
    let mut commands = Vec::new();
    let mut events = Vec::new();

    for _ in 0..frames {
        autopilot.plan(&director, dt, &mut commands);
        commands.push(Command::Tick { dt });
        for command in commands.drain(..) {
            apply(&mut director, command, &mut events);
        }
        report.record(&events);
        events.clear();
        if !query::is_running(&director) {
            break;
        }
    }
    apply(&mut director, Command::Teardown, &mut events);
    report.record(&events);

    let player = query::player(&director);
    info!(
        score = player.score(),
        lives = player.lives(),
        level = query::level(&director).name,
        "run finished"
    );
    println!("score:            {}", player.score());
    println!("{report}");
    println!(
        "sounds / blasts:  {} / {}",
        director.effects().sounds(),
        director.effects().explosions()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_two_minute_campaign() {
        let cli = Cli::try_parse_from(["road-rush"]).expect("defaults parse");
        assert_eq!(cli.mode, ModeArg::Campaign);
        assert_eq!(cli.seconds, 120);
        assert_eq!(cli.frame(), Duration::from_micros(16_666));
        let config = cli.tuning().expect("default tuning");
        assert_eq!(config, TuningConfig::default());
    }

    #[test]
    fn flags_override_the_tuning() {
        let cli = Cli::try_parse_from([
            "road-rush",
            "--mode",
            "endless",
            "--seed",
            "42",
            "--spawn-table",
            "rammer",
            "-vv",
        ])
        .expect("flags parse");
        assert_eq!(GameMode::from(cli.mode), GameMode::Endless);
        assert_eq!(cli.verbose, 2);
        let config = cli.tuning().expect("tuning");
        assert_eq!(config.seed, 42);
        assert_eq!(config.traffic.spawn_table, SpawnTableRevision::Rammer);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Cli::try_parse_from(["road-rush", "--fps", "0"]).is_err());
    }

    #[test]
    fn a_missing_config_file_names_the_path() {
        let cli = Cli::try_parse_from(["road-rush", "--config", "/nonexistent/road-rush.toml"])
            .expect("flags parse");
        let error = cli.tuning().expect_err("file is missing");
        assert!(format!("{error}").contains("/nonexistent/road-rush.toml"));
    }
}
