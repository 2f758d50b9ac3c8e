//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use nfl_core::{DetailLevel, SimRatingMode};

#[derive(Parser)]
#[command(name = "nfl")]
#[command(author, version, about = "NFL regular-season and playoff-seed forecaster")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Path to the league roster JSON (default: embedded data)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Default, Copy)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Roll ELO ratings forward over completed games
    Rollforward(RollforwardArgs),

    /// Simulate the remaining season and report playoff probabilities
    Simulate(SimulateArgs),

    /// Score past predictions against observed results
    Evaluate(EvaluateArgs),

    /// List the league roster
    Teams(TeamsArgs),
}

#[derive(Parser)]
pub struct RollforwardArgs {
    /// Initial ratings JSON (team, elo_rating)
    #[arg(long)]
    pub ratings: PathBuf,

    /// Completed games JSON
    #[arg(long)]
    pub games: PathBuf,

    /// Per-game context adjustments JSON
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Calibration artifact; when given, probabilities are calibrated
    /// before reporting
    #[arg(long)]
    pub calibration: Option<PathBuf>,

    /// Home-field advantage in ELO points
    #[arg(long, default_value = "52.0")]
    pub home_advantage: f64,

    /// K-factor of the rating update
    #[arg(long, default_value = "20.0")]
    pub k_factor: f64,
}

#[derive(Parser)]
pub struct SimulateArgs {
    /// Initial ratings JSON (team, elo_rating)
    #[arg(long)]
    pub ratings: PathBuf,

    /// Completed games JSON (omit before week 1)
    #[arg(long)]
    pub games: Option<PathBuf>,

    /// Remaining schedule JSON
    #[arg(long)]
    pub schedule: PathBuf,

    /// Per-game context adjustments JSON
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Market win totals JSON for the preseason blend
    #[arg(long)]
    pub market_totals: Option<PathBuf>,

    /// Apply preseason regression to the mean before anything else
    #[arg(long)]
    pub preseason: bool,

    /// Number of scenarios to run
    #[arg(short = 'n', long, default_value = "10000")]
    pub scenarios: u32,

    /// Random seed for reproducibility
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of worker threads (default: auto-detect)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Per-game vs per-team simulation detail
    #[arg(long, value_enum, default_value = "per-team-only")]
    pub detail: DetailChoice,

    /// Keep ratings frozen within each scenario
    #[arg(long)]
    pub frozen_ratings: bool,

    /// Home-field advantage in ELO points
    #[arg(long, default_value = "52.0")]
    pub home_advantage: f64,

    /// K-factor of the rating update
    #[arg(long, default_value = "20.0")]
    pub k_factor: f64,

    /// Write per-scenario standings to this JSON file
    #[arg(long)]
    pub standings_out: Option<PathBuf>,

    /// Show only the top N teams per conference (default: all)
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(ValueEnum, Clone, Default, Copy)]
pub enum DetailChoice {
    PerGame,
    #[default]
    PerTeamOnly,
}

impl DetailChoice {
    pub fn to_detail_level(self) -> DetailLevel {
        match self {
            DetailChoice::PerGame => DetailLevel::PerGame,
            DetailChoice::PerTeamOnly => DetailLevel::PerTeamOnly,
        }
    }
}

impl SimulateArgs {
    pub fn rating_mode(&self) -> SimRatingMode {
        if self.frozen_ratings {
            SimRatingMode::Frozen
        } else {
            SimRatingMode::UnitMargin
        }
    }
}

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Predictions JSON (predicted_home_win_prob, actual)
    #[arg(long)]
    pub predictions: PathBuf,
}

#[derive(Parser)]
pub struct TeamsArgs {
    /// Filter by conference (AFC or NFC)
    #[arg(long)]
    pub conference: Option<String>,

    /// Sort by field
    #[arg(long, value_enum, default_value = "name")]
    pub sort: TeamSortField,
}

#[derive(ValueEnum, Clone, Default, Copy)]
pub enum TeamSortField {
    #[default]
    Name,
    Code,
    Division,
}
