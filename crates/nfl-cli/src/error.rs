//! CLI error types.

use std::path::PathBuf;

/// CLI errors. Every fatal load error names the offending record.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Invalid data file: {0}")]
    InvalidDataFile(PathBuf),

    #[error("Game {game_id}: winning team {winner} is neither home nor visiting")]
    WinnerNotInGame { game_id: u32, winner: String },

    #[error("Game {game_id}: invalid result code {code} (expected 0, 0.5 or 1)")]
    InvalidResultCode { game_id: u32, code: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("League validation failed: {0}")]
    League(#[from] nfl_core::LeagueError),

    #[error("Schedule validation failed: {0}")]
    Schedule(#[from] nfl_core::ScheduleError),

    #[error("Standings computation failed: {0}")]
    Standings(#[from] nfl_core::StandingsError),

    #[error("Rating error: {0}")]
    Rating(#[from] nfl_ratings::RatingError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] nfl_ratings::CalibrationError),

    #[error("Simulation failed: {0}")]
    Simulation(#[from] nfl_simulation::SimulationError),
}

pub type Result<T> = std::result::Result<T, CliError>;
