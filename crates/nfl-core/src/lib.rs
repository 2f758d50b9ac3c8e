//! Core domain types for NFL season forecasting.
//!
//! This crate provides the fundamental types used throughout the forecast:
//! - Teams, conferences, and divisions
//! - Games, completed results, and the season schedule
//! - Season standings (records, head-to-head, strength metrics)
//! - Playoff seeding via the NFL tiebreaker cascade
//! - Run configuration

pub mod config;
pub mod game;
pub mod league;
pub mod schedule;
pub mod seeding;
pub mod standings;
pub mod team;

pub use config::{DetailLevel, ForecastConfig, SimRatingMode};
pub use game::{CompletedGame, Game, GameResult};
pub use league::{League, LeagueError};
pub use schedule::{Schedule, ScheduleError};
pub use seeding::{
    season_seeding, seed_conference, ConferenceSeeding, SeasonSeeding, SeedDecision, SeedTrace,
    TiebreakStep,
};
pub use standings::{build_records, SeasonGame, StandingsError, Tally, TeamRecord};
pub use team::{Conference, Division, Team, TeamId, NUM_TEAMS, TEAMS_PER_CONFERENCE};
