//! Input table loading.
//!
//! All inputs are JSON tables resolved against the league roster. Team
//! references accept the full name or the short code. Every load error
//! names the offending record.

use std::path::Path;

use serde::Deserialize;

use nfl_core::{
    CompletedGame, Conference, Division, Game, GameResult, League, Team, TeamId,
};
use nfl_ratings::CalibrationMap;
use nfl_simulation::PredictionSample;

use crate::error::{CliError, Result};

/// Embedded default league roster.
pub const EMBEDDED_TEAMS: &str = include_str!("../../../data/teams.json");

#[derive(Debug, Deserialize)]
struct LeagueData {
    teams: Vec<TeamData>,
}

#[derive(Debug, Deserialize)]
struct TeamData {
    id: u8,
    name: String,
    code: String,
    conference: Conference,
    division: Division,
}

/// Load and validate the roster from a file, or the embedded default.
pub fn load_league(path: Option<&Path>) -> Result<League> {
    let content = match path {
        Some(p) => read_file(p)?,
        None => EMBEDDED_TEAMS.to_string(),
    };
    let data: LeagueData = serde_json::from_str(&content)?;

    let teams: Vec<Team> = data
        .teams
        .into_iter()
        .map(|t| {
            let mut team = Team::new(TeamId(t.id), t.name, t.code, t.division);
            team.conference = t.conference;
            team
        })
        .collect();

    let league = League::new(teams);
    league.validate()?;
    Ok(league)
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    team: String,
    elo_rating: f64,
}

/// Load the initial ratings table.
pub fn load_ratings(league: &League, path: &Path) -> Result<nfl_ratings::RatingStore> {
    let rows: Vec<RatingRow> = serde_json::from_str(&read_file(path)?)?;
    let pairs: Vec<(String, f64)> = rows.into_iter().map(|r| (r.team, r.elo_rating)).collect();
    Ok(nfl_ratings::RatingStore::from_table(league, &pairs)?)
}

fn default_neutral() -> u8 {
    0
}

#[derive(Debug, Deserialize)]
struct CompletedGameRow {
    game_id: u32,
    week: u8,
    home_team: String,
    visiting_team: String,
    winning_team: Option<String>,
    game_result: f64,
    #[serde(default = "default_neutral")]
    neutral_site: u8,
    margin: u16,
}

/// Load completed games, checking result codes and winner referential
/// integrity.
pub fn load_completed_games(league: &League, path: &Path) -> Result<Vec<CompletedGame>> {
    let rows: Vec<CompletedGameRow> = serde_json::from_str(&read_file(path)?)?;
    rows.into_iter()
        .map(|row| {
            let home = resolve_team(league, &row.home_team)?;
            let visiting = resolve_team(league, &row.visiting_team)?;

            let result =
                GameResult::from_code(row.game_result).ok_or(CliError::InvalidResultCode {
                    game_id: row.game_id,
                    code: row.game_result,
                })?;

            // The recorded winner must be a participant and agree with the
            // result code.
            let expected_winner = match result {
                GameResult::HomeWin => Some(home),
                GameResult::VisitingWin => Some(visiting),
                GameResult::Tie => None,
            };
            if let Some(name) = &row.winning_team {
                let winner = resolve_team(league, name)?;
                if expected_winner != Some(winner) {
                    return Err(CliError::WinnerNotInGame {
                        game_id: row.game_id,
                        winner: name.clone(),
                    });
                }
            }

            let mut game = Game::new(row.game_id, row.week, home, visiting);
            if row.neutral_site != 0 {
                game = game.at_neutral_site();
            }
            Ok(CompletedGame::new(game, result, row.margin))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    game_id: u32,
    week: u8,
    home_team: String,
    visiting_team: String,
    #[serde(default = "default_neutral")]
    neutral_site: u8,
}

/// Load the remaining schedule.
pub fn load_schedule(league: &League, path: &Path) -> Result<Vec<Game>> {
    let rows: Vec<ScheduleRow> = serde_json::from_str(&read_file(path)?)?;
    rows.into_iter()
        .map(|row| {
            let home = resolve_team(league, &row.home_team)?;
            let visiting = resolve_team(league, &row.visiting_team)?;
            let mut game = Game::new(row.game_id, row.week, home, visiting);
            if row.neutral_site != 0 {
                game = game.at_neutral_site();
            }
            Ok(game)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ContextRow {
    game_id: u32,
    total_contextual_adjustment: f64,
}

/// Load per-game context adjustments; games without a row default to 0.
pub fn load_context(path: Option<&Path>) -> Result<nfl_ratings::ContextTable> {
    let Some(path) = path else {
        return Ok(nfl_ratings::ContextTable::new());
    };
    let rows: Vec<ContextRow> = serde_json::from_str(&read_file(path)?)?;
    Ok(nfl_ratings::ContextTable::from_rows(
        rows.into_iter()
            .map(|r| (r.game_id, r.total_contextual_adjustment)),
    ))
}

#[derive(Debug, Deserialize)]
struct MarketRow {
    team: String,
    win_total: f64,
}

/// Load market win totals. Teams may be missing; they keep their
/// regressed rating.
pub fn load_market_totals(league: &League, path: &Path) -> Result<Vec<(TeamId, f64)>> {
    let rows: Vec<MarketRow> = serde_json::from_str(&read_file(path)?)?;
    rows.into_iter()
        .map(|row| Ok((resolve_team(league, &row.team)?, row.win_total)))
        .collect()
}

/// Load a calibration artifact and check its version and monotonicity.
pub fn load_calibration(path: &Path) -> Result<CalibrationMap> {
    let map: CalibrationMap = serde_json::from_str(&read_file(path)?)?;
    map.validate()?;
    Ok(map)
}

#[derive(Debug, Deserialize)]
struct PredictionRow {
    predicted_home_win_prob: f64,
    actual: f64,
}

/// Load past predictions for evaluation.
pub fn load_predictions(path: &Path) -> Result<Vec<PredictionSample>> {
    let rows: Vec<PredictionRow> = serde_json::from_str(&read_file(path)?)?;
    Ok(rows
        .into_iter()
        .map(|r| PredictionSample::new(r.predicted_home_win_prob, r.actual))
        .collect())
}

fn resolve_team(league: &League, query: &str) -> Result<TeamId> {
    league
        .find(query)
        .map(|t| t.id)
        .ok_or_else(|| CliError::TeamNotFound(query.to_string()))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|_| CliError::InvalidDataFile(path.to_path_buf()))
}
