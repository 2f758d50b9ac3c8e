//! Game and result types.

use serde::{Deserialize, Serialize};

use crate::team::TeamId;

/// Outcome of a completed game, from the home side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    HomeWin,
    VisitingWin,
    Tie,
}

impl GameResult {
    /// Numeric encoding used by the rating update: 0 = home win,
    /// 1 = visiting win, 0.5 = tie (visiting-perspective actual score).
    pub fn actual(self) -> f64 {
        match self {
            GameResult::HomeWin => 0.0,
            GameResult::VisitingWin => 1.0,
            GameResult::Tie => 0.5,
        }
    }

    /// Parse the numeric result code from input tables.
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 0.0 {
            Some(GameResult::HomeWin)
        } else if code == 1.0 {
            Some(GameResult::VisitingWin)
        } else if code == 0.5 {
            Some(GameResult::Tie)
        } else {
            None
        }
    }
}

/// A scheduled game. `game_id` is unique and chronologically ordered:
/// a smaller id is played no later than a larger one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Game {
    pub game_id: u32,
    /// Week number, 1..=18
    pub week: u8,
    pub home: TeamId,
    pub visiting: TeamId,
    /// When set, home-field advantage is suppressed.
    pub neutral_site: bool,
}

impl Game {
    pub fn new(game_id: u32, week: u8, home: TeamId, visiting: TeamId) -> Self {
        Self {
            game_id,
            week,
            home,
            visiting,
            neutral_site: false,
        }
    }

    pub fn at_neutral_site(mut self) -> Self {
        self.neutral_site = true;
        self
    }

    /// Whether a team participates in this game.
    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.visiting == team
    }

    /// The other participant.
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if team == self.home {
            Some(self.visiting)
        } else if team == self.visiting {
            Some(self.home)
        } else {
            None
        }
    }
}

/// A game with its final result. `margin` is the non-negative score
/// differential; ties carry margin 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompletedGame {
    pub game: Game,
    pub result: GameResult,
    pub margin: u16,
}

impl CompletedGame {
    pub fn new(game: Game, result: GameResult, margin: u16) -> Self {
        Self {
            game,
            result,
            margin,
        }
    }

    /// The winning team, `None` for a tie.
    pub fn winner(&self) -> Option<TeamId> {
        match self.result {
            GameResult::HomeWin => Some(self.game.home),
            GameResult::VisitingWin => Some(self.game.visiting),
            GameResult::Tie => None,
        }
    }

    /// The losing team, `None` for a tie.
    pub fn loser(&self) -> Option<TeamId> {
        match self.result {
            GameResult::HomeWin => Some(self.game.visiting),
            GameResult::VisitingWin => Some(self.game.home),
            GameResult::Tie => None,
        }
    }
}
