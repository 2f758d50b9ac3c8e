//! Season schedule: completed games plus the remaining slate.

use serde::{Deserialize, Serialize};

use crate::game::{CompletedGame, Game};
use crate::league::League;
use crate::team::TeamId;

/// Completed and remaining games for one season, both in strict
/// chronological (`game_id`) order. All validation happens here, before
/// any downstream mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub completed: Vec<CompletedGame>,
    pub remaining: Vec<Game>,
}

impl Schedule {
    pub fn new(completed: Vec<CompletedGame>, remaining: Vec<Game>) -> Self {
        Self {
            completed,
            remaining,
        }
    }

    /// Validate ordering, uniqueness and referential integrity.
    pub fn validate(&self, league: &League) -> Result<(), ScheduleError> {
        let mut last_id: Option<u32> = None;
        for cg in &self.completed {
            check_game(&cg.game, league)?;
            if let Some(prev) = last_id {
                if cg.game.game_id <= prev {
                    return Err(ScheduleError::OutOfOrder {
                        game_id: cg.game.game_id,
                    });
                }
            }
            last_id = Some(cg.game.game_id);
        }

        let completed_max = last_id;
        let mut last_remaining: Option<u32> = None;
        for game in &self.remaining {
            check_game(game, league)?;
            if let Some(max) = completed_max {
                if game.game_id <= max {
                    return Err(ScheduleError::DuplicateGame {
                        game_id: game.game_id,
                    });
                }
            }
            if let Some(prev) = last_remaining {
                if game.game_id <= prev {
                    return Err(ScheduleError::OutOfOrder {
                        game_id: game.game_id,
                    });
                }
            }
            last_remaining = Some(game.game_id);
        }

        Ok(())
    }
}

fn check_game(game: &Game, league: &League) -> Result<(), ScheduleError> {
    for team in [game.home, game.visiting] {
        if league.get(team).is_none() {
            return Err(ScheduleError::UnknownTeam {
                game_id: game.game_id,
                team,
            });
        }
    }
    if game.home == game.visiting {
        return Err(ScheduleError::SelfMatch {
            game_id: game.game_id,
        });
    }
    if !(1..=18).contains(&game.week) {
        return Err(ScheduleError::InvalidWeek {
            game_id: game.game_id,
            week: game.week,
        });
    }
    Ok(())
}

/// Schedule validation error. Each variant names the first offending game.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    #[error("Game {game_id} is out of chronological order")]
    OutOfOrder { game_id: u32 },

    #[error("Game {game_id} appears in both completed games and the remaining schedule")]
    DuplicateGame { game_id: u32 },

    #[error("Game {game_id} references unknown team {team:?}")]
    UnknownTeam { game_id: u32, team: TeamId },

    #[error("Game {game_id} has identical home and visiting teams")]
    SelfMatch { game_id: u32 },

    #[error("Game {game_id} has week {week} outside 1..=18")]
    InvalidWeek { game_id: u32, week: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameResult;
    use crate::league::fixtures::test_league;

    fn completed(game_id: u32, home: u8, visiting: u8) -> CompletedGame {
        CompletedGame::new(
            Game::new(game_id, 1, TeamId(home), TeamId(visiting)),
            GameResult::HomeWin,
            7,
        )
    }

    #[test]
    fn test_valid_schedule() {
        let league = test_league();
        let schedule = Schedule::new(
            vec![completed(1, 0, 1), completed(2, 2, 3)],
            vec![Game::new(3, 2, TeamId(0), TeamId(2))],
        );
        assert!(schedule.validate(&league).is_ok());
    }

    #[test]
    fn test_out_of_order_completed() {
        let league = test_league();
        let schedule = Schedule::new(vec![completed(5, 0, 1), completed(3, 2, 3)], vec![]);
        assert!(matches!(
            schedule.validate(&league),
            Err(ScheduleError::OutOfOrder { game_id: 3 })
        ));
    }

    #[test]
    fn test_remaining_overlaps_completed() {
        let league = test_league();
        let schedule = Schedule::new(
            vec![completed(1, 0, 1), completed(2, 2, 3)],
            vec![Game::new(2, 2, TeamId(4), TeamId(5))],
        );
        assert!(matches!(
            schedule.validate(&league),
            Err(ScheduleError::DuplicateGame { game_id: 2 })
        ));
    }

    #[test]
    fn test_unknown_team() {
        let league = test_league();
        let schedule = Schedule::new(vec![completed(1, 0, 40)], vec![]);
        assert!(matches!(
            schedule.validate(&league),
            Err(ScheduleError::UnknownTeam { game_id: 1, .. })
        ));
    }

    #[test]
    fn test_week_bounds() {
        let league = test_league();
        let schedule = Schedule::new(
            vec![],
            vec![Game::new(1, 19, TeamId(0), TeamId(1))],
        );
        assert!(matches!(
            schedule.validate(&league),
            Err(ScheduleError::InvalidWeek {
                game_id: 1,
                week: 19
            })
        ));
    }
}
