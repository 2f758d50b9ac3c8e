//! Chronological ELO rollforward over completed games.

use serde::{Deserialize, Serialize};

use nfl_core::{CompletedGame, League, TeamId};

use crate::context::ContextTable;
use crate::elo::EloModel;
use crate::store::{RatingError, RatingStore};

/// One processed game: pre-game ratings and the applied delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollforwardRow {
    pub game_id: u32,
    pub home: TeamId,
    pub visiting: TeamId,
    /// Pre-game ratings.
    pub home_elo: f64,
    pub visiting_elo: f64,
    /// `None` for a tie.
    pub winner: Option<TeamId>,
    pub margin: u16,
    pub context_adjustment: f64,
    /// Raw model probability that the home side wins this game.
    pub home_win_probability: f64,
    /// Applied as `home -= delta`, `visiting += delta`.
    pub delta: f64,
}

/// Walks completed games in `game_id` order, updating ratings as it goes.
pub struct RollforwardEngine<'a> {
    league: &'a League,
    model: EloModel,
}

impl<'a> RollforwardEngine<'a> {
    pub fn new(league: &'a League, model: EloModel) -> Self {
        Self { league, model }
    }

    /// Process every completed game. Returns the per-game log and the
    /// terminal ratings. The input is expected in chronological order
    /// (enforced by schedule validation before anything runs).
    pub fn run(
        &self,
        initial: &RatingStore,
        completed: &[CompletedGame],
        context: &ContextTable,
    ) -> Result<(Vec<RollforwardRow>, RatingStore), RatingError> {
        let mut ratings = initial.snapshot();
        let mut rows = Vec::with_capacity(completed.len());

        for cg in completed {
            let game = &cg.game;
            for team in [game.home, game.visiting] {
                if self.league.get(team).is_none() {
                    return Err(RatingError::MissingRating(team));
                }
            }

            let home_elo = ratings.get(game.home);
            let visiting_elo = ratings.get(game.visiting);
            let home_adv = self.model.home_advantage(game.neutral_site);
            let ctx = context.get(game.game_id);

            let delta = self.model.rating_delta(
                cg.result,
                home_elo,
                visiting_elo,
                home_adv,
                ctx,
                cg.margin,
            );
            let home_win_probability =
                self.model
                    .home_win_probability(home_elo, visiting_elo, home_adv, ctx);

            rows.push(RollforwardRow {
                game_id: game.game_id,
                home: game.home,
                visiting: game.visiting,
                home_elo,
                visiting_elo,
                winner: cg.winner(),
                margin: cg.margin,
                context_adjustment: ctx,
                home_win_probability,
                delta,
            });

            ratings.set(game.home, home_elo - delta);
            ratings.set(game.visiting, visiting_elo + delta);
        }

        ratings.check_bounds()?;
        Ok((rows, ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfl_core::{Division, Game, GameResult, League, Team};

    fn test_league() -> League {
        let mut teams = Vec::new();
        for (d, division) in Division::ALL.into_iter().enumerate() {
            for slot in 0..4 {
                let id = TeamId((d * 4 + slot) as u8);
                teams.push(Team::new(
                    id,
                    format!("Team {}", id.0),
                    format!("T{:02}", id.0),
                    division,
                ));
            }
        }
        League::new(teams)
    }

    fn completed(
        game_id: u32,
        home: u8,
        visiting: u8,
        result: GameResult,
        margin: u16,
    ) -> CompletedGame {
        CompletedGame::new(
            Game::new(game_id, 1, TeamId(home), TeamId(visiting)),
            result,
            margin,
        )
    }

    #[test]
    fn test_empty_rollforward_is_identity() {
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let initial = RatingStore::uniform(1505.0);
        let (rows, finals) = engine.run(&initial, &[], &ContextTable::new()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(finals, initial);
    }

    #[test]
    fn test_single_game_zero_sum() {
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let initial = RatingStore::uniform(1500.0);
        let games = vec![completed(1, 0, 1, GameResult::HomeWin, 7)];
        let (rows, finals) = engine.run(&initial, &games, &ContextTable::new()).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.winner, Some(TeamId(0)));
        assert!(row.delta < 0.0);
        assert!((finals.get(TeamId(0)) - (1500.0 - row.delta)).abs() < 1e-12);
        assert!((finals.get(TeamId(1)) - (1500.0 + row.delta)).abs() < 1e-12);
        assert!(
            (finals.get(TeamId(0)) + finals.get(TeamId(1)) - 3000.0).abs() < 1e-12,
            "pair sum preserved"
        );
    }

    #[test]
    fn test_pre_game_ratings_recorded() {
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let initial = RatingStore::uniform(1500.0);
        let games = vec![
            completed(1, 0, 1, GameResult::HomeWin, 10),
            completed(2, 0, 1, GameResult::HomeWin, 10),
        ];
        let (rows, _) = engine.run(&initial, &games, &ContextTable::new()).unwrap();

        assert_eq!(rows[0].home_elo, 1500.0);
        // The second meeting sees the ratings moved by the first.
        assert!(rows[1].home_elo > 1500.0);
        assert!(rows[1].visiting_elo < 1500.0);
        // Winning again as a bigger favorite moves less.
        assert!(rows[1].delta.abs() < rows[0].delta.abs());
    }

    #[test]
    fn test_tie_with_zero_margin_moves_nothing() {
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let initial = RatingStore::uniform(1500.0);
        let games = vec![completed(1, 0, 1, GameResult::Tie, 0)];
        let (rows, finals) = engine.run(&initial, &games, &ContextTable::new()).unwrap();
        assert_eq!(rows[0].delta, 0.0);
        assert_eq!(finals.get(TeamId(0)), 1500.0);
        assert_eq!(finals.get(TeamId(1)), 1500.0);
    }

    #[test]
    fn test_missing_context_treated_as_zero() {
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let initial = RatingStore::uniform(1500.0);
        let games = vec![completed(1, 0, 1, GameResult::HomeWin, 7)];

        let (with_empty, _) = engine.run(&initial, &games, &ContextTable::new()).unwrap();
        let mut table = ContextTable::new();
        table.insert(999, -5.0);
        let (with_other, _) = engine.run(&initial, &games, &table).unwrap();
        assert_eq!(with_empty[0].delta, with_other[0].delta);
        assert_eq!(with_other[0].context_adjustment, 0.0);
    }

    #[test]
    fn test_full_season_sum_preserved() {
        // A 272-game synthetic slate: the league rating sum must survive to
        // within 1e-6.
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let mut initial = RatingStore::uniform(1505.0);
        for i in 0..32u8 {
            initial.set(TeamId(i), 1400.0 + (i as f64) * 6.5);
        }
        let start_sum = initial.sum();

        let mut games = Vec::new();
        for g in 0..272u32 {
            let home = (g * 7 % 32) as u8;
            let mut visiting = (g * 11 % 32) as u8;
            if visiting == home {
                visiting = (visiting + 1) % 32;
            }
            let result = if g % 3 == 0 {
                GameResult::VisitingWin
            } else {
                GameResult::HomeWin
            };
            games.push(completed(g + 1, home, visiting, result, (g % 21 + 1) as u16));
        }

        let (rows, finals) = engine.run(&initial, &games, &ContextTable::new()).unwrap();
        assert_eq!(rows.len(), 272);
        assert!((finals.sum() - start_sum).abs() < 1e-6);
    }

    #[test]
    fn test_neutral_site_suppresses_advantage() {
        let league = test_league();
        let engine = RollforwardEngine::new(&league, EloModel::default());
        let initial = RatingStore::uniform(1500.0);

        let neutral = vec![CompletedGame::new(
            Game::new(1, 1, TeamId(0), TeamId(1)).at_neutral_site(),
            GameResult::HomeWin,
            3,
        )];
        let (rows, _) = engine.run(&initial, &neutral, &ContextTable::new()).unwrap();
        assert!((rows[0].home_win_probability - 0.5).abs() < 1e-12);
        assert!((rows[0].delta + 13.86).abs() < 0.01);
    }
}
