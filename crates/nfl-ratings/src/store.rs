//! The rating store: current ratings for all 32 teams, plus the preseason
//! procedures that produce them.

use serde::{Deserialize, Serialize};

use nfl_core::{League, TeamId, NUM_TEAMS};

/// Sanity bound on any single rating; beyond it the model has diverged.
const RATING_SANITY_BOUND: f64 = 1.0e4;

/// Average number of wins for an 8.5-win league-average club.
const AVERAGE_WIN_TOTAL: f64 = 8.5;

/// ELO points per win above or below average in the market conversion.
const POINTS_PER_WIN: f64 = 25.0;

/// Rating errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RatingError {
    #[error("No rating for team {0:?}")]
    MissingRating(TeamId),

    #[error("Unknown team in ratings table: {0}")]
    UnknownTeam(String),

    #[error("Rating for team {team:?} diverged to {value}")]
    Diverged { team: TeamId, value: f64 },
}

/// Ratings for the whole league, indexed by `TeamId`. Cloning is cheap by
/// design: the simulator snapshots one of these per scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStore {
    ratings: Vec<f64>,
}

impl RatingStore {
    /// A store with every team at the given rating.
    pub fn uniform(rating: f64) -> Self {
        Self {
            ratings: vec![rating; NUM_TEAMS],
        }
    }

    /// Build from `(team name or code, rating)` rows resolved against the
    /// league. Every team must receive a rating.
    pub fn from_table(league: &League, rows: &[(String, f64)]) -> Result<Self, RatingError> {
        let mut ratings = vec![None; NUM_TEAMS];
        for (name, rating) in rows {
            let team = league
                .find(name)
                .ok_or_else(|| RatingError::UnknownTeam(name.clone()))?;
            ratings[team.id.index()] = Some(*rating);
        }
        let ratings = ratings
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.ok_or(RatingError::MissingRating(TeamId(i as u8))))
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(Self { ratings })
    }

    pub fn get(&self, team: TeamId) -> f64 {
        self.ratings[team.index()]
    }

    pub fn set(&mut self, team: TeamId, rating: f64) {
        self.ratings[team.index()] = rating;
    }

    /// Immutable copy.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Sum of all 32 ratings. Preserved by every game update and by
    /// regression-to-mean; market blending intentionally breaks it.
    pub fn sum(&self) -> f64 {
        self.ratings.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, f64)> + '_ {
        self.ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| (TeamId(i as u8), r))
    }

    /// Check every rating against the divergence bound.
    pub fn check_bounds(&self) -> Result<(), RatingError> {
        for (team, rating) in self.iter() {
            if !rating.is_finite() || rating.abs() > RATING_SANITY_BOUND {
                return Err(RatingError::Diverged {
                    team,
                    value: rating,
                });
            }
        }
        Ok(())
    }

    /// Preseason regression toward the league mean:
    /// `r' = r - factor * (r - mean)`.
    pub fn regress_to_mean(&mut self, mean: f64, factor: f64) {
        for rating in &mut self.ratings {
            *rating -= factor * (*rating - mean);
        }
    }

    /// Blend regressed ratings with market win totals. A win total maps to
    /// `mean + (wins - 8.5) * 25`; the output is
    /// `(1 - weight) * rating + weight * market`. Teams without a market
    /// total keep their regressed rating.
    pub fn blend_market(
        &mut self,
        win_totals: &[(TeamId, f64)],
        mean: f64,
        market_weight: f64,
    ) {
        for &(team, wins) in win_totals {
            let market_elo = mean + (wins - AVERAGE_WIN_TOTAL) * POINTS_PER_WIN;
            let current = self.ratings[team.index()];
            self.ratings[team.index()] =
                (1.0 - market_weight) * current + market_weight * market_elo;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfl_core::{Division, League, Team};

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

    #[test]
    fn test_from_table_complete() {
        let league = test_league();
        let rows: Vec<(String, f64)> = (0..32)
            .map(|i| (format!("T{:02}", i), 1500.0 + i as f64))
            .collect();
        let store = RatingStore::from_table(&league, &rows).unwrap();
        assert_eq!(store.get(TeamId(5)), 1505.0);
    }

    #[test]
    fn test_from_table_missing_team() {
        let league = test_league();
        let rows: Vec<(String, f64)> = (0..31)
            .map(|i| (format!("T{:02}", i), 1500.0))
            .collect();
        assert!(matches!(
            RatingStore::from_table(&league, &rows),
            Err(RatingError::MissingRating(TeamId(31)))
        ));
    }

    #[test]
    fn test_from_table_unknown_team() {
        let league = test_league();
        let rows = vec![("Nowhere FC".to_string(), 1500.0)];
        assert!(matches!(
            RatingStore::from_table(&league, &rows),
            Err(RatingError::UnknownTeam(_))
        ));
    }

    #[test]
    fn test_regression_moves_third_of_the_way() {
        let mut store = RatingStore::uniform(1505.0);
        store.set(TeamId(0), 1700.0);
        store.regress_to_mean(1505.0, 1.0 / 3.0);
        assert!((store.get(TeamId(0)) - 1635.0).abs() < 1e-9);
        assert_eq!(store.get(TeamId(1)), 1505.0);
    }

    #[test]
    fn test_regression_preserves_sum_around_mean() {
        // Symmetric deviations cancel, so the league sum is unchanged.
        let mut store = RatingStore::uniform(1505.0);
        store.set(TeamId(0), 1705.0);
        store.set(TeamId(1), 1305.0);
        let before = store.sum();
        store.regress_to_mean(1505.0, 1.0 / 3.0);
        assert!((store.sum() - before).abs() < 1e-9);
    }

    #[test]
    fn test_market_blend() {
        // 12 projected wins maps to 1505 + 3.5 * 25 = 1592.5; with the
        // default 2/3 market weight, a 1635 rating lands at 1606.67.
        let mut store = RatingStore::uniform(1505.0);
        store.set(TeamId(0), 1635.0);
        store.blend_market(&[(TeamId(0), 12.0)], 1505.0, 2.0 / 3.0);
        let expected = 1635.0 / 3.0 + 2.0 * 1592.5 / 3.0;
        assert!((store.get(TeamId(0)) - expected).abs() < 1e-9);
        // No market total: unchanged.
        assert_eq!(store.get(TeamId(1)), 1505.0);
    }

    #[test]
    fn test_bounds_check() {
        let mut store = RatingStore::uniform(1500.0);
        assert!(store.check_bounds().is_ok());
        store.set(TeamId(3), 1.5e4);
        assert!(matches!(
            store.check_bounds(),
            Err(RatingError::Diverged { team: TeamId(3), .. })
        ));
    }
}
