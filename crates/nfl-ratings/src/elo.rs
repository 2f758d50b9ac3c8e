//! The ELO update rule with margin-of-victory and context adjustments.
//!
//! Follows the FiveThirtyEight NFL methodology: the rating delta is
//! K * (actual - expected) damped by a margin-of-victory multiplier that
//! grows with the score margin and shrinks with the winner's pre-game
//! advantage.

use nfl_core::{ForecastConfig, GameResult};

/// The rating model's five knobs.
#[derive(Debug, Clone, Copy)]
pub struct EloModel {
    /// Home advantage in ELO points at non-neutral sites.
    pub home_field_advantage: f64,
    /// Learning rate.
    pub k_factor: f64,
    /// Rating scale (400: a 400-point edge is ~91% win probability).
    pub elo_scale: f64,
    /// MOV multiplier base constant.
    pub mov_base: f64,
    /// MOV rating-gap damping factor.
    pub mov_divisor: f64,
}

impl Default for EloModel {
    fn default() -> Self {
        Self {
            home_field_advantage: 52.0,
            k_factor: 20.0,
            elo_scale: 400.0,
            mov_base: 2.2,
            mov_divisor: 0.001,
        }
    }
}

impl EloModel {
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            home_field_advantage: config.home_field_advantage,
            k_factor: config.k_factor,
            elo_scale: config.elo_scale,
            mov_base: config.mov_base,
            mov_divisor: config.mov_divisor,
        }
    }

    /// Home advantage for a game: zero at a neutral site.
    pub fn home_advantage(&self, neutral_site: bool) -> f64 {
        if neutral_site {
            0.0
        } else {
            self.home_field_advantage
        }
    }

    /// Expected win probability for the visiting team.
    ///
    /// `ctx` is the per-game context adjustment; it enters on the visiting
    /// side of the exponent, so the negative values produced by the context
    /// adjuster (travel, altitude, short rest all penalize the visitor)
    /// favor the home club.
    pub fn visiting_win_probability(
        &self,
        home_elo: f64,
        visiting_elo: f64,
        home_adv: f64,
        ctx: f64,
    ) -> f64 {
        let exponent = -(visiting_elo - home_elo - home_adv + ctx) / self.elo_scale;
        1.0 / (10.0_f64.powf(exponent) + 1.0)
    }

    /// Expected win probability for the home team.
    pub fn home_win_probability(
        &self,
        home_elo: f64,
        visiting_elo: f64,
        home_adv: f64,
        ctx: f64,
    ) -> f64 {
        1.0 - self.visiting_win_probability(home_elo, visiting_elo, home_adv, ctx)
    }

    /// Rating change for a completed game, from the home side's
    /// perspective: positive means the visitor gains rating. Apply as
    /// `home -= delta`, `visiting += delta`, which keeps the pair sum exact.
    ///
    /// A zero margin yields a zero delta (ln(1) = 0); recorded ties carry
    /// margin 0 and therefore never move ratings. No margin floor is
    /// substituted.
    pub fn rating_delta(
        &self,
        result: GameResult,
        home_elo: f64,
        visiting_elo: f64,
        home_adv: f64,
        ctx: f64,
        margin: u16,
    ) -> f64 {
        let adj_home_elo = home_elo + home_adv - ctx;

        // Rating gap from the winner's perspective; negative for an upset,
        // which inflates the multiplier.
        let winner_elo_diff = if result == GameResult::VisitingWin {
            visiting_elo - adj_home_elo
        } else {
            adj_home_elo - visiting_elo
        };

        let mov_multiplier = ((margin as f64) + 1.0).ln()
            * (self.mov_base / (winner_elo_diff * self.mov_divisor + self.mov_base));

        let expected_visiting_win =
            self.visiting_win_probability(home_elo, visiting_elo, home_adv, ctx);

        self.k_factor * (result.actual() - expected_visiting_win) * mov_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> EloModel {
        EloModel::default()
    }

    #[test]
    fn test_expected_probability_even_matchup() {
        // Equal teams, home advantage 52: the visitor wins ~42.6% of the
        // time (1 / (1 + 10^0.13)).
        let p = model().visiting_win_probability(1500.0, 1500.0, 52.0, 0.0);
        assert!(p > 0.42 && p < 0.43, "got {p}");
    }

    #[test]
    fn test_probabilities_complement() {
        let m = model();
        let pv = m.visiting_win_probability(1620.0, 1540.0, 52.0, -3.0);
        let ph = m.home_win_probability(1620.0, 1540.0, 52.0, -3.0);
        assert!((pv + ph - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_four_hundred_points_is_ninety_one_pct() {
        let p = model().visiting_win_probability(1400.0, 1800.0, 0.0, 0.0);
        assert!((p - 0.9090909).abs() < 1e-4, "got {p}");
    }

    #[test]
    fn test_home_win_delta_even_matchup() {
        // Even teams, home wins by 7: the home side gains (delta negative).
        let delta = model().rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, 0.0, 7);
        assert!(delta < 0.0);
        assert!(delta > -20.0, "got {delta}");
    }

    #[test]
    fn test_visiting_upset_larger_than_home_win() {
        // Winning on the road against the home advantage is the bigger
        // surprise, so the magnitude is larger.
        let m = model();
        let home = m.rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, 0.0, 7);
        let road = m.rating_delta(GameResult::VisitingWin, 1500.0, 1500.0, 52.0, 0.0, 7);
        assert!(road > 0.0);
        assert!(road.abs() > home.abs());
    }

    #[test]
    fn test_neutral_site_even_matchup_exact() {
        // No home advantage, even teams, 3-point win:
        // delta = 20 * 0.5 * ln(4) = 13.8629...
        let delta = model().rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 0.0, 0.0, 3);
        assert!((delta + 20.0 * 0.5 * 4.0_f64.ln()).abs() < 1e-9);
        assert!((delta + 13.86).abs() < 0.01, "got {delta}");

        // The same score with home advantage moves less: the win was more
        // expected.
        let with_adv = model().rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, 0.0, 3);
        assert!(with_adv.abs() < delta.abs());
    }

    #[test]
    fn test_heavy_favorite_small_update() {
        // 1600 over 1400 at home by 14: expected outcome, small move.
        let delta = model().rating_delta(GameResult::HomeWin, 1600.0, 1400.0, 52.0, 0.0, 14);
        assert!(delta < 0.0);
        assert!(delta.abs() < 10.0, "got {delta}");
    }

    #[test]
    fn test_margin_zero_is_no_op() {
        let m = model();
        for result in [GameResult::HomeWin, GameResult::VisitingWin, GameResult::Tie] {
            let delta = m.rating_delta(result, 1480.0, 1560.0, 52.0, 0.0, 0);
            assert_eq!(delta, 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        // Swapping the teams and flipping the result negates the delta.
        let m = model();
        let a = m.rating_delta(GameResult::HomeWin, 1550.0, 1450.0, 0.0, 0.0, 7);
        let b = m.rating_delta(GameResult::VisitingWin, 1450.0, 1550.0, 0.0, 0.0, 7);
        assert!((a + b).abs() < 1e-12, "a={a} b={b}");
    }

    #[test]
    fn test_k_linearity() {
        let mut doubled = model();
        doubled.k_factor = 40.0;
        let base = model().rating_delta(GameResult::HomeWin, 1520.0, 1490.0, 52.0, 0.0, 10);
        let twice = doubled.rating_delta(GameResult::HomeWin, 1520.0, 1490.0, 52.0, 0.0, 10);
        assert!((twice - 2.0 * base).abs() < 1e-12);
    }

    #[test]
    fn test_blowout_beats_close_game() {
        let m = model();
        let close = m.rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, 0.0, 3);
        let blowout = m.rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, 0.0, 28);
        assert!(blowout.abs() > close.abs());
        // ln(29)/ln(4) ~ 2.43.
        let ratio = blowout.abs() / close.abs();
        assert!(ratio > 2.0 && ratio < 3.0, "got {ratio}");
    }

    #[test]
    fn test_context_favors_home_when_negative() {
        // A travel-penalized visitor is less likely to win.
        let m = model();
        let without = m.visiting_win_probability(1500.0, 1500.0, 52.0, 0.0);
        let with = m.visiting_win_probability(1500.0, 1500.0, 52.0, -10.0);
        assert!(with < without);
    }

    #[test]
    fn test_context_enters_winner_gap() {
        // A home favorite winning with a context edge was even more
        // expected, so the multiplier damps the delta further.
        let m = model();
        let without = m.rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, 0.0, 7);
        let with = m.rating_delta(GameResult::HomeWin, 1500.0, 1500.0, 52.0, -10.0, 7);
        assert!(with.abs() < without.abs());
    }
}
