//! Run configuration.

use serde::{Deserialize, Serialize};

/// How much per-game detail the simulator retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// Keep one row per simulated game.
    PerGame,
    /// Keep only per-team season aggregates.
    #[default]
    PerTeamOnly,
}

/// How working ratings evolve inside a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimRatingMode {
    /// Update ratings after each simulated game with a unit margin.
    #[default]
    UnitMargin,
    /// Keep the rollforward-final ratings frozen for the whole scenario.
    Frozen,
}

/// All tunable knobs, passed immutably into every subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// ELO points granted to the home side at non-neutral sites.
    pub home_field_advantage: f64,
    /// Learning rate of the rating update.
    pub k_factor: f64,
    /// Rating scale: this many points of difference is ~91% win probability.
    pub elo_scale: f64,
    /// Margin-of-victory multiplier base constant.
    pub mov_base: f64,
    /// Margin-of-victory rating-gap damping factor.
    pub mov_divisor: f64,
    /// Canonical league mean rating.
    pub regression_mean: f64,
    /// Fraction regressed toward the mean at preseason.
    pub regression_factor: f64,
    /// Weight of the market win-total estimate in the preseason blend.
    pub market_weight: f64,
    /// Number of Monte Carlo scenarios.
    pub scenarios: u32,
    /// Base seed for scenario RNG streams.
    pub global_seed: u64,
    /// Per-game vs per-team simulation output.
    pub detail_level: DetailLevel,
    /// In-scenario rating behavior.
    pub rating_mode: SimRatingMode,
    /// Worker threads for the scenario pool; `None` auto-detects.
    pub worker_count: Option<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            home_field_advantage: 52.0,
            k_factor: 20.0,
            elo_scale: 400.0,
            mov_base: 2.2,
            mov_divisor: 0.001,
            regression_mean: 1505.0,
            regression_factor: 1.0 / 3.0,
            market_weight: 2.0 / 3.0,
            scenarios: 10_000,
            global_seed: 42,
            detail_level: DetailLevel::default(),
            rating_mode: SimRatingMode::default(),
            worker_count: None,
        }
    }
}

impl ForecastConfig {
    /// Builder method to set the scenario count.
    pub fn with_scenarios(mut self, scenarios: u32) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Builder method to set the global seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.global_seed = seed;
        self
    }

    /// Builder method to set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers);
        self
    }
}
