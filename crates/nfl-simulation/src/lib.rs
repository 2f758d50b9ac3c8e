//! Monte Carlo simulation of the remaining NFL regular season.
//!
//! - `engine`: one scenario — sample every unplayed game, seed the season
//! - `runner`: parallel scenario execution with deterministic RNG streams
//! - `aggregator`: per-team probabilities with confidence intervals
//! - `evaluation`: Brier / log loss / accuracy / calibration bins

pub mod aggregator;
pub mod engine;
pub mod evaluation;
pub mod runner;

pub use aggregator::{ForecastSummary, IntervalEstimate, TeamForecast};
pub use engine::{ScenarioOutcome, SeasonEngine, SimulatedGame, TeamScenarioLine};
pub use evaluation::{evaluate, CalibrationBin, EvaluationReport, PredictionSample};
pub use runner::{CancelToken, SimulationConfig, SimulationError, SimulationOutput, SimulationRunner};
