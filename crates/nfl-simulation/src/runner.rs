//! Parallel Monte Carlo runner.
//!
//! Scenarios are the unit of parallel work. Each scenario draws from its
//! own ChaCha stream derived from `(global seed, scenario_id)`, so the
//! multiset of outputs does not depend on worker count or scheduling.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use nfl_core::{
    DetailLevel, ForecastConfig, League, Schedule, SimRatingMode, StandingsError,
};
use nfl_ratings::{ContextTable, EloModel, RatingStore};

use crate::engine::{ScenarioOutcome, SeasonEngine, SimulatedGame};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of scenarios to run.
    pub scenarios: u32,
    /// Base seed; scenario `i` uses stream `i` of this seed.
    pub seed: u64,
    /// Worker threads (`None` for one per hardware thread).
    pub worker_count: Option<usize>,
    /// Whether to retain per-game rows.
    pub detail_level: DetailLevel,
    /// In-scenario rating behavior.
    pub rating_mode: SimRatingMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenarios: 10_000,
            seed: 42,
            worker_count: None,
            detail_level: DetailLevel::PerTeamOnly,
            rating_mode: SimRatingMode::UnitMargin,
        }
    }
}

impl SimulationConfig {
    pub fn from_forecast(config: &ForecastConfig) -> Self {
        Self {
            scenarios: config.scenarios,
            seed: config.global_seed,
            worker_count: config.worker_count,
            detail_level: config.detail_level,
            rating_mode: config.rating_mode,
        }
    }

    /// Builder method to set the scenario count.
    pub fn with_scenarios(scenarios: u32) -> Self {
        Self {
            scenarios,
            ..Default::default()
        }
    }

    /// Builder method to set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers);
        self
    }

    /// Builder method to keep per-game rows.
    pub fn with_detail(mut self, detail_level: DetailLevel) -> Self {
        self.detail_level = detail_level;
        self
    }
}

/// Cooperative cancellation, checked between scenarios.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Simulation errors.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Standings(#[from] StandingsError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("A scenario worker panicked; run aborted")]
    WorkerPanic,
}

/// Output of a run. `outcomes` holds one entry per completed scenario in
/// `scenario_id` order; a cancelled run carries fewer than requested.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub requested_scenarios: u32,
    pub outcomes: Vec<ScenarioOutcome>,
    /// Per-game rows keyed by `(scenario_id, game_id)`, retained only at
    /// `DetailLevel::PerGame`.
    pub game_log: Option<Vec<SimulatedGame>>,
}

impl SimulationOutput {
    pub fn completed_scenarios(&self) -> u32 {
        self.outcomes.len() as u32
    }
}

/// Runs scenarios across a worker pool.
pub struct SimulationRunner<'a> {
    league: &'a League,
    schedule: &'a Schedule,
    context: &'a ContextTable,
    snapshot: &'a RatingStore,
    model: EloModel,
    config: SimulationConfig,
}

impl<'a> SimulationRunner<'a> {
    pub fn new(
        league: &'a League,
        schedule: &'a Schedule,
        context: &'a ContextTable,
        snapshot: &'a RatingStore,
        model: EloModel,
        config: SimulationConfig,
    ) -> Self {
        Self {
            league,
            schedule,
            context,
            snapshot,
            model,
            config,
        }
    }

    /// Run to completion.
    pub fn run(&self) -> Result<SimulationOutput, SimulationError> {
        self.run_with_cancel(&CancelToken::new())
    }

    /// Run, checking the token between scenarios. Cancellation yields a
    /// well-formed partial output.
    pub fn run_with_cancel(
        &self,
        cancel: &CancelToken,
    ) -> Result<SimulationOutput, SimulationError> {
        let pool = {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(threads) = self.config.worker_count {
                builder = builder.num_threads(threads);
            }
            builder
                .build()
                .map_err(|e| SimulationError::ThreadPool(e.to_string()))?
        };

        let engine = SeasonEngine::new(
            self.league,
            self.schedule,
            self.context,
            self.model,
            self.config.rating_mode,
        );

        // Per-game rows stream over an MPSC channel: every worker clone of
        // the sender produces, one consumer collects after the pool drains.
        let (sender, receiver) = mpsc::channel::<SimulatedGame>();
        let sink = match self.config.detail_level {
            DetailLevel::PerGame => Some(sender),
            DetailLevel::PerTeamOnly => None,
        };

        let seed = self.config.seed;
        let scenarios = self.config.scenarios;
        let snapshot = self.snapshot;

        let results: Vec<Option<Result<ScenarioOutcome, StandingsError>>> =
            catch_unwind(AssertUnwindSafe(|| {
                pool.install(|| {
                    (0..scenarios)
                        .into_par_iter()
                        .map_with(sink, |sink, scenario_id| {
                            if cancel.is_cancelled() {
                                return None;
                            }
                            let mut rng = ChaCha8Rng::seed_from_u64(seed);
                            rng.set_stream(scenario_id as u64);
                            Some(engine.simulate_scenario(
                                scenario_id,
                                snapshot,
                                &mut rng,
                                sink.as_ref(),
                            ))
                        })
                        .collect()
                })
            }))
            .map_err(|_| SimulationError::WorkerPanic)?;

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results.into_iter().flatten() {
            outcomes.push(result?);
        }
        outcomes.sort_by_key(|o| o.scenario_id);

        // All sender clones died with the pool work above, so this drains
        // without blocking.
        let game_log = match self.config.detail_level {
            DetailLevel::PerGame => {
                let mut rows: Vec<SimulatedGame> = receiver.iter().collect();
                rows.sort_by_key(|r| (r.scenario_id, r.game_id));
                Some(rows)
            }
            DetailLevel::PerTeamOnly => None,
        };

        Ok(SimulationOutput {
            requested_scenarios: scenarios,
            outcomes,
            game_log,
        })
    }
}
