//! Simulate command implementation.

use nfl_core::{ForecastConfig, League, Schedule};
use nfl_ratings::{EloModel, RollforwardEngine};
use nfl_simulation::{ForecastSummary, SimulationConfig, SimulationRunner};

use crate::cli::{OutputFormat, SimulateArgs};
use crate::data;
use crate::error::Result;
use crate::output::{render_forecast_table, ForecastJsonOutput, Output};

pub fn run_simulate(args: &SimulateArgs, league: &League, format: OutputFormat) -> Result<()> {
    let output = Output::new(format);

    let mut ratings = data::load_ratings(league, &args.ratings)?;
    let completed = match &args.games {
        Some(path) => data::load_completed_games(league, path)?,
        None => Vec::new(),
    };
    let remaining = data::load_schedule(league, &args.schedule)?;
    let context = data::load_context(args.context.as_deref())?;

    // All validation before any mutation.
    let schedule = Schedule::new(completed, remaining);
    schedule.validate(league)?;

    let forecast_config = ForecastConfig::default();

    // Preseason procedures run before the rollforward.
    if args.preseason {
        ratings.regress_to_mean(
            forecast_config.regression_mean,
            forecast_config.regression_factor,
        );
        if let Some(path) = &args.market_totals {
            let totals = data::load_market_totals(league, path)?;
            ratings.blend_market(
                &totals,
                forecast_config.regression_mean,
                forecast_config.market_weight,
            );
        }
    }

    let model = EloModel {
        home_field_advantage: args.home_advantage,
        k_factor: args.k_factor,
        ..EloModel::default()
    };

    // Roll completed games forward to the current ratings.
    let engine = RollforwardEngine::new(league, model);
    let (_, current) = engine.run(&ratings, &schedule.completed, &context)?;

    // Monte Carlo over the remaining slate.
    let mut sim_config = SimulationConfig::with_scenarios(args.scenarios)
        .with_seed(args.seed)
        .with_detail(args.detail.to_detail_level());
    sim_config.rating_mode = args.rating_mode();
    if let Some(threads) = args.threads {
        sim_config = sim_config.with_workers(threads);
    }

    let runner = SimulationRunner::new(league, &schedule, &context, &current, model, sim_config);
    let sim_output = runner.run()?;

    if let Some(path) = &args.standings_out {
        std::fs::write(path, serde_json::to_string_pretty(&sim_output.outcomes)?)?;
    }

    let summary =
        ForecastSummary::from_outcomes(&sim_output.outcomes, sim_output.requested_scenarios);

    if output.is_json() {
        output.print_json(&ForecastJsonOutput::from_summary(&summary, league, &current));
    } else {
        render_forecast_table(&summary, league, &current, args.top);
    }

    Ok(())
}
