//! Rollforward command implementation.

use nfl_core::{League, Schedule};
use nfl_ratings::{EloModel, RollforwardEngine};

use crate::cli::{OutputFormat, RollforwardArgs};
use crate::data;
use crate::error::Result;
use crate::output::{render_rollforward_table, Output, RollforwardJsonOutput};

pub fn run_rollforward(args: &RollforwardArgs, league: &League, format: OutputFormat) -> Result<()> {
    let output = Output::new(format);

    let initial = data::load_ratings(league, &args.ratings)?;
    let completed = data::load_completed_games(league, &args.games)?;
    let context = data::load_context(args.context.as_deref())?;
    let calibration = args
        .calibration
        .as_deref()
        .map(data::load_calibration)
        .transpose()?;

    // Validate ordering and referential integrity before any mutation.
    let schedule = Schedule::new(completed, Vec::new());
    schedule.validate(league)?;

    let model = EloModel {
        home_field_advantage: args.home_advantage,
        k_factor: args.k_factor,
        ..EloModel::default()
    };
    let engine = RollforwardEngine::new(league, model);
    let (rows, finals) = engine.run(&initial, &schedule.completed, &context)?;

    // Calibrate raw probabilities before reporting when a map was given.
    let calibrated: Option<Vec<f64>> = calibration
        .as_ref()
        .map(|map| rows.iter().map(|r| map.apply(r.home_win_probability)).collect());

    if output.is_json() {
        output.print_json(&RollforwardJsonOutput::new(
            &rows,
            calibrated.as_deref(),
            &finals,
            league,
        ));
    } else {
        render_rollforward_table(&rows, &finals, league, calibrated.as_deref());
    }

    Ok(())
}
