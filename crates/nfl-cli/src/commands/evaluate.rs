//! Evaluate command implementation.

use nfl_simulation::evaluate;

use crate::cli::{EvaluateArgs, OutputFormat};
use crate::data;
use crate::error::Result;
use crate::output::{render_evaluation_table, Output};

pub fn run_evaluate(args: &EvaluateArgs, format: OutputFormat) -> Result<()> {
    let output = Output::new(format);

    let samples = data::load_predictions(&args.predictions)?;
    let report = evaluate(&samples);

    if output.is_json() {
        output.print_json(&report);
    } else {
        render_evaluation_table(&report);
    }

    Ok(())
}
