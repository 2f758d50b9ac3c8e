//! Output formatting for table and JSON modes.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

use nfl_core::{Conference, League, TeamId};
use nfl_ratings::{RatingStore, RollforwardRow};
use nfl_simulation::{EvaluationReport, ForecastSummary, TeamForecast};

use crate::cli::OutputFormat;

/// Output handler based on format selection.
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn print_json<T: Serialize>(&self, data: &T) {
        println!("{}", serde_json::to_string_pretty(data).unwrap());
    }
}

fn pct_with_interval(estimate: f64, lower: f64, upper: f64) -> String {
    format!(
        "{:.1}% [{:.1}% - {:.1}%]",
        estimate * 100.0,
        lower * 100.0,
        upper * 100.0
    )
}

/// Render the per-team forecast, one table per conference.
pub fn render_forecast_table(
    summary: &ForecastSummary,
    league: &League,
    ratings: &RatingStore,
    top: Option<usize>,
) {
    println!();
    println!(
        "Playoff forecast ({} of {} scenarios)",
        summary.completed_scenarios, summary.requested_scenarios
    );
    println!("{}", "=".repeat(72));

    for conference in Conference::ALL {
        let mut forecasts: Vec<&TeamForecast> = league
            .conference_members(conference)
            .iter()
            .map(|&t| summary.team(t))
            .collect();
        forecasts.sort_by(|a, b| {
            b.playoff
                .estimate
                .partial_cmp(&a.playoff.estimate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(top) = top {
            forecasts.truncate(top);
        }

        println!();
        println!("{} Conference", conference);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Team"),
                Cell::new("ELO"),
                Cell::new("Playoffs"),
                Cell::new("First-Round Bye"),
                Cell::new("Wins"),
                Cell::new("Avg Seed"),
            ]);

        for forecast in forecasts {
            let name = league
                .get(forecast.team)
                .map(|t| t.name.as_str())
                .unwrap_or("?");
            table.add_row(vec![
                Cell::new(name),
                Cell::new(format!("{:.0}", ratings.get(forecast.team))),
                Cell::new(pct_with_interval(
                    forecast.playoff.estimate,
                    forecast.playoff.lower,
                    forecast.playoff.upper,
                )),
                Cell::new(pct_with_interval(
                    forecast.bye.estimate,
                    forecast.bye.lower,
                    forecast.bye.upper,
                )),
                Cell::new(format!(
                    "{:.1} [{:.1} - {:.1}]",
                    forecast.wins.estimate, forecast.wins.lower, forecast.wins.upper
                )),
                Cell::new(format!("{:.1}", forecast.seed.estimate)),
            ]);
        }

        println!("{table}");
    }
    println!();
}

/// JSON payload for the simulate command.
#[derive(Serialize)]
pub struct ForecastJsonOutput<'a> {
    pub requested_scenarios: u32,
    pub completed_scenarios: u32,
    pub teams: Vec<ForecastJsonTeam<'a>>,
}

#[derive(Serialize)]
pub struct ForecastJsonTeam<'a> {
    pub team: &'a str,
    pub code: &'a str,
    pub conference: Conference,
    pub elo_rating: f64,
    pub playoff_prob: f64,
    pub playoff_ci: [f64; 2],
    pub bye_prob: f64,
    pub bye_ci: [f64; 2],
    pub avg_wins: f64,
    pub wins_ci: [f64; 2],
    pub avg_seed: f64,
    pub seed_ci: [f64; 2],
}

impl<'a> ForecastJsonOutput<'a> {
    pub fn from_summary(
        summary: &ForecastSummary,
        league: &'a League,
        ratings: &RatingStore,
    ) -> Self {
        let teams = summary
            .teams
            .iter()
            .filter_map(|f| {
                league.get(f.team).map(|team| ForecastJsonTeam {
                    team: &team.name,
                    code: &team.code,
                    conference: team.conference,
                    elo_rating: ratings.get(f.team),
                    playoff_prob: f.playoff.estimate,
                    playoff_ci: [f.playoff.lower, f.playoff.upper],
                    bye_prob: f.bye.estimate,
                    bye_ci: [f.bye.lower, f.bye.upper],
                    avg_wins: f.wins.estimate,
                    wins_ci: [f.wins.lower, f.wins.upper],
                    avg_seed: f.seed.estimate,
                    seed_ci: [f.seed.lower, f.seed.upper],
                })
            })
            .collect();

        Self {
            requested_scenarios: summary.requested_scenarios,
            completed_scenarios: summary.completed_scenarios,
            teams,
        }
    }
}

fn team_name(league: &League, team: TeamId) -> String {
    league
        .get(team)
        .map(|t| t.code.clone())
        .unwrap_or_else(|| format!("#{}", team.0))
}

/// Render the rollforward log. `calibrated` carries per-row calibrated
/// home win probabilities when a calibration map was supplied.
pub fn render_rollforward_table(
    rows: &[RollforwardRow],
    finals: &RatingStore,
    league: &League,
    calibrated: Option<&[f64]>,
) {
    println!();
    println!("ELO rollforward ({} games)", rows.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Game"),
        Cell::new("Visiting"),
        Cell::new("V-ELO"),
        Cell::new("Home"),
        Cell::new("H-ELO"),
        Cell::new("P(home)"),
        Cell::new("Winner"),
        Cell::new("Margin"),
        Cell::new("Delta"),
    ];
    if calibrated.is_some() {
        header.insert(6, Cell::new("P(home) cal"));
    }
    table.set_header(header);

    for (i, row) in rows.iter().enumerate() {
        let mut cells = vec![
            Cell::new(row.game_id),
            Cell::new(team_name(league, row.visiting)),
            Cell::new(format!("{:.1}", row.visiting_elo)),
            Cell::new(team_name(league, row.home)),
            Cell::new(format!("{:.1}", row.home_elo)),
            Cell::new(format!("{:.3}", row.home_win_probability)),
            Cell::new(
                row.winner
                    .map(|w| team_name(league, w))
                    .unwrap_or_else(|| "tie".to_string()),
            ),
            Cell::new(row.margin),
            Cell::new(format!("{:+.2}", row.delta)),
        ];
        if let Some(calibrated) = calibrated {
            cells.insert(6, Cell::new(format!("{:.3}", calibrated[i])));
        }
        table.add_row(cells);
    }
    println!("{table}");

    println!();
    println!("Final ratings");
    let mut ratings: Vec<(TeamId, f64)> = finals.iter().collect();
    ratings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![Cell::new("Team"), Cell::new("ELO")]);
    for (team, rating) in ratings {
        let name = league
            .get(team)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", team.0));
        table.add_row(vec![Cell::new(name), Cell::new(format!("{:.1}", rating))]);
    }
    println!("{table}");
    println!();
}

/// JSON payload for the rollforward command.
#[derive(Serialize)]
pub struct RollforwardJsonOutput<'a> {
    pub games: &'a [RollforwardRow],
    pub calibrated_home_win_prob: Option<&'a [f64]>,
    pub final_ratings: Vec<RatingJsonRow<'a>>,
}

#[derive(Serialize)]
pub struct RatingJsonRow<'a> {
    pub team: &'a str,
    pub elo_rating: f64,
}

impl<'a> RollforwardJsonOutput<'a> {
    pub fn new(
        rows: &'a [RollforwardRow],
        calibrated: Option<&'a [f64]>,
        finals: &RatingStore,
        league: &'a League,
    ) -> Self {
        let final_ratings = finals
            .iter()
            .filter_map(|(team, elo_rating)| {
                league.get(team).map(|t| RatingJsonRow {
                    team: &t.name,
                    elo_rating,
                })
            })
            .collect();
        Self {
            games: rows,
            calibrated_home_win_prob: calibrated,
            final_ratings,
        }
    }
}

/// Render the evaluation report.
pub fn render_evaluation_table(report: &EvaluationReport) {
    println!();
    println!("Prediction quality ({} games)", report.n);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![Cell::new("Metric"), Cell::new("Value")]);
    table.add_row(vec![
        Cell::new("Brier score"),
        Cell::new(format!("{:.4}", report.brier_score)),
    ]);
    table.add_row(vec![
        Cell::new("Log loss"),
        Cell::new(format!("{:.4}", report.log_loss)),
    ]);
    table.add_row(vec![
        Cell::new(format!("Accuracy ({} non-tie games)", report.accuracy_n)),
        Cell::new(format!("{:.1}%", report.accuracy * 100.0)),
    ]);
    println!("{table}");

    println!();
    println!("Calibration by probability bin");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Bin"),
        Cell::new("N"),
        Cell::new("Predicted"),
        Cell::new("Observed"),
        Cell::new("Error"),
    ]);
    for bin in report.bins.iter().filter(|b| b.count > 0) {
        table.add_row(vec![
            Cell::new(format!("{:.2}-{:.2}", bin.lower, bin.upper)),
            Cell::new(bin.count),
            Cell::new(format!("{:.1}%", bin.mean_predicted * 100.0)),
            Cell::new(format!("{:.1}%", bin.mean_observed * 100.0)),
            Cell::new(format!("{:.1}%", bin.abs_error * 100.0)),
        ]);
    }
    println!("{table}");
    println!();
}
