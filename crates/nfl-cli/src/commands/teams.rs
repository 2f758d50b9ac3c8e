//! Teams command implementation.

use comfy_table::{presets::UTF8_FULL, Cell, Table};

use nfl_core::{League, Team};

use crate::cli::{OutputFormat, TeamsArgs, TeamSortField};
use crate::error::Result;
use crate::output::Output;

pub fn run_teams(args: &TeamsArgs, league: &League, format: OutputFormat) -> Result<()> {
    let output = Output::new(format);

    let mut teams: Vec<&Team> = league
        .teams
        .iter()
        .filter(|t| match &args.conference {
            Some(conf) => t.conference.to_string().eq_ignore_ascii_case(conf),
            None => true,
        })
        .collect();

    match args.sort {
        TeamSortField::Name => teams.sort_by(|a, b| a.name.cmp(&b.name)),
        TeamSortField::Code => teams.sort_by(|a, b| a.code.cmp(&b.code)),
        TeamSortField::Division => {
            teams.sort_by(|a, b| {
                a.division
                    .to_string()
                    .cmp(&b.division.to_string())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
    }

    if output.is_json() {
        output.print_json(&teams);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Team"),
        Cell::new("Code"),
        Cell::new("Conference"),
        Cell::new("Division"),
    ]);
    for team in teams {
        table.add_row(vec![
            Cell::new(&team.name),
            Cell::new(&team.code),
            Cell::new(team.conference.to_string()),
            Cell::new(team.division.to_string()),
        ]);
    }
    println!("{table}");

    Ok(())
}
