//! `tadist move` and `tadist move-random`

use tadist_core::distribute::MoveReport;
use tadist_core::error::{Result, TadistError};
use tadist_core::model::{Group, GroupId, PartId};
use tadist_core::store::Store;

use crate::cli::commands::distribution::{MoveArgs, MoveRandomArgs};
use crate::cli::Cli;
use crate::commands::distribute::seeded_rng;
use crate::commands::format::print_json;
use crate::commands::prompt::PromptDecisions;
use crate::output_by_format_result;

/// Find a group of the part's assignment by name, falling back to its numeric id
fn resolve_group(store: &Store, part: &PartId, group: &str) -> Result<Group> {
    let assignment = part.assignment();
    if let Some(found) = store.db().find_group_by_name(assignment, group)? {
        return Ok(found);
    }

    match group.parse::<i64>() {
        Ok(id) => {
            let found = store.db().group(GroupId(id))?;
            if found.assignment == assignment {
                Ok(found)
            } else {
                Err(TadistError::not_found(&format!("group on {}", assignment), group))
            }
        }
        Err(_) => Err(TadistError::not_found(&format!("group on {}", assignment), group)),
    }
}

pub fn execute_move(cli: &Cli, store: &Store, args: &MoveArgs) -> Result<()> {
    store.config().part(&args.part)?;
    let group = resolve_group(store, &args.part, &args.group)?;

    let mut decisions = PromptDecisions {
        force: args.force,
        ..PromptDecisions::new(cli)
    };

    let report = store
        .reassigner()
        .move_group(&args.part, group.id, &args.from, &args.to, &mut decisions)?;

    output_by_format_result!(cli.format,
        json => print_json(&report),
        human => {
            if !cli.quiet {
                print_report(&args.part, &report);
            }
        }
    )
}

pub fn execute_move_random(cli: &Cli, store: &Store, args: &MoveRandomArgs) -> Result<()> {
    let mut rng = seeded_rng(args.seed);
    let mut progress = |done: usize, total: usize| {
        tracing::debug!(done, total, "sheets rebound");
    };

    let reports = store.reassigner().move_random(
        &args.part,
        args.count,
        &args.from,
        &args.to,
        &mut rng,
        Some(&mut progress),
    )?;

    output_by_format_result!(cli.format,
        json => print_json(&reports),
        human => {
            if !cli.quiet {
                for report in &reports {
                    print_report(&args.part, report);
                }
                println!("Moved {} group(s)", reports.len());
            }
        }
    )
}

fn print_report(part: &PartId, report: &MoveReport) {
    let mut notes = Vec::new();
    if report.overridden {
        notes.push("blacklist overridden");
    }
    if report.sheet_rebound {
        notes.push("sheet rebound");
    }

    let suffix = if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join(", "))
    };
    println!(
        "{}: {} {} -> {}{}",
        part, report.group.name, report.from, report.to, suffix
    );

    if let Some(error) = &report.sheet_error {
        eprintln!(
            "warning: grading sheet for {} was not rebound: {}",
            report.group.name, error
        );
        eprintln!(
            "  run `tadist sheets check {} --fix` to rebind it",
            part.assignment()
        );
    }
}
