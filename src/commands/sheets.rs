//! `tadist sheets` - grading sheet generation and drift checks

use std::collections::BTreeMap;

use serde::Serialize;
use tadist_core::distribute::{DistributionStore, GradingArtifacts};
use tadist_core::error::Result;
use tadist_core::model::{GraderId, Group, PartId};
use tadist_core::sheets::{Drift, DriftKind};
use tadist_core::store::Store;

use crate::cli::Cli;
use crate::commands::format::print_json;
use crate::output_by_format_result;

#[derive(Debug, Serialize)]
struct GeneratedPart {
    part: PartId,
    written: usize,
    groups: usize,
}

#[derive(Debug, Serialize)]
struct CheckedPart {
    part: PartId,
    drift: Vec<Drift>,
    repaired: usize,
}

/// Distributable parts of an assignment, with the assignment's groups
fn parts_and_groups(store: &Store, assignment: &str) -> Result<(Vec<PartId>, Vec<Group>)> {
    let config = store.config().assignment(assignment)?;
    let parts = config
        .distributable_parts()
        .map(|p| config.part_id(p))
        .collect();
    Ok((parts, store.groups(assignment)?))
}

pub fn generate(cli: &Cli, store: &Store, assignment: &str, leniency: Option<u32>) -> Result<()> {
    let leniency = match leniency {
        Some(minutes) => minutes,
        None => store
            .config()
            .leniency_for(store.config().assignment(assignment)?),
    };
    let (parts, groups) = parts_and_groups(store, assignment)?;

    let mut results = Vec::with_capacity(parts.len());
    for part in parts {
        let records = store.db().distribution(&part)?;
        let mut by_grader: BTreeMap<GraderId, Vec<Group>> = BTreeMap::new();
        for group in &groups {
            if let Some(grader) = records.get(&group.id) {
                by_grader.entry(grader.clone()).or_default().push(group.clone());
            }
        }

        let mut progress = |done: usize, total: usize| {
            tracing::debug!(done, total, "grading sheets");
        };
        let written =
            store
                .sheets()
                .distribute_artifacts(&part, &by_grader, leniency, Some(&mut progress))?;

        results.push(GeneratedPart {
            part,
            written,
            groups: records.len(),
        });
    }

    output_by_format_result!(cli.format,
        json => print_json(&results),
        human => {
            if !cli.quiet {
                for result in &results {
                    if result.groups == 0 {
                        println!("{}: not distributed, no sheets written", result.part);
                    } else {
                        println!(
                            "{}: {} sheet(s) written for {} group(s)",
                            result.part, result.written, result.groups
                        );
                    }
                }
                println!("Sheets are under {}", store.sheets().root().display());
            }
        }
    )
}

pub fn check(cli: &Cli, store: &Store, assignment: &str, fix: bool) -> Result<()> {
    let (parts, groups) = parts_and_groups(store, assignment)?;

    let mut results = Vec::with_capacity(parts.len());
    for part in parts {
        let records = store.db().distribution(&part)?;
        let drift = store.sheets().check(&part, &records, &groups)?;
        let repaired = if fix {
            store.sheets().repair(&part, &drift, &groups)?
        } else {
            0
        };

        results.push(CheckedPart {
            part,
            drift,
            repaired,
        });
    }

    output_by_format_result!(cli.format,
        json => print_json(&results),
        human => {
            let mut total = 0;
            for result in &results {
                for drift in &result.drift {
                    total += 1;
                    println!("{}: {}", result.part, describe(drift, &groups));
                }
                if result.repaired > 0 {
                    println!("{}: rebound {} sheet(s)", result.part, result.repaired);
                }
            }
            if total == 0 && !cli.quiet {
                println!("Grading sheets match the distribution");
            }
        }
    )
}

fn describe(drift: &Drift, groups: &[Group]) -> String {
    let name = groups
        .iter()
        .find(|g| g.id == drift.group)
        .map(|g| g.name.clone())
        .unwrap_or_else(|| format!("group {}", drift.group));

    let show = |grader: &Option<GraderId>| {
        grader
            .as_ref()
            .map(|g| g.to_string())
            .unwrap_or_else(|| "unassigned".to_string())
    };

    match &drift.kind {
        DriftKind::Misbound { sheet, store } => format!(
            "{} sheet is with {} but the distribution says {}",
            name,
            show(sheet),
            show(store)
        ),
        DriftKind::Duplicate => match &drift.path {
            Some(path) => format!("{} has a duplicate sheet at {}", name, path.display()),
            None => format!("{} has a duplicate sheet", name),
        },
        DriftKind::UnknownGroup => format!("sheet for unknown {}", name),
        DriftKind::Missing { store } => format!("{} ({}) has no sheet", name, store),
    }
}
