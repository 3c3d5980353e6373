//! `tadist distribute` - initial distribution of an assignment

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tadist_core::distribute::{DistributionOutcome, DistributionPlan};
use tadist_core::error::Result;
use tadist_core::model::{GraderLoad, StudentId};
use tadist_core::store::Store;

use crate::cli::commands::distribution::DistributeArgs;
use crate::cli::Cli;
use crate::commands::format::{join_names, print_json_status};
use crate::commands::prompt::PromptDecisions;
use crate::output_by_format_result;

/// Seeded when asked, otherwise from OS entropy
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn execute(cli: &Cli, store: &Store, args: &DistributeArgs) -> Result<()> {
    let graders: Vec<GraderLoad> = if args.ta.is_empty() {
        store
            .config()
            .default_graders()
            .into_iter()
            .map(|g| GraderLoad::new(g, 0))
            .collect()
    } else {
        args.ta.clone()
    };

    let mut rng = seeded_rng(args.seed);
    let mut decisions = PromptDecisions {
        yes: args.yes,
        accept_partial: args.accept_partial,
        ..PromptDecisions::new(cli)
    };

    let outcome = store.orchestrator().distribute(
        &args.assignment,
        &graders,
        &mut decisions,
        &mut rng,
    )?;

    let (status, plan) = match &outcome {
        DistributionOutcome::Committed(plan) => ("committed", Some(plan)),
        DistributionOutcome::Discarded(plan) => ("discarded", Some(plan)),
        DistributionOutcome::Cancelled => ("cancelled", None),
    };

    output_by_format_result!(cli.format,
        json => print_json_status(status, None, &[
            ("assignment", json!(args.assignment)),
            ("parts", json!(plan.map(|p| &p.parts))),
        ]),
        human => {
            if let Some(plan) = plan {
                print_plan(plan);
            }
            if !cli.quiet {
                match &outcome {
                    DistributionOutcome::Committed(plan) => println!(
                        "Committed distribution for {} ({} undistributed)",
                        args.assignment,
                        plan.undistributed_count()
                    ),
                    DistributionOutcome::Discarded(plan) => println!(
                        "Discarded distribution for {}: {} group(s) could not be placed \
                         (use --accept-partial to keep the rest)",
                        args.assignment,
                        plan.undistributed_count()
                    ),
                    DistributionOutcome::Cancelled => println!(
                        "Cancelled: {} already has a distribution (use --yes to overwrite)",
                        args.assignment
                    ),
                }
            }
        }
    )
}

fn print_plan(plan: &DistributionPlan) {
    for part in &plan.parts {
        println!("{}", part.part);
        for (grader, groups) in &part.response.distribution {
            println!(
                "  {:<16} {:>3}  {}",
                grader.as_str(),
                groups.len(),
                join_names(groups.iter().map(|g| g.name.as_str()))
            );
        }
        for group in &part.response.undistributed {
            println!(
                "  undistributed    {} [{}]",
                group.name,
                join_names(group.members.iter().map(StudentId::as_str))
            );
        }
    }
}
