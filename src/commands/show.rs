//! `tadist show` - current distribution of an assignment

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tadist_core::distribute::{Blacklists, DistributionStore};
use tadist_core::error::Result;
use tadist_core::model::{GraderId, Group, PartId, StudentId};
use tadist_core::store::Store;

use crate::cli::Cli;
use crate::commands::format::{join_names, print_json};
use crate::output_by_format_result;

#[derive(Debug, Serialize)]
struct PartView {
    part: PartId,
    graders: BTreeMap<GraderId, Vec<GroupView>>,
    unassigned: Vec<Group>,
}

#[derive(Debug, Serialize)]
struct GroupView {
    #[serde(flatten)]
    group: Group,
    /// Members the grader blacklisted after the group was assigned
    #[serde(skip_serializing_if = "Vec::is_empty")]
    conflicts: Vec<StudentId>,
}

pub fn execute(cli: &Cli, store: &Store, assignment: &str, part: Option<&str>) -> Result<()> {
    let config = store.config().assignment(assignment)?;
    let parts: Vec<PartId> = match part {
        Some(part) => {
            let id = PartId::new(assignment, part);
            store.config().part(&id)?;
            vec![id]
        }
        None => config
            .distributable_parts()
            .map(|p| config.part_id(p))
            .collect(),
    };

    let groups = store.groups(assignment)?;
    let mut blacklists = HashMap::new();
    let mut views = Vec::with_capacity(parts.len());

    for part in parts {
        let records = store.db().distribution(&part)?;
        let mut graders: BTreeMap<GraderId, Vec<GroupView>> = BTreeMap::new();
        let mut unassigned = Vec::new();

        for group in &groups {
            let Some(grader) = records.get(&group.id) else {
                unassigned.push(group.clone());
                continue;
            };

            if !blacklists.contains_key(grader) {
                blacklists.insert(grader.clone(), store.db().blacklist(grader)?);
            }
            let conflicts = blacklists
                .get(grader)
                .map(|b| group.blacklisted_members(b))
                .unwrap_or_default();

            graders.entry(grader.clone()).or_default().push(GroupView {
                group: group.clone(),
                conflicts,
            });
        }

        views.push(PartView {
            part,
            graders,
            unassigned,
        });
    }

    output_by_format_result!(cli.format,
        json => print_json(&views),
        human => {
            for view in &views {
                print_part(view);
            }
        }
    )
}

fn print_part(view: &PartView) {
    println!("{}", view.part);
    if view.graders.is_empty() {
        println!("  (not distributed)");
    }

    for (grader, groups) in &view.graders {
        println!("  {} ({})", grader, groups.len());
        for entry in groups {
            if entry.conflicts.is_empty() {
                println!("    {}", entry.group.name);
            } else {
                println!(
                    "    {}  ! blacklisted: {}",
                    entry.group.name,
                    join_names(entry.conflicts.iter().map(StudentId::as_str))
                );
            }
        }
    }

    if !view.unassigned.is_empty() {
        println!(
            "  unassigned ({}): {}",
            view.unassigned.len(),
            join_names(view.unassigned.iter().map(|g| g.name.as_str()))
        );
    }
}
