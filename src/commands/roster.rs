//! Roster administration: TAs, students, groups and blacklists

use serde_json::json;
use tadist_core::error::Result;
use tadist_core::model::{GraderId, StudentId};
use tadist_core::store::Store;

use crate::cli::Cli;
use crate::commands::format::{join_names, print_json, print_json_status};
use crate::output_by_format_result;

pub fn list_tas(cli: &Cli, store: &Store) -> Result<()> {
    let tas = &store.config().tas;

    output_by_format_result!(cli.format,
        json => print_json(tas),
        human => {
            if tas.is_empty() && !cli.quiet {
                println!("No TAs configured in {}", store.config_path().display());
            }
            for ta in tas {
                let name = ta.name.as_deref().unwrap_or("");
                let marker = if ta.default_grader { "" } else { " (not a default grader)" };
                println!("{:<16} {}{}", ta.login, name, marker);
            }
        }
    )
}

pub fn add_student(cli: &Cli, store: &Store, login: &str, name: &str) -> Result<()> {
    let student = store.db().add_student(&StudentId::new(login), name)?;

    output_by_format_result!(cli.format,
        json => print_json(&student),
        human => {
            if !cli.quiet {
                println!("Added student {}", student.login);
            }
        }
    )
}

pub fn list_students(cli: &Cli, store: &Store) -> Result<()> {
    let students = store.db().list_students()?;

    output_by_format_result!(cli.format,
        json => print_json(&students),
        human => {
            for student in &students {
                let marker = if student.enabled { "" } else { " (disabled)" };
                println!("{:<16} {}{}", student.login, student.name, marker);
            }
        }
    )
}

pub fn set_student_enabled(cli: &Cli, store: &Store, login: &str, enabled: bool) -> Result<()> {
    let login = StudentId::new(login);
    store.db().set_student_enabled(&login, enabled)?;

    let state = if enabled { "enabled" } else { "disabled" };
    output_by_format_result!(cli.format,
        json => print_json_status("ok", None, &[
            ("student", json!(login)),
            ("enabled", json!(enabled)),
        ]),
        human => {
            if !cli.quiet {
                println!("Student {} {}", login, state);
            }
        }
    )
}

pub fn add_group(
    cli: &Cli,
    store: &Store,
    assignment: &str,
    name: &str,
    members: &[String],
) -> Result<()> {
    store.config().assignment(assignment)?;
    let members: Vec<StudentId> = members.iter().map(StudentId::new).collect();
    let group = store.db().add_group(assignment, name, &members)?;

    output_by_format_result!(cli.format,
        json => print_json(&group),
        human => {
            if !cli.quiet {
                println!("Added group {} ({}) to {}", group.name, group.id, assignment);
            }
        }
    )
}

pub fn list_groups(cli: &Cli, store: &Store, assignment: &str) -> Result<()> {
    let groups = store.groups(assignment)?;

    output_by_format_result!(cli.format,
        json => print_json(&groups),
        human => {
            for group in &groups {
                println!(
                    "{:>5}  {:<20} {}",
                    group.id.0,
                    group.name,
                    join_names(group.members.iter().map(StudentId::as_str))
                );
            }
        }
    )
}

pub fn add_blacklist(cli: &Cli, store: &Store, ta: &str, student: &str) -> Result<()> {
    let ta = GraderId::new(ta);
    store.config().require_ta(&ta)?;
    let student = StudentId::new(student);
    let added = store.db().add_blacklist(&ta, &student)?;

    output_by_format_result!(cli.format,
        json => print_json_status(if added { "added" } else { "unchanged" }, None, &[
            ("ta", json!(ta)),
            ("student", json!(student)),
        ]),
        human => {
            if !cli.quiet {
                if added {
                    println!("{} will not grade {}", ta, student);
                } else {
                    println!("{} already blacklisted {}", ta, student);
                }
            }
        }
    )
}

pub fn remove_blacklist(cli: &Cli, store: &Store, ta: &str, student: &str) -> Result<()> {
    let ta = GraderId::new(ta);
    let student = StudentId::new(student);
    store.db().remove_blacklist(&ta, &student)?;

    output_by_format_result!(cli.format,
        json => print_json_status("removed", None, &[
            ("ta", json!(ta)),
            ("student", json!(student)),
        ]),
        human => {
            if !cli.quiet {
                println!("Removed blacklist entry {} -> {}", ta, student);
            }
        }
    )
}

pub fn list_blacklist(cli: &Cli, store: &Store, ta: Option<&str>) -> Result<()> {
    let entries: Vec<_> = store
        .db()
        .list_blacklist()?
        .into_iter()
        .filter(|(grader, _)| ta.map_or(true, |t| grader.as_str() == t))
        .collect();

    output_by_format_result!(cli.format,
        json => print_json(&entries
            .iter()
            .map(|(ta, student)| json!({ "ta": ta, "student": student }))
            .collect::<Vec<_>>()),
        human => {
            for (ta, student) in &entries {
                println!("{:<16} {}", ta, student);
            }
        }
    )
}
