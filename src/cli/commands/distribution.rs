//! Distribution command argument structures

use clap::Args;

use crate::cli::parse::{parse_assignee, parse_grader_load, parse_part_id};
use tadist_core::model::{Assignee, GraderLoad, PartId};

/// Arguments for the init command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Course name recorded in the new config
    #[arg(long)]
    pub course: Option<String>,
}

/// Arguments for the distribute command.
#[derive(Args, Debug)]
pub struct DistributeArgs {
    /// Assignment id
    pub assignment: String,

    /// Active TA as `login` or `login:offset`, repeatable.
    /// Defaults to the configured default graders.
    #[arg(long, value_parser = parse_grader_load, action = clap::ArgAction::Append)]
    pub ta: Vec<GraderLoad>,

    /// Seed for the shuffles, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overwrite an existing distribution without asking
    #[arg(long, short)]
    pub yes: bool,

    /// Commit even if some groups could not be placed
    #[arg(long)]
    pub accept_partial: bool,
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Assignment id
    pub assignment: String,

    /// Only this part
    #[arg(long)]
    pub part: Option<String>,
}

/// Arguments for the move command.
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Part as `<assignment>.<part>`
    #[arg(value_parser = parse_part_id)]
    pub part: PartId,

    /// Group name (or numeric id)
    pub group: String,

    /// Current TA login, or `unassigned`
    #[arg(long, value_parser = parse_assignee)]
    pub from: Assignee,

    /// New TA login, or `unassigned`
    #[arg(long, value_parser = parse_assignee)]
    pub to: Assignee,

    /// Move even if the new TA blacklisted a group member
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the move-random command.
#[derive(Args, Debug)]
pub struct MoveRandomArgs {
    /// Part as `<assignment>.<part>`
    #[arg(value_parser = parse_part_id)]
    pub part: PartId,

    /// Number of groups to move
    pub count: usize,

    /// Current TA login, or `unassigned`
    #[arg(long, value_parser = parse_assignee)]
    pub from: Assignee,

    /// New TA login, or `unassigned`
    #[arg(long, value_parser = parse_assignee)]
    pub to: Assignee,

    /// Seed for choosing groups
    #[arg(long)]
    pub seed: Option<u64>,
}
