//! Main CLI commands enum

use clap::Subcommand;

pub mod distribution;
pub mod roster;
pub mod sheets;

use distribution::*;
use roster::*;
use sheets::SheetsArgs;

/// Top-level tadist commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new tadist store
    Init(InitArgs),

    /// List the configured TAs
    Tas,

    /// Manage students
    Student(StudentArgs),

    /// Manage groups
    Group(GroupArgs),

    /// Manage TA blacklists
    Blacklist(BlacklistArgs),

    /// Distribute an assignment's groups among TAs
    Distribute(DistributeArgs),

    /// Show the current distribution of an assignment
    Show(ShowArgs),

    /// Move one group between TAs
    Move(MoveArgs),

    /// Move N randomly chosen groups between TAs
    MoveRandom(MoveRandomArgs),

    /// Generate and check grading sheets
    Sheets(SheetsArgs),
}
