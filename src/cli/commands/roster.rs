//! Roster administration argument structures

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct StudentArgs {
    #[command(subcommand)]
    pub command: StudentCommands,
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    /// Register a student
    Add {
        /// Student login
        login: String,

        /// Display name
        #[arg(long, default_value = "")]
        name: String,
    },

    /// List students
    List,

    /// Exclude a student from new singleton groups
    Disable {
        /// Student login
        login: String,
    },

    /// Re-enable a disabled student
    Enable {
        /// Student login
        login: String,
    },
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Create a group for an assignment
    Add {
        /// Assignment id
        assignment: String,

        /// Group name
        name: String,

        /// Member logins
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// List groups for an assignment
    List {
        /// Assignment id
        assignment: String,
    },
}

#[derive(Args, Debug)]
pub struct BlacklistArgs {
    #[command(subcommand)]
    pub command: BlacklistCommands,
}

#[derive(Subcommand, Debug)]
pub enum BlacklistCommands {
    /// Stop a TA from grading a student
    Add {
        /// TA login
        ta: String,

        /// Student login
        student: String,
    },

    /// Remove a blacklist entry
    Remove {
        /// TA login
        ta: String,

        /// Student login
        student: String,
    },

    /// List blacklist entries
    List {
        /// Only this TA
        #[arg(long)]
        ta: Option<String>,
    },
}
