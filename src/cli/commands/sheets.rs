//! Grading sheet argument structures

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct SheetsArgs {
    #[command(subcommand)]
    pub command: SheetsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SheetsCommands {
    /// Write grading sheets for the current distribution
    Generate {
        /// Assignment id
        assignment: String,

        /// Handin leniency in minutes (defaults to the configured value)
        #[arg(long)]
        leniency: Option<u32>,
    },

    /// Compare grading sheets with the distribution
    Check {
        /// Assignment id
        assignment: String,

        /// Rebind sheets to match the distribution
        #[arg(long)]
        fix: bool,
    },
}
