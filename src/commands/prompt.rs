//! Operator confirmations
//!
//! Flags answer up front. Anything left unanswered is asked interactively
//! when stdin is a terminal and the output is human-readable; otherwise the
//! cautious answer is taken.

use std::io::{self, IsTerminal};

use inquire::Confirm;
use tadist_core::distribute::{Decisions, DistributionPlan};
use tadist_core::error::TadistError;
use tadist_core::model::{GraderId, Group, PartId, StudentId};

use crate::cli::{Cli, OutputFormat};
use crate::commands::format::join_names;

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptDecisions {
    pub yes: bool,
    pub accept_partial: bool,
    pub force: bool,
    pub interactive: bool,
}

impl PromptDecisions {
    pub fn new(cli: &Cli) -> Self {
        Self {
            interactive: cli.format == OutputFormat::Human && io::stdin().is_terminal(),
            ..Self::default()
        }
    }

    fn ask(&self, question: &str) -> bool {
        if !self.interactive {
            return false;
        }
        // Escape and ctrl-c count as "no"
        Confirm::new(question)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

impl Decisions for PromptDecisions {
    fn confirm_overwrite(&mut self, assignment: &str, parts: &[PartId]) -> bool {
        if self.yes {
            return true;
        }
        let parts = join_names(parts.iter().map(PartId::as_str));
        let asked = self.ask(&format!(
            "{} already has a distribution for {}. Overwrite it?",
            assignment, parts
        ));
        if !asked && !self.interactive {
            tracing::warn!(assignment, "existing distribution kept; pass --yes to overwrite");
        }
        asked
    }

    fn proceed_after_lookup_failure(&mut self, error: &TadistError) -> bool {
        if self.yes {
            return true;
        }
        self.ask(&format!(
            "Could not check for an existing distribution ({}). Continue anyway?",
            error
        ))
    }

    fn accept_partial(&mut self, plan: &DistributionPlan) -> bool {
        if self.accept_partial {
            return true;
        }
        if self.interactive {
            for part in &plan.parts {
                for group in &part.response.undistributed {
                    eprintln!("  {}: could not place {}", part.part, group);
                }
            }
        }
        self.ask(&format!(
            "{} group(s) could not be distributed. Use the partial distribution?",
            plan.undistributed_count()
        ))
    }

    fn override_blacklist(
        &mut self,
        group: &Group,
        grader: &GraderId,
        students: &[StudentId],
    ) -> bool {
        if self.force {
            return true;
        }
        self.ask(&format!(
            "{} blacklisted {} in group {}. Assign anyway?",
            grader,
            join_names(students.iter().map(StudentId::as_str)),
            group
        ))
    }
}
