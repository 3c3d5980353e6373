//! Grading distribution
//!
//! The [`balancer`] partitions groups among graders, the [`orchestrator`]
//! turns balancer output into a committed distribution, and [`reassign`]
//! moves groups between graders afterwards. All three talk to storage and
//! grading sheets through the traits defined here.

pub mod balancer;
pub mod orchestrator;
pub mod reassign;

use std::collections::{BTreeMap, HashSet};

use crate::error::{Result, TadistError};
use crate::model::{Assignee, GraderId, Group, GroupId, PartId, StudentId};

pub use balancer::balance;
pub use orchestrator::{DistributionOutcome, DistributionPlan, Orchestrator, PartPlan};
pub use reassign::{MoveReport, Reassigner};

/// Percent-complete style callback: `(done, total)`
pub type Progress<'a> = Option<&'a mut dyn FnMut(usize, usize)>;

/// Which groups exist and who is in them
pub trait Roster {
    /// Every distributable group for a part's assignment, ordered by name
    fn groups_for_part(&self, part: &PartId) -> Result<Vec<Group>>;

    fn groups_assigned_to(&self, part: &PartId, grader: &GraderId) -> Result<Vec<Group>>;

    /// Used when an assignment has no explicit grouping
    fn create_singleton_group(&self, assignment: &str, student: &StudentId) -> Result<Group>;

    fn group(&self, id: GroupId) -> Result<Group>;
}

/// Grader-specific exclusion lists
pub trait Blacklists {
    fn blacklist(&self, grader: &GraderId) -> Result<HashSet<StudentId>>;
}

/// One group changing hands within a part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMove {
    pub group: GroupId,
    pub from: Assignee,
    pub to: Assignee,
}

/// Durable (part, group) -> grader records
pub trait DistributionStore {
    /// Add a record; fails if the group is already assigned to someone else
    fn assign(&self, part: &PartId, group: GroupId, grader: &GraderId) -> Result<()>;

    /// Remove a record; fails if the group is not assigned to `grader`
    fn unassign(&self, part: &PartId, group: GroupId, grader: &GraderId) -> Result<()>;

    /// True if no group has a grader for this part
    fn is_empty(&self, part: &PartId) -> Result<bool>;

    fn assigned_groups(&self, part: &PartId, grader: &GraderId) -> Result<Vec<Group>>;

    fn assignee(&self, part: &PartId, group: GroupId) -> Result<Assignee>;

    /// Every record for a part
    fn distribution(&self, part: &PartId) -> Result<BTreeMap<GroupId, GraderId>>;

    /// Replace the records of every listed part in a single transaction
    fn replace_distributions(&self, batch: &[(PartId, Vec<(GroupId, GraderId)>)]) -> Result<()>;

    /// Apply moves in a single transaction, checking each `from` state first
    fn move_groups(&self, part: &PartId, moves: &[GroupMove]) -> Result<()>;
}

/// Generated per-group grading sheets
pub trait GradingArtifacts {
    fn has_artifact(&self, part: &PartId, group: &Group) -> Result<bool>;

    /// Rebind an existing sheet to a new grader (`None` for unassigned)
    fn reassign_artifact(&self, part: &PartId, group: &Group, grader: Option<&GraderId>)
        -> Result<()>;

    /// Generate sheets for a distribution; returns how many were written
    fn distribute_artifacts(
        &self,
        part: &PartId,
        distribution: &BTreeMap<GraderId, Vec<Group>>,
        leniency_minutes: u32,
        progress: Progress<'_>,
    ) -> Result<usize>;
}

/// Answers to the questions a distribution run asks its operator
pub trait Decisions {
    /// A distribution already exists for these parts; overwrite it?
    fn confirm_overwrite(&mut self, assignment: &str, parts: &[PartId]) -> bool;

    /// Checking for an existing distribution failed; proceed anyway?
    fn proceed_after_lookup_failure(&mut self, error: &TadistError) -> bool;

    /// Some groups could not be placed; commit the rest?
    fn accept_partial(&mut self, plan: &DistributionPlan) -> bool;

    /// Assign a group to a grader who blacklisted some of its members?
    fn override_blacklist(&mut self, group: &Group, grader: &GraderId, students: &[StudentId])
        -> bool;
}

#[cfg(test)]
pub(crate) mod testing;
