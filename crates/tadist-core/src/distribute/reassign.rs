//! Moving groups between graders after the initial distribution
//!
//! Blacklists are re-read on every move, since they may have changed since
//! the distribution was made. Store writes happen in one transaction per
//! operation; grading sheets are rebound afterwards, and a sheet that fails
//! to follow is recorded on its [`MoveReport`] rather than failing the move.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::{
    Blacklists, Decisions, DistributionStore, GradingArtifacts, GroupMove, Progress, Roster,
};
use crate::bail_usage;
use crate::config::CourseConfig;
use crate::error::{Result, TadistError};
use crate::model::{Assignee, GraderId, Group, GroupId, PartId, StudentId};

/// What happened to one group
#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    pub group: Group,
    pub from: Assignee,
    pub to: Assignee,
    /// The operator accepted a blacklist conflict
    pub overridden: bool,
    /// An existing grading sheet was rebound
    pub sheet_rebound: bool,
    /// The store move is committed but the sheet could not follow it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_error: Option<String>,
}

pub struct Reassigner<'a> {
    config: &'a CourseConfig,
    roster: &'a dyn Roster,
    blacklists: &'a dyn Blacklists,
    store: &'a dyn DistributionStore,
    artifacts: &'a dyn GradingArtifacts,
}

impl<'a> Reassigner<'a> {
    pub fn new(
        config: &'a CourseConfig,
        roster: &'a dyn Roster,
        blacklists: &'a dyn Blacklists,
        store: &'a dyn DistributionStore,
        artifacts: &'a dyn GradingArtifacts,
    ) -> Self {
        Self {
            config,
            roster,
            blacklists,
            store,
            artifacts,
        }
    }

    /// Groups currently held by `from`, ordered by name
    pub fn pool(&self, part: &PartId, from: &Assignee) -> Result<Vec<Group>> {
        match from {
            Assignee::Grader(grader) => self.store.assigned_groups(part, grader),
            Assignee::Unassigned => {
                let assigned = self.store.distribution(part)?;
                Ok(self
                    .roster
                    .groups_for_part(part)?
                    .into_iter()
                    .filter(|g| !assigned.contains_key(&g.id))
                    .collect())
            }
        }
    }

    /// Move a single group, asking the operator before breaking a blacklist
    #[tracing::instrument(skip_all, fields(part = %part, group = %group, from = %from, to = %to))]
    pub fn move_group(
        &self,
        part: &PartId,
        group: GroupId,
        from: &Assignee,
        to: &Assignee,
        decisions: &mut dyn Decisions,
    ) -> Result<MoveReport> {
        self.check_endpoints(part, from, to)?;

        let group = self.roster.group(group)?;
        if group.assignment != part.assignment() {
            return Err(TadistError::not_found(
                &format!("group on {}", part.assignment()),
                &group.name,
            ));
        }

        let current = self.store.assignee(part, group.id)?;
        if &current != from {
            return Err(TadistError::StaleAssignment {
                part: part.to_string(),
                group: group.name.clone(),
                expected: describe(from),
                actual: current.to_string(),
            });
        }

        let mut overridden = false;
        if let Assignee::Grader(grader) = to {
            let students = group.blacklisted_members(&self.blacklists.blacklist(grader)?);
            if !students.is_empty() {
                if !decisions.override_blacklist(&group, grader, &students) {
                    return Err(blacklisted(&group, grader, &students));
                }
                tracing::warn!(group = %group, grader = %grader, "blacklist overridden");
                overridden = true;
            }
        }

        self.store.move_groups(
            part,
            &[GroupMove {
                group: group.id,
                from: from.clone(),
                to: to.clone(),
            }],
        )?;

        let (sheet_rebound, sheet_error) = self.rebind_sheet(part, &group, to);

        tracing::info!(group = %group, "group moved");
        Ok(MoveReport {
            group,
            from: from.clone(),
            to: to.clone(),
            overridden,
            sheet_rebound,
            sheet_error,
        })
    }

    /// Move `n` randomly chosen groups, or none at all.
    ///
    /// Groups blacklisted for a concrete `to` are never chosen; if fewer
    /// than `n` remain the whole operation is rejected.
    #[tracing::instrument(skip_all, fields(part = %part, n = n, from = %from, to = %to))]
    pub fn move_random<R: Rng + ?Sized>(
        &self,
        part: &PartId,
        n: usize,
        from: &Assignee,
        to: &Assignee,
        rng: &mut R,
        mut progress: Progress<'_>,
    ) -> Result<Vec<MoveReport>> {
        self.check_endpoints(part, from, to)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut pool = self.pool(part, from)?;
        pool.shuffle(rng);

        let blacklist: HashSet<StudentId> = match to {
            Assignee::Grader(grader) => self.blacklists.blacklist(grader)?,
            Assignee::Unassigned => HashSet::new(),
        };

        let movable: Vec<Group> = pool
            .into_iter()
            .filter(|g| !g.is_blacklisted_by(&blacklist))
            .collect();

        if movable.len() < n {
            return Err(TadistError::InsufficientMovable {
                requested: n,
                movable: movable.len(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let chosen: Vec<Group> = movable.into_iter().take(n).collect();
        let moves: Vec<GroupMove> = chosen
            .iter()
            .map(|g| GroupMove {
                group: g.id,
                from: from.clone(),
                to: to.clone(),
            })
            .collect();

        self.store.move_groups(part, &moves)?;

        let total = chosen.len();
        let mut reports = Vec::with_capacity(total);
        for (i, group) in chosen.into_iter().enumerate() {
            let (sheet_rebound, sheet_error) = self.rebind_sheet(part, &group, to);
            reports.push(MoveReport {
                group,
                from: from.clone(),
                to: to.clone(),
                overridden: false,
                sheet_rebound,
                sheet_error,
            });
            if let Some(cb) = progress.as_mut() {
                cb(i + 1, total);
            }
        }

        tracing::info!(moved = total, "random move complete");
        Ok(reports)
    }

    fn check_endpoints(&self, part: &PartId, from: &Assignee, to: &Assignee) -> Result<()> {
        if from == to {
            bail_usage!(format!("cannot move groups from {} to itself", from));
        }
        self.config.part(part)?;
        for grader in [from.grader(), to.grader()].into_iter().flatten() {
            self.config.require_ta(grader)?;
        }
        Ok(())
    }

    /// Runs after the store commit, so failures are reported, not returned
    fn rebind_sheet(
        &self,
        part: &PartId,
        group: &Group,
        to: &Assignee,
    ) -> (bool, Option<String>) {
        let result = self.artifacts.has_artifact(part, group).and_then(|has| {
            if has {
                self.artifacts
                    .reassign_artifact(part, group, to.grader())
                    .map(|()| true)
            } else {
                Ok(false)
            }
        });

        match result {
            Ok(rebound) => (rebound, None),
            Err(e) => {
                tracing::warn!(group = %group, error = %e, "grading sheet not rebound");
                (false, Some(e.to_string()))
            }
        }
    }
}

fn describe(assignee: &Assignee) -> String {
    match assignee {
        Assignee::Unassigned => "unassigned".to_string(),
        Assignee::Grader(g) => format!("assigned to {}", g),
    }
}

fn blacklisted(group: &Group, grader: &GraderId, students: &[StudentId]) -> TadistError {
    TadistError::Blacklisted {
        group: group.name.clone(),
        grader: grader.to_string(),
        students: students.iter().map(|s| s.to_string()).collect(),
    }
}
