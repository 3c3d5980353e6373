//! Builds and commits the initial distribution for an assignment
//!
//! Protocol: validate graders, confirm overwriting an existing distribution,
//! balance every distributable part, let the operator accept or discard a
//! partial result, then write all parts in one transaction.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use super::{balance, Blacklists, Decisions, DistributionStore, Roster};
use crate::config::CourseConfig;
use crate::error::{Result, TadistError};
use crate::model::{DistributionResponse, GraderId, GraderLoad, GroupId, PartId, StudentId};
use crate::trace_time;

/// Balancer output for one part
#[derive(Debug, Clone, Serialize)]
pub struct PartPlan {
    pub part: PartId,
    pub graders: Vec<GraderLoad>,
    #[serde(flatten)]
    pub response: DistributionResponse,
}

/// Balancer output for every distributable part of an assignment
#[derive(Debug, Clone, Serialize)]
pub struct DistributionPlan {
    pub assignment: String,
    pub parts: Vec<PartPlan>,
}

impl DistributionPlan {
    pub fn undistributed_count(&self) -> usize {
        self.parts.iter().map(|p| p.response.undistributed.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.undistributed_count() == 0
    }

    fn batch(&self) -> Vec<(PartId, Vec<(GroupId, GraderId)>)> {
        self.parts
            .iter()
            .map(|p| (p.part.clone(), p.response.records()))
            .collect()
    }
}

/// How a distribution run ended
#[derive(Debug)]
pub enum DistributionOutcome {
    /// Written to the store
    Committed(DistributionPlan),
    /// Partial result rejected; nothing written
    Discarded(DistributionPlan),
    /// Operator declined to overwrite; nothing computed or written
    Cancelled,
}

pub struct Orchestrator<'a> {
    config: &'a CourseConfig,
    roster: &'a dyn Roster,
    blacklists: &'a dyn Blacklists,
    store: &'a dyn DistributionStore,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a CourseConfig,
        roster: &'a dyn Roster,
        blacklists: &'a dyn Blacklists,
        store: &'a dyn DistributionStore,
    ) -> Self {
        Self {
            config,
            roster,
            blacklists,
            store,
        }
    }

    /// Run the whole protocol for one assignment
    #[tracing::instrument(skip(self, graders, decisions, rng), fields(graders = graders.len()))]
    pub fn distribute<R: Rng + ?Sized>(
        &self,
        assignment: &str,
        graders: &[GraderLoad],
        decisions: &mut dyn Decisions,
        rng: &mut R,
    ) -> Result<DistributionOutcome> {
        let start = Instant::now();
        let eligible = self.eligible_graders(assignment, graders)?;
        let parts: Vec<PartId> = eligible.iter().map(|(p, _)| p.clone()).collect();

        let mut existing = Vec::new();
        for part in &parts {
            match self.store.is_empty(part) {
                Ok(true) => {}
                Ok(false) => existing.push(part.clone()),
                Err(e) => {
                    tracing::warn!(part = %part, error = %e, "existing distribution lookup failed");
                    if !decisions.proceed_after_lookup_failure(&e) {
                        return Ok(DistributionOutcome::Cancelled);
                    }
                }
            }
        }

        if !existing.is_empty() && !decisions.confirm_overwrite(assignment, &existing) {
            tracing::info!(assignment, "overwrite declined");
            return Ok(DistributionOutcome::Cancelled);
        }

        let plan = self.balance_parts(assignment, eligible, rng)?;
        trace_time!(start, "balance_parts");

        if !plan.is_complete() && !decisions.accept_partial(&plan) {
            tracing::info!(
                assignment,
                undistributed = plan.undistributed_count(),
                "partial distribution discarded"
            );
            return Ok(DistributionOutcome::Discarded(plan));
        }

        self.commit(&plan)?;
        Ok(DistributionOutcome::Committed(plan))
    }

    /// Validate graders and compute a plan without touching the store
    pub fn plan<R: Rng + ?Sized>(
        &self,
        assignment: &str,
        graders: &[GraderLoad],
        rng: &mut R,
    ) -> Result<DistributionPlan> {
        let eligible = self.eligible_graders(assignment, graders)?;
        self.balance_parts(assignment, eligible, rng)
    }

    /// Write every part of a plan atomically
    pub fn commit(&self, plan: &DistributionPlan) -> Result<()> {
        self.store.replace_distributions(&plan.batch())?;
        tracing::info!(
            assignment = %plan.assignment,
            parts = plan.parts.len(),
            "distribution committed"
        );
        Ok(())
    }

    /// Active graders per distributable part, after configuration checks
    fn eligible_graders(
        &self,
        assignment: &str,
        graders: &[GraderLoad],
    ) -> Result<Vec<(PartId, Vec<GraderLoad>)>> {
        let config = self.config.assignment(assignment)?;

        if graders.is_empty() {
            return Err(TadistError::NoActiveGraders);
        }
        for load in graders {
            self.config.require_ta(&load.grader)?;
        }

        let mut eligible = Vec::new();
        for part in config.distributable_parts() {
            let loads: Vec<GraderLoad> = graders
                .iter()
                .filter(|l| part.allows(&l.grader))
                .cloned()
                .collect();

            let part_id = config.part_id(part);
            if loads.is_empty() {
                return Err(TadistError::PartWithoutGraders {
                    part: part_id.to_string(),
                });
            }
            eligible.push((part_id, loads));
        }

        if eligible.is_empty() {
            return Err(TadistError::invalid_config(format!(
                "assignment {} has no distributable parts",
                assignment
            )));
        }

        Ok(eligible)
    }

    fn balance_parts<R: Rng + ?Sized>(
        &self,
        assignment: &str,
        eligible: Vec<(PartId, Vec<GraderLoad>)>,
        rng: &mut R,
    ) -> Result<DistributionPlan> {
        let mut blacklists: HashMap<GraderId, HashSet<StudentId>> = HashMap::new();
        let mut parts = Vec::with_capacity(eligible.len());

        for (part, graders) in eligible {
            for load in &graders {
                if !blacklists.contains_key(&load.grader) {
                    let list = self.blacklists.blacklist(&load.grader)?;
                    blacklists.insert(load.grader.clone(), list);
                }
            }

            let groups = self.roster.groups_for_part(&part)?;
            let response = balance(&graders, &groups, &blacklists, rng)?;
            tracing::debug!(
                part = %part,
                groups = groups.len(),
                undistributed = response.undistributed.len(),
                "balanced part"
            );

            parts.push(PartPlan {
                part,
                graders,
                response,
            });
        }

        Ok(DistributionPlan {
            assignment: assignment.to_string(),
            parts,
        })
    }
}
