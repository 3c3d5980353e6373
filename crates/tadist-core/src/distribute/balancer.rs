//! Load-balanced, blacklist-aware partitioning of groups among graders
//!
//! Greedy and randomized: constrained groups (some member blacklisted by
//! some active grader) are placed first while capacity is still available,
//! then free groups fill each grader up to their target. Shuffles come from
//! the caller's random source so seeded runs are reproducible.

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TadistError};
use crate::model::{DistributionResponse, GraderId, GraderLoad, Group, StudentId};

struct Slot<'a> {
    grader: &'a GraderId,
    blacklist: &'a HashSet<StudentId>,
    remaining: usize,
    assigned: Vec<Group>,
}

/// Partition `groups` among `graders`.
///
/// Each grader's target is `floor(groups / graders) + offset`, clamped at
/// zero. Groups that no grader with spare capacity can take without a
/// blacklist conflict are returned as undistributed, never force-assigned.
pub fn balance<R: Rng + ?Sized>(
    graders: &[GraderLoad],
    groups: &[Group],
    blacklists: &HashMap<GraderId, HashSet<StudentId>>,
    rng: &mut R,
) -> Result<DistributionResponse> {
    if graders.is_empty() {
        return Err(TadistError::NoActiveGraders);
    }

    let mut loads: Vec<&GraderLoad> = graders.iter().collect();
    loads.sort_by(|a, b| a.grader.cmp(&b.grader));
    if let Some(dup) = loads.windows(2).find(|w| w[0].grader == w[1].grader) {
        return Err(TadistError::invalid_value("grader (listed twice)", &dup[0].grader));
    }

    let average = (groups.len() / loads.len()) as i64;
    let empty = HashSet::new();

    let mut slots: Vec<Slot> = loads
        .iter()
        .map(|load| Slot {
            grader: &load.grader,
            blacklist: blacklists.get(&load.grader).unwrap_or(&empty),
            remaining: target(average, load.offset),
            assigned: Vec::new(),
        })
        .collect();

    let (mut constrained, free): (Vec<&Group>, Vec<&Group>) = groups
        .iter()
        .partition(|group| slots.iter().any(|s| group.is_blacklisted_by(s.blacklist)));

    tracing::debug!(
        graders = slots.len(),
        groups = groups.len(),
        average,
        constrained = constrained.len(),
        "balancing"
    );

    let mut order: Vec<usize> = (0..slots.len()).collect();
    let mut undistributed = Vec::new();

    order.shuffle(rng);
    constrained.shuffle(rng);
    for group in constrained {
        let slot = order
            .iter()
            .copied()
            .find(|&i| slots[i].remaining > 0 && !group.is_blacklisted_by(slots[i].blacklist));

        match slot {
            Some(i) => {
                slots[i].remaining -= 1;
                slots[i].assigned.push(group.clone());
            }
            None => undistributed.push(group.clone()),
        }
    }

    order.shuffle(rng);
    let mut free = free.into_iter().peekable();
    for &i in &order {
        while slots[i].remaining > 0 {
            let Some(group) = free.next() else { break };
            slots[i].remaining -= 1;
            slots[i].assigned.push(group.clone());
        }
    }

    // The floor leaves fewer leftovers than graders unless offsets are negative
    while free.peek().is_some() {
        order.shuffle(rng);
        for &i in &order {
            let Some(group) = free.next() else { break };
            slots[i].assigned.push(group.clone());
        }
    }

    let distribution: BTreeMap<GraderId, Vec<Group>> = slots
        .into_iter()
        .map(|s| (s.grader.clone(), s.assigned))
        .collect();

    if !undistributed.is_empty() {
        tracing::info!(count = undistributed.len(), "groups left undistributed");
    }

    Ok(DistributionResponse {
        distribution,
        undistributed,
    })
}

/// `average + offset`, saturating, clamped at zero
fn target(average: i64, offset: i64) -> usize {
    usize::try_from(average.saturating_add(offset).max(0)).unwrap_or(usize::MAX)
}
