//! Detecting and repairing drift between grading sheets and the store
//!
//! The distribution store is authoritative. Sheets can fall out of step
//! when they are moved by hand, when a redistribution happens after sheets
//! were generated, or when a rebind fails midway through a move.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;

use super::SheetStore;
use crate::error::Result;
use crate::model::{GraderId, Group, GroupId, PartId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriftKind {
    /// Sheet sits with a different grader than the store records
    Misbound {
        sheet: Option<GraderId>,
        store: Option<GraderId>,
    },
    /// More than one sheet for the same group
    Duplicate,
    /// Sheet for a group that is not on the roster
    UnknownGroup,
    /// Group has a grader but no sheet
    Missing { store: GraderId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drift {
    pub group: GroupId,
    #[serde(flatten)]
    pub kind: DriftKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Drift {
    /// Drift that `repair` can fix
    pub fn is_repairable(&self) -> bool {
        matches!(self.kind, DriftKind::Misbound { .. })
    }
}

impl SheetStore {
    /// Compare sheet bindings for a part against its distribution records
    pub fn check(
        &self,
        part: &PartId,
        records: &BTreeMap<GroupId, GraderId>,
        groups: &[Group],
    ) -> Result<Vec<Drift>> {
        let known: HashSet<GroupId> = groups.iter().map(|g| g.id).collect();
        let mut seen = HashSet::new();
        let mut drift = Vec::new();

        for binding in self.bindings(part)? {
            if !known.contains(&binding.group) {
                drift.push(Drift {
                    group: binding.group,
                    kind: DriftKind::UnknownGroup,
                    path: Some(binding.path),
                });
                continue;
            }

            if !seen.insert(binding.group) {
                drift.push(Drift {
                    group: binding.group,
                    kind: DriftKind::Duplicate,
                    path: Some(binding.path),
                });
                continue;
            }

            let store = records.get(&binding.group).cloned();
            if binding.grader != store {
                drift.push(Drift {
                    group: binding.group,
                    kind: DriftKind::Misbound {
                        sheet: binding.grader,
                        store,
                    },
                    path: Some(binding.path),
                });
            }
        }

        for (group, grader) in records {
            if !seen.contains(group) {
                drift.push(Drift {
                    group: *group,
                    kind: DriftKind::Missing {
                        store: grader.clone(),
                    },
                    path: None,
                });
            }
        }

        if !drift.is_empty() {
            tracing::info!(part = %part, count = drift.len(), "grading sheet drift found");
        }
        Ok(drift)
    }

    /// Rebind misbound sheets to match the store; returns how many moved
    pub fn repair(&self, part: &PartId, drift: &[Drift], groups: &[Group]) -> Result<usize> {
        let by_id: BTreeMap<GroupId, &Group> = groups.iter().map(|g| (g.id, g)).collect();
        let mut repaired = 0;

        for item in drift {
            let (DriftKind::Misbound { store, .. }, Some(path)) = (&item.kind, &item.path) else {
                continue;
            };
            let Some(group) = by_id.get(&item.group) else {
                continue;
            };

            self.rebind(part, group, path, store.as_ref())?;
            repaired += 1;
        }

        Ok(repaired)
    }
}
