//! Shared fixtures for distribution tests

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::{Decisions, DistributionPlan, GradingArtifacts, Progress};
use crate::db::Database;
use crate::error::{Result, TadistError};
use crate::model::{GraderId, Group, GroupId, PartId, StudentId};

/// Groups `G1..Gn`, each with the single member `s1..sn`
pub fn numbered_groups(n: usize) -> Vec<Group> {
    (1..=n)
        .map(|i| Group {
            id: GroupId(i as i64),
            assignment: "hw1".to_string(),
            name: format!("G{}", i),
            members: BTreeSet::from([StudentId::new(format!("s{}", i))]),
        })
        .collect()
}

pub fn blacklist_map(entries: &[(&str, &str)]) -> HashMap<GraderId, HashSet<StudentId>> {
    let mut map: HashMap<GraderId, HashSet<StudentId>> = HashMap::new();
    for (ta, student) in entries {
        map.entry(GraderId::new(*ta))
            .or_default()
            .insert(StudentId::new(*student));
    }
    map
}

/// In-memory database with students `s1..sn` in singleton groups `G1..Gn` on hw1
pub fn seeded_database(n: usize) -> Database {
    let db = Database::open_in_memory().unwrap();
    for i in 1..=n {
        let student = StudentId::new(format!("s{}", i));
        db.add_student(&student, &format!("Student {}", i)).unwrap();
        db.add_group("hw1", &format!("G{}", i), &[student]).unwrap();
    }
    db
}

/// Decisions that answer from fixed values and record what was asked
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    pub overwrite: bool,
    pub proceed_after_lookup_failure: bool,
    pub accept_partial: bool,
    pub override_blacklist: bool,
    pub asked: Vec<&'static str>,
}

impl Decisions for ScriptedDecisions {
    fn confirm_overwrite(&mut self, _assignment: &str, _parts: &[PartId]) -> bool {
        self.asked.push("overwrite");
        self.overwrite
    }

    fn proceed_after_lookup_failure(&mut self, _error: &crate::error::TadistError) -> bool {
        self.asked.push("lookup_failure");
        self.proceed_after_lookup_failure
    }

    fn accept_partial(&mut self, _plan: &DistributionPlan) -> bool {
        self.asked.push("partial");
        self.accept_partial
    }

    fn override_blacklist(
        &mut self,
        _group: &Group,
        _grader: &GraderId,
        _students: &[StudentId],
    ) -> bool {
        self.asked.push("override");
        self.override_blacklist
    }
}

/// Grading sheets held in memory: (part, group) -> grader
#[derive(Debug, Default)]
pub struct MemorySheets {
    pub bindings: RefCell<BTreeMap<(PartId, GroupId), Option<GraderId>>>,
    /// Every rebind fails with this message
    pub rebind_error: Option<&'static str>,
}

impl MemorySheets {
    pub fn with_sheet(part: &PartId, group: GroupId, grader: Option<&str>) -> Self {
        let sheets = Self::default();
        sheets
            .bindings
            .borrow_mut()
            .insert((part.clone(), group), grader.map(GraderId::new));
        sheets
    }

    pub fn binding(&self, part: &PartId, group: GroupId) -> Option<Option<GraderId>> {
        self.bindings.borrow().get(&(part.clone(), group)).cloned()
    }
}

impl GradingArtifacts for MemorySheets {
    fn has_artifact(&self, part: &PartId, group: &Group) -> Result<bool> {
        Ok(self.bindings.borrow().contains_key(&(part.clone(), group.id)))
    }

    fn reassign_artifact(
        &self,
        part: &PartId,
        group: &Group,
        grader: Option<&GraderId>,
    ) -> Result<()> {
        if let Some(message) = self.rebind_error {
            return Err(TadistError::Other(message.to_string()));
        }
        self.bindings
            .borrow_mut()
            .insert((part.clone(), group.id), grader.cloned());
        Ok(())
    }

    fn distribute_artifacts(
        &self,
        part: &PartId,
        distribution: &BTreeMap<GraderId, Vec<Group>>,
        _leniency_minutes: u32,
        _progress: Progress<'_>,
    ) -> Result<usize> {
        let mut written = 0;
        for (grader, groups) in distribution {
            for group in groups {
                self.bindings
                    .borrow_mut()
                    .insert((part.clone(), group.id), Some(grader.clone()));
                written += 1;
            }
        }
        Ok(written)
    }
}
