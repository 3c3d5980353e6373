use std::collections::BTreeSet;

use rusqlite::{params, OptionalExtension, ToSql};

use crate::distribute::{DistributionStore, Roster};
use crate::error::{Result, TadistError};
use crate::map_db_err;
use crate::model::{GraderId, Group, GroupId, PartId, StudentId};

use super::Database;

impl Database {
    /// Load groups matching a WHERE clause over `student_groups g`, ordered by name
    pub(super) fn load_groups(&self, filter: &str, args: &[&dyn ToSql]) -> Result<Vec<Group>> {
        let sql = format!(
            "SELECT g.id, g.assignment, g.name, m.student
             FROM student_groups g
             LEFT JOIN group_members m ON m.group_id = g.id
             {}
             ORDER BY g.name, g.id, m.student",
            filter
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare group query", e))?;

        let rows = stmt
            .query_map(args, |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(|e| map_db_err!("query groups", e))?;

        let mut groups: Vec<Group> = Vec::new();
        for row in rows {
            let (id, assignment, name, student) =
                row.map_err(|e| map_db_err!("read group row", e))?;

            let same_group = groups.last().is_some_and(|g| g.id == GroupId(id));
            if !same_group {
                groups.push(Group {
                    id: GroupId(id),
                    assignment,
                    name,
                    members: BTreeSet::new(),
                });
            }

            if let (Some(group), Some(student)) = (groups.last_mut(), student) {
                group.members.insert(StudentId::new(student));
            }
        }

        Ok(groups)
    }

    /// Create a group of one or more students for an assignment
    pub fn add_group(&self, assignment: &str, name: &str, members: &[StudentId]) -> Result<Group> {
        if name.trim().is_empty() {
            return Err(TadistError::invalid_value("group name", name));
        }
        if members.is_empty() {
            return Err(TadistError::UsageError(format!(
                "group {} must have at least one member",
                name
            )));
        }

        for student in members {
            self.student(student)?;
            if let Some(existing) = self.group_of_student(assignment, student)? {
                return Err(TadistError::already_exists(
                    &format!("group for {} on {}", student, assignment),
                    existing.name,
                ));
            }
        }

        if self.find_group_by_name(assignment, name)?.is_some() {
            return Err(TadistError::already_exists(
                &format!("group on {}", assignment),
                name,
            ));
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| TadistError::transaction("begin group insert", e))?;

        tx.execute(
            "INSERT INTO student_groups (assignment, name) VALUES (?1, ?2)",
            params![assignment, name],
        )
        .map_err(|e| map_db_err!("insert group", e))?;
        let id = tx.last_insert_rowid();

        for student in members {
            tx.execute(
                "INSERT INTO group_members (group_id, assignment, student) VALUES (?1, ?2, ?3)",
                params![id, assignment, student.as_str()],
            )
            .map_err(|e| map_db_err!("insert group member", e))?;
        }

        tx.commit()
            .map_err(|e| TadistError::transaction("commit group insert", e))?;

        tracing::debug!(assignment, group = name, members = members.len(), "added group");

        Ok(Group {
            id: GroupId(id),
            assignment: assignment.to_string(),
            name: name.to_string(),
            members: members.iter().cloned().collect(),
        })
    }

    /// All groups for an assignment, ordered by name
    pub fn list_groups(&self, assignment: &str) -> Result<Vec<Group>> {
        self.load_groups("WHERE g.assignment = ?1", &[&assignment])
    }

    pub fn group(&self, id: GroupId) -> Result<Group> {
        self.load_groups("WHERE g.id = ?1", &[&id.0])?
            .pop()
            .ok_or_else(|| TadistError::not_found("group", id))
    }

    pub fn find_group_by_name(&self, assignment: &str, name: &str) -> Result<Option<Group>> {
        Ok(self
            .load_groups("WHERE g.assignment = ?1 AND g.name = ?2", &[&assignment, &name])?
            .pop())
    }

    pub fn group_by_name(&self, assignment: &str, name: &str) -> Result<Group> {
        self.find_group_by_name(assignment, name)?
            .ok_or_else(|| TadistError::not_found(&format!("group on {}", assignment), name))
    }

    /// The group a student belongs to for an assignment, if any
    pub fn group_of_student(&self, assignment: &str, student: &StudentId) -> Result<Option<Group>> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT group_id FROM group_members WHERE assignment = ?1 AND student = ?2",
                params![assignment, student.as_str()],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| map_db_err!("look up student group", e))?;

        match id {
            Some(id) => self.group(GroupId(id)).map(Some),
            None => Ok(None),
        }
    }

    /// Group of one named after the student; returns the existing one if present
    pub fn create_singleton_group(&self, assignment: &str, student: &StudentId) -> Result<Group> {
        if let Some(existing) = self.group_of_student(assignment, student)? {
            if existing.members.len() == 1 {
                return Ok(existing);
            }
            return Err(TadistError::already_exists(
                &format!("group for {} on {}", student, assignment),
                existing.name,
            ));
        }

        self.add_group(assignment, student.as_str(), std::slice::from_ref(student))
    }

    /// Create singleton groups for every enabled student who has none yet
    pub fn ensure_singleton_groups(&self, assignment: &str) -> Result<usize> {
        let mut created = 0;
        for student in self.list_students()? {
            if !student.enabled {
                continue;
            }
            if self.group_of_student(assignment, &student.login)?.is_none() {
                self.create_singleton_group(assignment, &student.login)?;
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!(assignment, created, "created singleton groups");
        }
        Ok(created)
    }
}

/// Explicit groups only; [`crate::store::Store`] layers singleton creation on top
impl Roster for Database {
    fn groups_for_part(&self, part: &PartId) -> Result<Vec<Group>> {
        self.list_groups(part.assignment())
    }

    fn groups_assigned_to(&self, part: &PartId, grader: &GraderId) -> Result<Vec<Group>> {
        self.assigned_groups(part, grader)
    }

    fn create_singleton_group(&self, assignment: &str, student: &StudentId) -> Result<Group> {
        Database::create_singleton_group(self, assignment, student)
    }

    fn group(&self, id: GroupId) -> Result<Group> {
        Database::group(self, id)
    }
}
