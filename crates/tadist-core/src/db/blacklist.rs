use std::collections::HashSet;

use rusqlite::params;

use crate::distribute::Blacklists;
use crate::error::{Result, TadistError};
use crate::map_db_err;
use crate::model::{GraderId, StudentId};

use super::Database;

impl Database {
    /// Flag a student for a TA. Returns false if the entry already existed.
    pub fn add_blacklist(&self, ta: &GraderId, student: &StudentId) -> Result<bool> {
        self.student(student)?;

        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO blacklist (ta, student) VALUES (?1, ?2)",
                params![ta.as_str(), student.as_str()],
            )
            .map_err(|e| map_db_err!("insert blacklist entry", e))?;

        tracing::debug!(ta = %ta, student = %student, new = changed > 0, "blacklisted student");
        Ok(changed > 0)
    }

    pub fn remove_blacklist(&self, ta: &GraderId, student: &StudentId) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM blacklist WHERE ta = ?1 AND student = ?2",
                params![ta.as_str(), student.as_str()],
            )
            .map_err(|e| map_db_err!("delete blacklist entry", e))?;

        if changed == 0 {
            return Err(TadistError::not_found(
                &format!("blacklist entry for {}", ta),
                student,
            ));
        }
        Ok(())
    }

    /// All (ta, student) entries ordered by TA then student
    pub fn list_blacklist(&self) -> Result<Vec<(GraderId, StudentId)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT ta, student FROM blacklist ORDER BY ta, student")
            .map_err(|e| map_db_err!("prepare blacklist query", e))?;

        let entries = stmt
            .query_map([], |r| {
                Ok((
                    GraderId::new(r.get::<_, String>(0)?),
                    StudentId::new(r.get::<_, String>(1)?),
                ))
            })
            .map_err(|e| map_db_err!("list blacklist", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read blacklist row", e))?;

        Ok(entries)
    }
}

impl Blacklists for Database {
    fn blacklist(&self, grader: &GraderId) -> Result<HashSet<StudentId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT student FROM blacklist WHERE ta = ?1")
            .map_err(|e| map_db_err!("prepare blacklist lookup", e))?;

        let students = stmt
            .query_map(params![grader.as_str()], |r| {
                r.get::<_, String>(0).map(StudentId::new)
            })
            .map_err(|e| map_db_err!("read blacklist", e))?
            .collect::<rusqlite::Result<HashSet<_>>>()
            .map_err(|e| map_db_err!("read blacklist row", e))?;

        Ok(students)
    }
}
