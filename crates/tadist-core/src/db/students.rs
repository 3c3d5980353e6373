use rusqlite::{params, OptionalExtension};

use crate::error::{Result, TadistError};
use crate::map_db_err;
use crate::model::{Student, StudentId};

use super::Database;

fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
    Ok(Student {
        login: StudentId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        enabled: row.get::<_, i64>(2)? != 0,
    })
}

impl Database {
    pub fn add_student(&self, login: &StudentId, name: &str) -> Result<Student> {
        if self.find_student(login)?.is_some() {
            return Err(TadistError::already_exists("student", login));
        }

        self.conn
            .execute(
                "INSERT INTO students (login, name, enabled) VALUES (?1, ?2, 1)",
                params![login.as_str(), name],
            )
            .map_err(|e| map_db_err!("insert student", e))?;

        tracing::debug!(student = %login, "added student");

        Ok(Student {
            login: login.clone(),
            name: name.to_string(),
            enabled: true,
        })
    }

    pub fn find_student(&self, login: &StudentId) -> Result<Option<Student>> {
        self.conn
            .query_row(
                "SELECT login, name, enabled FROM students WHERE login = ?1",
                params![login.as_str()],
                row_to_student,
            )
            .optional()
            .map_err(|e| map_db_err!("read student", e))
    }

    pub fn student(&self, login: &StudentId) -> Result<Student> {
        self.find_student(login)?
            .ok_or_else(|| TadistError::not_found("student", login))
    }

    /// All students ordered by login
    pub fn list_students(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT login, name, enabled FROM students ORDER BY login")
            .map_err(|e| map_db_err!("prepare student list", e))?;

        let students = stmt
            .query_map([], row_to_student)
            .map_err(|e| map_db_err!("list students", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read student row", e))?;

        Ok(students)
    }

    /// Disabled students (dropped the course) are skipped for singleton groups
    pub fn set_student_enabled(&self, login: &StudentId, enabled: bool) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE students SET enabled = ?2 WHERE login = ?1",
                params![login.as_str(), enabled as i64],
            )
            .map_err(|e| map_db_err!("update student", e))?;

        if changed == 0 {
            return Err(TadistError::not_found("student", login));
        }
        Ok(())
    }
}
