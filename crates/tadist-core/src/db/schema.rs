//! SQLite database schema for tadist

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
-- Enrolled students
CREATE TABLE IF NOT EXISTS students (
    login TEXT PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    enabled INTEGER NOT NULL DEFAULT 1
);

-- Groups are per assignment; a student is in at most one group per assignment
CREATE TABLE IF NOT EXISTS student_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    assignment TEXT NOT NULL,
    name TEXT NOT NULL,
    UNIQUE (assignment, name)
);

CREATE TABLE IF NOT EXISTS group_members (
    group_id INTEGER NOT NULL REFERENCES student_groups(id) ON DELETE CASCADE,
    assignment TEXT NOT NULL,
    student TEXT NOT NULL REFERENCES students(login),
    PRIMARY KEY (group_id, student),
    UNIQUE (assignment, student)
);

-- Directional: the TA flags the student
CREATE TABLE IF NOT EXISTS blacklist (
    ta TEXT NOT NULL,
    student TEXT NOT NULL REFERENCES students(login) ON DELETE CASCADE,
    PRIMARY KEY (ta, student)
);

-- One active grader per (part, group)
CREATE TABLE IF NOT EXISTS distribution (
    part TEXT NOT NULL,
    group_id INTEGER NOT NULL REFERENCES student_groups(id) ON DELETE CASCADE,
    ta TEXT NOT NULL,
    PRIMARY KEY (part, group_id)
);
CREATE INDEX IF NOT EXISTS idx_distribution_ta ON distribution(part, ta);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

pub fn create_schema(conn: &Connection) -> Result<()> {
    let has_meta: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'meta'",
        [],
        |r| r.get::<_, i64>(0).map(|n| n > 0),
    )?;

    let current_version: Option<i32> = if has_meta {
        conn.query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok()
    } else {
        None
    };

    match current_version {
        None => {
            conn.execute_batch(SCHEMA_SQL)?;
            conn.execute(
                "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
                [&CURRENT_SCHEMA_VERSION.to_string()],
            )?;
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => {}
        Some(v) => {
            // Distribution records cannot be regenerated, so never drop tables
            return Err(rusqlite::Error::InvalidParameterName(format!(
                "unsupported schema version {} (expected {})",
                v, CURRENT_SCHEMA_VERSION
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}
