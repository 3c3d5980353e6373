//! SQLite database module for tadist
//!
//! Holds students, groups, blacklists and distribution records. Unlike a
//! cache, this database is the source of truth: it is never rebuilt from
//! anything else.

mod blacklist;
mod distribution;
mod groups;
mod schema;
mod students;

use crate::error::{Result, TadistError};
use rusqlite::Connection;
use std::path::Path;

pub use schema::{create_schema, CURRENT_SCHEMA_VERSION};

/// Database file name inside the store root
pub const DB_FILE: &str = "tadist.db";

/// SQLite database for tadist
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given store root
    #[tracing::instrument(skip(store_root), fields(store_root = %store_root.display()))]
    pub fn open(store_root: &Path) -> Result<Self> {
        let db_path = store_root.join(DB_FILE);

        let conn = Connection::open(&db_path).map_err(|e| {
            TadistError::Other(format!(
                "failed to open database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| TadistError::Other(format!("failed to enable WAL mode: {}", e)))?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TadistError::Other(format!("failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| TadistError::Other(format!("failed to enable foreign keys: {}", e)))?;

        create_schema(&conn)
            .map_err(|e| TadistError::Other(format!("failed to create database schema: {}", e)))?;

        Ok(Database { conn })
    }

    pub fn get_schema_version(&self) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |r| {
                    let s: String = r.get(0)?;
                    Ok(s.parse().unwrap_or(0))
                },
            )
            .map_err(|e| TadistError::Other(format!("failed to get schema version: {}", e)))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Checkpoint so the next process sees every committed change
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}
