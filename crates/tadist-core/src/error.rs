//! Error types and exit codes for tadist
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, unknown group, etc.)
//! - 4: Configuration error (no graders for a part, unknown TA)
//! - 5: Constraint violation (blacklist conflict, stale assignment)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tadist binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error (3)
    Data = 3,
    /// Configuration error (4)
    Config = 4,
    /// Constraint violation (5)
    Constraint = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for TadistError {
    fn from(err: rusqlite::Error) -> Self {
        TadistError::Other(err.to_string())
    }
}

/// Errors that can occur during tadist operations
#[derive(Error, Debug)]
pub enum TadistError {
    // Usage errors (exit code 2)
    #[error("--format may only be specified once")]
    DuplicateFormat,

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Configuration errors (exit code 4)
    #[error("no active graders selected")]
    NoActiveGraders,

    #[error("no grader is assigned to grade part {part}")]
    PartWithoutGraders { part: String },

    #[error("unknown grader: {login}")]
    UnknownGrader { login: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Constraint errors (exit code 5)
    #[error("group {group} cannot be assigned to {grader}: blacklisted student(s) {}", students.join(", "))]
    Blacklisted {
        group: String,
        grader: String,
        students: Vec<String>,
    },

    #[error("cannot move {requested} group(s) from {from} to {to}: only {movable} can be moved without a blacklist conflict")]
    InsufficientMovable {
        requested: usize,
        movable: usize,
        from: String,
        to: String,
    },

    #[error("group {group} is not {expected} for {part} (currently {actual})")]
    StaleAssignment {
        part: String,
        group: String,
        expected: String,
        actual: String,
    },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl TadistError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        TadistError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction operation
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        TadistError::FailedOperation {
            operation: format!("{} transaction", operation),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        TadistError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        TadistError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that already exists
    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        TadistError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        TadistError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an invalid course configuration
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        TadistError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TadistError::DuplicateFormat
            | TadistError::UsageError(_)
            | TadistError::InvalidValue { .. } => ExitCode::Usage,

            TadistError::StoreNotFound { .. }
            | TadistError::InvalidStore { .. }
            | TadistError::NotFound { .. }
            | TadistError::AlreadyExists { .. } => ExitCode::Data,

            TadistError::NoActiveGraders
            | TadistError::PartWithoutGraders { .. }
            | TadistError::UnknownGrader { .. }
            | TadistError::InvalidConfig { .. } => ExitCode::Config,

            TadistError::Blacklisted { .. }
            | TadistError::InsufficientMovable { .. }
            | TadistError::StaleAssignment { .. } => ExitCode::Constraint,

            TadistError::Io(_)
            | TadistError::Json(_)
            | TadistError::Toml(_)
            | TadistError::FailedOperation { .. }
            | TadistError::FailedOperationWithTarget { .. }
            | TadistError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            TadistError::DuplicateFormat => "duplicate_format",
            TadistError::UsageError(_) => "usage_error",
            TadistError::InvalidValue { .. } => "invalid_value",
            TadistError::StoreNotFound { .. } => "store_not_found",
            TadistError::InvalidStore { .. } => "invalid_store",
            TadistError::AlreadyExists { .. } => "already_exists",
            TadistError::NotFound { .. } => "not_found",
            TadistError::NoActiveGraders => "no_active_graders",
            TadistError::PartWithoutGraders { .. } => "part_without_graders",
            TadistError::UnknownGrader { .. } => "unknown_grader",
            TadistError::InvalidConfig { .. } => "invalid_config",
            TadistError::Blacklisted { .. } => "blacklisted",
            TadistError::InsufficientMovable { .. } => "insufficient_movable",
            TadistError::StaleAssignment { .. } => "stale_assignment",
            TadistError::Io(_) => "io_error",
            TadistError::Json(_) => "json_error",
            TadistError::Toml(_) => "toml_error",
            TadistError::FailedOperation { .. } => "failed_operation",
            TadistError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            TadistError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        match self {
            TadistError::Blacklisted {
                group,
                grader,
                students,
            } => {
                error_obj["group"] = serde_json::json!(group);
                error_obj["grader"] = serde_json::json!(grader);
                error_obj["students"] = serde_json::json!(students);
            }
            TadistError::InsufficientMovable {
                requested, movable, ..
            } => {
                error_obj["requested"] = serde_json::json!(requested);
                error_obj["movable"] = serde_json::json!(movable);
            }
            _ => {}
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for tadist operations
pub type Result<T> = std::result::Result<T, TadistError>;
