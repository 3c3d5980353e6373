//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Course configuration, stored in `config.toml` at the store root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Config format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Course name (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,

    /// Default handin leniency recorded on grading sheets
    #[serde(default)]
    pub leniency_minutes: u32,

    /// Teaching assistants who may grade
    #[serde(default)]
    pub tas: Vec<TaConfig>,

    /// Assignments and their gradeable parts
    #[serde(default)]
    pub assignments: Vec<AssignmentConfig>,
}

/// A teaching assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaConfig {
    pub login: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Selected as an active grader when none are given explicitly
    #[serde(default = "default_true")]
    pub default_grader: bool,
}

/// An assignment with one or more parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Students submit in explicit groups; otherwise each student is a group of one
    #[serde(default)]
    pub group_based: bool,

    /// Overrides the course-wide leniency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leniency_minutes: Option<u32>,

    #[serde(default)]
    pub parts: Vec<PartConfig>,
}

/// A gradeable part of an assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Parts graded by hand entry (quizzes, design checks) are not distributed
    #[serde(default = "default_true")]
    pub distributable: bool,

    /// TAs allowed to grade this part; absent means any TA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graders: Option<Vec<String>>,
}

fn default_version() -> u32 {
    CONFIG_FORMAT_VERSION
}

fn default_true() -> bool {
    true
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            course: None,
            leniency_minutes: 0,
            tas: Vec::new(),
            assignments: Vec::new(),
        }
    }
}
