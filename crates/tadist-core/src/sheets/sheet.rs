//! On-disk grading sheet format

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TadistError};
use crate::model::{GraderId, Group, PartId};

/// A grading sheet for one group on one part.
///
/// Graders fill in `score` and `comments`; everything else is written by
/// tadist and rewritten when the sheet is rebound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingSheet {
    pub part: String,
    pub group_id: i64,
    pub group: String,
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grader: Option<String>,
    #[serde(default)]
    pub leniency_minutes: u32,
    pub generated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub comments: String,
}

impl GradingSheet {
    pub fn new(
        part: &PartId,
        group: &Group,
        grader: Option<&GraderId>,
        leniency_minutes: u32,
    ) -> Self {
        Self {
            part: part.to_string(),
            group_id: group.id.0,
            group: group.name.clone(),
            members: group.members.iter().map(|m| m.to_string()).collect(),
            grader: grader.map(|g| g.to_string()),
            leniency_minutes,
            generated: Utc::now(),
            score: None,
            comments: String::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| TadistError::io_operation("read grading sheet", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| TadistError::io_operation("parse grading sheet", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TadistError::Other(format!("failed to serialize grading sheet: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
            .map_err(|e| TadistError::io_operation("write grading sheet", path.display(), e))
    }
}
