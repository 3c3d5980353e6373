//! Course configuration for tadist
//!
//! Configuration is stored in `config.toml` at the store root and describes
//! the TAs and the assignments (with their parts) being graded.

pub mod types;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Result, TadistError};
use crate::model::{GraderId, PartId, UNASSIGNED_NAMES};

pub use types::{AssignmentConfig, CourseConfig, PartConfig, TaConfig, CONFIG_FORMAT_VERSION};

impl CourseConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: CourseConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TadistError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check identifiers and cross references
    pub fn validate(&self) -> Result<()> {
        if self.version > CONFIG_FORMAT_VERSION {
            return Err(TadistError::invalid_config(format!(
                "config version {} is newer than supported version {}",
                self.version, CONFIG_FORMAT_VERSION
            )));
        }

        let mut logins = HashSet::new();
        for ta in &self.tas {
            // Logins name sheet directories; a leading underscore is reserved
            if !is_valid_identifier(&ta.login)
                || ta.login.starts_with('_')
                || UNASSIGNED_NAMES.contains(&ta.login.as_str())
            {
                return Err(TadistError::invalid_config(format!(
                    "invalid TA login: {:?}",
                    ta.login
                )));
            }
            if !logins.insert(ta.login.as_str()) {
                return Err(TadistError::invalid_config(format!(
                    "duplicate TA login: {}",
                    ta.login
                )));
            }
        }

        let mut assignment_ids = HashSet::new();
        for assignment in &self.assignments {
            if !is_valid_identifier(&assignment.id) {
                return Err(TadistError::invalid_config(format!(
                    "invalid assignment id: {:?}",
                    assignment.id
                )));
            }
            if !assignment_ids.insert(assignment.id.as_str()) {
                return Err(TadistError::invalid_config(format!(
                    "duplicate assignment id: {}",
                    assignment.id
                )));
            }

            let mut part_ids = HashSet::new();
            for part in &assignment.parts {
                if !is_valid_identifier(&part.id) {
                    return Err(TadistError::invalid_config(format!(
                        "invalid part id in {}: {:?}",
                        assignment.id, part.id
                    )));
                }
                if !part_ids.insert(part.id.as_str()) {
                    return Err(TadistError::invalid_config(format!(
                        "duplicate part id in {}: {}",
                        assignment.id, part.id
                    )));
                }
                for grader in part.graders.iter().flatten() {
                    if !logins.contains(grader.as_str()) {
                        return Err(TadistError::invalid_config(format!(
                            "part {}.{} lists unknown TA {}",
                            assignment.id, part.id, grader
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Look up an assignment by id
    pub fn assignment(&self, id: &str) -> Result<&AssignmentConfig> {
        self.assignments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| TadistError::not_found("assignment", id))
    }

    /// Look up a part, returning its assignment as well
    pub fn part(&self, part: &PartId) -> Result<(&AssignmentConfig, &PartConfig)> {
        let assignment = self.assignment(part.assignment())?;
        let config = assignment
            .parts
            .iter()
            .find(|p| p.id == part.part())
            .ok_or_else(|| TadistError::not_found("part", part))?;
        Ok((assignment, config))
    }

    pub fn is_ta(&self, login: &str) -> bool {
        self.tas.iter().any(|ta| ta.login == login)
    }

    /// Fail with [`TadistError::UnknownGrader`] unless `grader` is a configured TA
    pub fn require_ta(&self, grader: &GraderId) -> Result<()> {
        if self.is_ta(grader.as_str()) {
            Ok(())
        } else {
            Err(TadistError::UnknownGrader {
                login: grader.to_string(),
            })
        }
    }

    /// TAs selected as active graders when none are given explicitly
    pub fn default_graders(&self) -> Vec<GraderId> {
        self.tas
            .iter()
            .filter(|ta| ta.default_grader)
            .map(|ta| GraderId::new(&ta.login))
            .collect()
    }

    /// Leniency for an assignment's grading sheets
    pub fn leniency_for(&self, assignment: &AssignmentConfig) -> u32 {
        assignment.leniency_minutes.unwrap_or(self.leniency_minutes)
    }
}

impl AssignmentConfig {
    /// Parts that take part in distribution
    pub fn distributable_parts(&self) -> impl Iterator<Item = &PartConfig> {
        self.parts.iter().filter(|p| p.distributable)
    }

    pub fn part_id(&self, part: &PartConfig) -> PartId {
        PartId::new(&self.id, &part.id)
    }
}

impl PartConfig {
    /// Whether `grader` may grade this part
    pub fn allows(&self, grader: &GraderId) -> bool {
        match &self.graders {
            Some(pool) => pool.iter().any(|g| g == grader.as_str()),
            None => true,
        }
    }
}

/// Assignment and part ids become directory names and `<assignment>.<part>` keys
fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
