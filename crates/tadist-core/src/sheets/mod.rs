//! Grading sheets on disk
//!
//! Layout: `sheets/<assignment>/<part>/<grader>/<group-slug>-<group-id>.toml`,
//! with `_unassigned` standing in for the grader directory of sheets whose
//! group currently has no grader. The directory a sheet sits in is its
//! binding; the `grader` field inside is kept in step with it.

mod reconcile;
mod sheet;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::distribute::{GradingArtifacts, Progress};
use crate::error::{Result, TadistError};
use crate::model::{GraderId, Group, GroupId, PartId};

pub use reconcile::{Drift, DriftKind};
pub use sheet::GradingSheet;

/// Sheets directory inside the store root
pub const SHEETS_DIR: &str = "sheets";

const UNASSIGNED_DIR: &str = "_unassigned";

/// Where a sheet currently sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetBinding {
    pub group: GroupId,
    pub grader: Option<GraderId>,
    pub path: PathBuf,
}

/// File-backed grading sheets
#[derive(Debug, Clone)]
pub struct SheetStore {
    root: PathBuf,
}

impl SheetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn part_dir(&self, part: &PartId) -> PathBuf {
        self.root.join(part.assignment()).join(part.part())
    }

    fn sheet_path(&self, part: &PartId, group: &Group, grader: Option<&GraderId>) -> PathBuf {
        let dir = grader.map(|g| g.as_str()).unwrap_or(UNASSIGNED_DIR);
        let mut stem = slug::slugify(&group.name);
        if stem.is_empty() {
            stem = "group".to_string();
        }
        self.part_dir(part)
            .join(dir)
            .join(format!("{}-{}.toml", stem, group.id.0))
    }

    /// Every sheet for a part, ordered by group id
    pub fn bindings(&self, part: &PartId) -> Result<Vec<SheetBinding>> {
        let dir = self.part_dir(part);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut bindings = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "toml") {
                continue;
            }

            let Some(group) = parse_group_id(path) else {
                tracing::warn!(path = %path.display(), "ignoring sheet with unrecognised name");
                continue;
            };

            let grader = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .filter(|n| *n != UNASSIGNED_DIR)
                .map(GraderId::new);

            bindings.push(SheetBinding {
                group,
                grader,
                path: path.to_path_buf(),
            });
        }

        bindings.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.path.cmp(&b.path)));
        Ok(bindings)
    }

    fn find_sheet(&self, part: &PartId, group: GroupId) -> Result<Option<SheetBinding>> {
        Ok(self.bindings(part)?.into_iter().find(|b| b.group == group))
    }

    /// Move a sheet file into the directory for `grader`, keeping its contents
    fn rebind(
        &self,
        part: &PartId,
        group: &Group,
        from: &Path,
        grader: Option<&GraderId>,
    ) -> Result<PathBuf> {
        let mut sheet = GradingSheet::load(from)?;
        sheet.grader = grader.map(|g| g.to_string());

        let to = self.sheet_path(part, group, grader);
        sheet.save(&to)?;
        if to != from {
            fs::remove_file(from).map_err(|e| {
                TadistError::io_operation("remove grading sheet", from.display(), e)
            })?;
        }

        tracing::debug!(
            group = %group,
            from = %from.display(),
            to = %to.display(),
            "sheet rebound"
        );
        Ok(to)
    }
}

/// `<slug>-<id>.toml` -> id
fn parse_group_id(path: &Path) -> Option<GroupId> {
    let stem = path.file_stem()?.to_str()?;
    let (_, id) = stem.rsplit_once('-')?;
    id.parse().ok().map(GroupId)
}

impl GradingArtifacts for SheetStore {
    fn has_artifact(&self, part: &PartId, group: &Group) -> Result<bool> {
        Ok(self.find_sheet(part, group.id)?.is_some())
    }

    fn reassign_artifact(
        &self,
        part: &PartId,
        group: &Group,
        grader: Option<&GraderId>,
    ) -> Result<()> {
        let binding = self.find_sheet(part, group.id)?.ok_or_else(|| {
            TadistError::not_found(&format!("grading sheet on {}", part), &group.name)
        })?;
        self.rebind(part, group, &binding.path, grader)?;
        Ok(())
    }

    fn distribute_artifacts(
        &self,
        part: &PartId,
        distribution: &BTreeMap<GraderId, Vec<Group>>,
        leniency_minutes: u32,
        mut progress: Progress<'_>,
    ) -> Result<usize> {
        let existing: BTreeMap<GroupId, SheetBinding> = self
            .bindings(part)?
            .into_iter()
            .map(|b| (b.group, b))
            .collect();

        let total: usize = distribution.values().map(Vec::len).sum();
        let mut done = 0;
        let mut written = 0;

        for (grader, groups) in distribution {
            for group in groups {
                match existing.get(&group.id) {
                    Some(binding) if binding.grader.as_ref() == Some(grader) => {}
                    Some(binding) => {
                        self.rebind(part, group, &binding.path, Some(grader))?;
                        written += 1;
                    }
                    None => {
                        let sheet = GradingSheet::new(part, group, Some(grader), leniency_minutes);
                        sheet.save(&self.sheet_path(part, group, Some(grader)))?;
                        written += 1;
                    }
                }

                done += 1;
                if let Some(cb) = progress.as_mut() {
                    cb(done, total);
                }
            }
        }

        tracing::info!(part = %part, written, total, "grading sheets distributed");
        Ok(written)
    }
}
