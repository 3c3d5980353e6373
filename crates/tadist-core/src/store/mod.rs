//! Store management for tadist
//!
//! The store is the root directory holding the course configuration, the
//! database and the generated grading sheets.
//! Default location: `.tadist/`

pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CourseConfig;
use crate::db::Database;
use crate::distribute::{Orchestrator, Reassigner, Roster};
use crate::error::{Result, TadistError};
use crate::model::{GraderId, Group, GroupId, PartId, StudentId};
use crate::sheets::SheetStore;
use paths::{CONFIG_FILE, DEFAULT_STORE_DIR, SHEETS_DIR};

/// The tadist store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Course configuration
    config: CourseConfig,
    /// SQLite database
    db: Database,
    /// Grading sheets under `sheets/`
    sheets: SheetStore,
}

impl Store {
    /// Discover a store by walking up from the given root directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = paths::discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(TadistError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(TadistError::InvalidStore {
                reason: format!("missing {}", config_path.display()),
            });
        }
        let config = CourseConfig::load(&config_path)?;

        let db = Database::open(path)?;

        Ok(Store {
            root: path.to_path_buf(),
            sheets: SheetStore::new(path.join(SHEETS_DIR)),
            config,
            db,
        })
    }

    /// Initialize a new store under the given project root.
    ///
    /// An existing configuration is left untouched.
    pub fn init(project_root: &Path, course: Option<&str>) -> Result<Self> {
        let store_root = project_root.join(DEFAULT_STORE_DIR);
        Self::init_at(&store_root, course)
    }

    /// Initialize a store at an explicit store root path.
    pub fn init_at(store_root: &Path, course: Option<&str>) -> Result<Self> {
        fs::create_dir_all(store_root)?;
        fs::create_dir_all(store_root.join(SHEETS_DIR))?;

        let config_path = store_root.join(CONFIG_FILE);
        if !config_path.exists() {
            let config = CourseConfig {
                course: course.map(str::to_string),
                ..CourseConfig::default()
            };
            config.save(&config_path)?;
            tracing::info!(path = %config_path.display(), "wrote default config");
        }

        Self::open(store_root)
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn config(&self) -> &CourseConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn sheets(&self) -> &SheetStore {
        &self.sheets
    }

    /// Groups to distribute for an assignment.
    ///
    /// Assignments without explicit grouping get a singleton group for every
    /// enabled student, created on first use.
    pub fn groups(&self, assignment: &str) -> Result<Vec<Group>> {
        let config = self.config.assignment(assignment)?;
        if !config.group_based {
            self.db.ensure_singleton_groups(assignment)?;
        }
        self.db.list_groups(assignment)
    }

    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.config, self, &self.db, &self.db)
    }

    pub fn reassigner(&self) -> Reassigner<'_> {
        Reassigner::new(&self.config, self, &self.db, &self.db, &self.sheets)
    }
}

impl Roster for Store {
    fn groups_for_part(&self, part: &PartId) -> Result<Vec<Group>> {
        self.groups(part.assignment())
    }

    fn groups_assigned_to(&self, part: &PartId, grader: &GraderId) -> Result<Vec<Group>> {
        Roster::groups_assigned_to(&self.db, part, grader)
    }

    fn create_singleton_group(&self, assignment: &str, student: &StudentId) -> Result<Group> {
        self.db.create_singleton_group(assignment, student)
    }

    fn group(&self, id: GroupId) -> Result<Group> {
        self.db.group(id)
    }
}
