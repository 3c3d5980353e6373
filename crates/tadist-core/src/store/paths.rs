use crate::error::{Result, TadistError};
use std::path::{Path, PathBuf};

/// Default store directory name (hidden)
pub const DEFAULT_STORE_DIR: &str = ".tadist";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

pub use crate::sheets::SHEETS_DIR;

/// Walk up from `root` until a directory containing a store is found
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let store_path = current.join(DEFAULT_STORE_DIR);
        if store_path.is_dir() {
            return Ok(store_path);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(TadistError::StoreNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}
