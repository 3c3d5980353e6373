//! `tadist init` command - create a new store
//!
//! Idempotent: an existing config and database are kept.

use std::path::Path;

use crate::cli::paths::resolve_store_path;
use crate::cli::Cli;
use crate::commands::format::print_json_status;
use crate::output_by_format_result;
use tadist_core::error::Result;
use tadist_core::store::Store;

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path, course: Option<&str>) -> Result<()> {
    let store = if let Some(path) = cli.store.as_ref() {
        Store::init_at(&resolve_store_path(root, path), course)?
    } else {
        Store::init(root, course)?
    };

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            Some("Store initialized"),
            &[("store", serde_json::json!(store.root().display().to_string()))],
        ),
        human => {
            if !cli.quiet {
                println!("Initialized tadist store at {}", store.root().display());
                println!();
                println!("Add TAs and assignments to {}", store.config_path().display());
            }
        }
    )
}
