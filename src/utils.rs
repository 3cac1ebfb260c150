//! Shared filesystem helpers for log locations.
//!
//! These functions are reused by the query service and the terminal client.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the cross-platform directory for rag-search data.
///
/// Returns `{data_local_dir}/rag-search` where `data_local_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Local`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("rag-search"))
}

/// Gets the log file path for a component, e.g. `client` or `server`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_log_path(component: &str) -> Result<PathBuf> {
    Ok(get_data_dir()?.join(format!("{component}.log")))
}

/// Ensures the parent directory of `path` exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
