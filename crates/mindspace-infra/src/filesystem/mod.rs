//! Local filesystem adapters for MindSpace.
//!
//! Provides the data directory layout and the file-backed
//! [`SessionStorage`](mindspace_core::repository::storage::SessionStorage)
//! implementation.

pub mod session_storage;

use std::path::{Path, PathBuf};

pub use session_storage::FileSessionStorage;

/// Compute the config file path: `{data_dir}/config.toml`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Compute the durable storage path: `{data_dir}/storage.json`.
pub fn storage_path(data_dir: &Path) -> PathBuf {
    data_dir.join("storage.json")
}

/// Resolve the data directory.
///
/// Priority:
/// 1. Explicit override (`--data-dir` / `MINDSPACE_DATA_DIR`)
/// 2. `~/.mindspace`
/// 3. `.mindspace` in the current directory
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".mindspace");
    }

    PathBuf::from(".mindspace")
}
