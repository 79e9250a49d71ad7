//! Project root discovery and path resolution
//!
//! Every path the harness touches is anchored at the project root: the
//! directory that holds `loxcheck.toml`, the `samples/` corpus and the
//! `clox/` interpreter sources.

use std::io;
use std::path::{Path, PathBuf};

/// Name of the optional project-level configuration file
pub const CONFIG_FILE_NAME: &str = "loxcheck.toml";

/// Find the project root starting from `start`
///
/// Walks up the ancestors looking for `loxcheck.toml`. Falls back to
/// `start` itself when no ancestor has one.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Resolve the project root from an optional `--root` override
pub fn project_root(explicit: Option<&Path>) -> io::Result<PathBuf> {
    let root = match explicit {
        Some(root) => root.to_path_buf(),
        None => find_project_root(&std::env::current_dir()?),
    };
    root.canonicalize()
}

/// Get the path to the configuration file for a project root
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Anchor a configured path at the project root unless it is absolute
pub fn anchor(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Resolve the runtime binary path
///
/// A bare program name (no separators) that does not exist under the root
/// is searched on `PATH`.
pub fn resolve_runtime(root: &Path, configured: &Path) -> PathBuf {
    let anchored = anchor(root, configured);
    if anchored.exists() || configured.components().count() != 1 || configured.is_absolute() {
        return anchored;
    }

    match which::which(configured) {
        Ok(found) => {
            tracing::debug!(runtime = %found.display(), "Resolved runtime on PATH");
            found
        }
        Err(_) => anchored,
    }
}
