//! Recursive corpus traversal.
//!
//! Yields every file under a root whose name ends with a given suffix.
//! Directories are visited at most once (by canonical path) and no deeper
//! than `MAX_DEPTH`, so symlink cycles cannot loop forever.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Deepest directory level the walk descends into.
pub const MAX_DEPTH: usize = 64;

/// Collects matching files under `root` in deterministic discovery order.
///
/// Children of each directory are visited sorted by file name. Unreadable
/// directories are skipped.
pub fn walk_files(root: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut visited = HashSet::new();
    walk_dir(root, suffix, 0, &mut visited, &mut files);
    files
}

fn walk_dir(
    dir: &Path,
    suffix: &str,
    depth: usize,
    visited: &mut HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
) {
    if depth > MAX_DEPTH {
        debug!("Depth limit reached at {}", dir.display());
        return;
    }

    let canonical = match dir.canonicalize() {
        Ok(path) => path,
        Err(err) => {
            debug!("Skipping {}: {}", dir.display(), err);
            return;
        }
    };
    if !visited.insert(canonical) {
        debug!("Already visited {}", dir.display());
        return;
    }

    let mut children: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(err) => {
            debug!("Cannot read directory {}: {}", dir.display(), err);
            return;
        }
    };
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    for path in children {
        // `is_dir`/`is_file` follow symlinks; the visited set guards cycles.
        if path.is_dir() {
            walk_dir(&path, suffix, depth + 1, visited, files);
        } else if path.is_file() && has_suffix(&path, suffix) {
            files.push(path);
        }
    }
}

/// True if the file name ends with `suffix` (e.g. ".md").
pub fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}

/// Path of `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// File name with the recognized suffix removed.
pub fn stem_of(path: &Path, suffix: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(suffix) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}
