//! Single-item retrieval.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::corpus::read_text;
use crate::engine::walk::{has_suffix, relative_path, stem_of, walk_files};
use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemContent {
    pub name: String,
    /// Path relative to the corpus root
    pub path: String,
    pub content: String,
}

/// Rejects empty names, absolute paths and `..` components.
pub fn ensure_relative(name: &str) -> Result<&Path> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CorpusError::Validation("Name must not be empty".to_string()));
    }
    let path = Path::new(trimmed);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(CorpusError::Validation(format!(
            "Name '{}' must be a path inside the corpus",
            name
        )));
    }
    Ok(path)
}

/// Fetches one file by name.
///
/// `name` may be a relative path with or without the extension, or a bare
/// stem matched anywhere in the tree (first in walk order). Unlike the
/// multi-file walks, a read failure here is returned to the caller.
pub fn get_item(root: &Path, name: &str, suffix: &str) -> Result<ItemContent> {
    let relative = ensure_relative(name)?;
    if !root.is_dir() {
        return Err(CorpusError::NotFound(root.display().to_string()));
    }

    let path = locate(root, relative, suffix)
        .ok_or_else(|| CorpusError::NotFound(format!("Item '{}'", name)))?;
    let content = read_text(&path)?;

    Ok(ItemContent {
        name: stem_of(&path, suffix),
        path: relative_path(root, &path),
        content,
    })
}

fn locate(root: &Path, relative: &Path, suffix: &str) -> Option<PathBuf> {
    let direct = root.join(relative);
    if direct.is_file() && has_suffix(&direct, suffix) {
        return Some(direct);
    }

    let mut with_suffix = direct.into_os_string();
    with_suffix.push(suffix);
    let with_suffix = PathBuf::from(with_suffix);
    if with_suffix.is_file() {
        return Some(with_suffix);
    }

    let stem = relative.to_string_lossy();
    walk_files(root, suffix)
        .into_iter()
        .find(|path| stem_of(path, suffix) == stem)
}
