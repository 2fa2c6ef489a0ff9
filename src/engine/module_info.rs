//! Module introspection: README plus the files directly inside a module
//! directory. Nothing below the first level is visited.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::corpus::read_text;
use crate::engine::item::ensure_relative;
use crate::engine::walk::{has_suffix, relative_path};
use crate::error::{CorpusError, Result};

/// README names probed in order.
const README_NAMES: [&str; 3] = ["README.md", "README", "README.txt"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleFile {
    pub name: String,
    /// Path relative to the corpus root
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub readme: Option<String>,
    pub files: Vec<ModuleFile>,
}

/// Describes `root/module_name`.
///
/// Files keep directory enumeration order.
pub fn describe_module(root: &Path, module_name: &str, suffix: &str) -> Result<ModuleInfo> {
    let relative = ensure_relative(module_name)?;
    let dir = root.join(relative);
    if !dir.is_dir() {
        return Err(CorpusError::NotFound(format!("Module '{}'", module_name)));
    }

    let readme = README_NAMES.iter().find_map(|name| {
        let path = dir.join(name);
        if !path.is_file() {
            return None;
        }
        match read_text(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                debug!("README not attached: {}", err);
                None
            }
        }
    });

    let entries = fs::read_dir(&dir).map_err(|source| CorpusError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !has_suffix(&path, suffix) {
            continue;
        }
        let size_bytes = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                debug!("No metadata for {}: {}", path.display(), err);
                0
            }
        };
        files.push(ModuleFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: relative_path(root, &path),
            size_bytes,
        });
    }

    Ok(ModuleInfo {
        name: module_name.to_string(),
        readme,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module_fixture() -> TempDir {
        let root = TempDir::new().unwrap();
        let module = root.path().join("collections");
        fs::create_dir_all(module.join("nested")).unwrap();
        fs::write(module.join("README.md"), "# Collections\n\nFull text kept verbatim.\n").unwrap();
        fs::write(module.join("vec.rs"), "12345").unwrap();
        fs::write(module.join("map.rs"), "1234567890").unwrap();
        fs::write(module.join("notes.txt"), "ignored").unwrap();
        fs::write(module.join("nested/deep.rs"), "not listed").unwrap();
        root
    }

    #[test]
    fn test_describe_module() {
        let root = module_fixture();

        let info = describe_module(root.path(), "collections", ".rs").unwrap();

        assert_eq!(info.name, "collections");
        assert_eq!(
            info.readme.as_deref(),
            Some("# Collections\n\nFull text kept verbatim.\n")
        );

        let mut files = info.files.clone();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            files,
            vec![
                ModuleFile {
                    name: "map.rs".into(),
                    path: "collections/map.rs".into(),
                    size_bytes: 10,
                },
                ModuleFile {
                    name: "vec.rs".into(),
                    path: "collections/vec.rs".into(),
                    size_bytes: 5,
                },
            ]
        );
    }

    #[test]
    fn test_module_without_readme() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("empty")).unwrap();

        let info = describe_module(root.path(), "empty", ".rs").unwrap();
        assert!(info.readme.is_none());
        assert!(info.files.is_empty());
    }

    #[test]
    fn test_missing_module() {
        let root = module_fixture();

        assert!(matches!(
            describe_module(root.path(), "io", ".rs"),
            Err(CorpusError::NotFound(_))
        ));
        // A file is not a module.
        assert!(matches!(
            describe_module(root.path(), "collections/vec.rs", ".rs"),
            Err(CorpusError::NotFound(_))
        ));
    }

    #[test]
    fn test_traversal_rejected() {
        let root = module_fixture();
        assert!(matches!(
            describe_module(&root.path().join("collections"), "..", ".rs"),
            Err(CorpusError::Validation(_))
        ));
    }
}
