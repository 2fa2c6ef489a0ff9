//! Listing Engine
//!
//! Recursive enumeration of a corpus with a one-line description per file.

use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::corpus::read_text;
use crate::engine::walk::{relative_path, stem_of, walk_files};
use crate::error::{CorpusError, Result};

/// Lines starting with any of these are never used as descriptions.
const SKIPPED_PREFIXES: [&str; 5] = ["//", "#", "/*", "*", "--"];

/// A description line must be longer than this many characters.
const MIN_DESCRIPTION_LEN: usize = 10;

// == Listing Entry ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// File name without extension
    pub name: String,
    /// Path relative to the corpus root
    pub path: String,
    pub description: String,
}

/// Lists every file under `root` ending in `suffix`, sorted by name.
///
/// A missing root is NotFound; an existing root without matches yields an
/// empty list. Unreadable files keep the fallback description.
pub fn list_entries(root: &Path, suffix: &str, fallback: &str) -> Result<Vec<ListingEntry>> {
    if !root.is_dir() {
        return Err(CorpusError::NotFound(root.display().to_string()));
    }

    let mut entries: Vec<ListingEntry> = walk_files(root, suffix)
        .into_iter()
        .map(|path| {
            let description = match read_text(&path) {
                Ok(text) => describe(&text),
                Err(err) => {
                    debug!("Using fallback description: {}", err);
                    None
                }
            };
            ListingEntry {
                name: stem_of(&path, suffix),
                path: relative_path(root, &path),
                description: description.unwrap_or_else(|| fallback.to_string()),
            }
        })
        .collect();

    entries.sort_by(compare_names);
    Ok(entries)
}

// Ordinal (byte-wise) comparison; `String::cmp` is exactly that.
fn compare_names(a: &ListingEntry, b: &ListingEntry) -> Ordering {
    a.name.cmp(&b.name)
}

/// First trimmed line that is long enough and is not a comment or heading.
pub fn describe(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| {
            line.chars().count() > MIN_DESCRIPTION_LEN
                && !SKIPPED_PREFIXES.iter().any(|p| line.starts_with(p))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_describe_skips_comments_and_headings() {
        let text = "// Copyright notice here\n# Heading line here\nshort\n\n  Reads a file into memory.  \nlater line that is long";
        assert_eq!(describe(text).as_deref(), Some("Reads a file into memory."));
    }

    #[test]
    fn test_describe_none() {
        assert!(describe("// only comments\n\ntiny\n").is_none());
        assert!(describe("").is_none());
        // Exactly ten characters is not enough.
        assert!(describe("0123456789").is_none());
    }

    #[test]
    fn test_list_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("z")).unwrap();
        fs::write(dir.path().join("z/alpha.rs"), "fn alpha() -> u32 { 1 }").unwrap();
        fs::write(dir.path().join("gamma.rs"), "// nothing useful").unwrap();
        fs::write(dir.path().join("beta.rs"), "fn beta() -> u32 { 2 }").unwrap();
        fs::write(dir.path().join("Delta.rs"), "fn delta() -> u32 { 3 }").unwrap();
        fs::write(dir.path().join("readme.md"), "ignored by extension").unwrap();

        let entries = list_entries(dir.path(), ".rs", "example").unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Delta", "alpha", "beta", "gamma"]);
        assert_eq!(entries[1].path, "z/alpha.rs");
        assert_eq!(entries[1].description, "fn alpha() -> u32 { 1 }");
        assert_eq!(entries[3].description, "example");
    }

    #[test]
    fn test_list_missing_root() {
        let result = list_entries(Path::new("/no/such/root"), ".rs", "example");
        assert!(matches!(result, Err(CorpusError::NotFound(_))));
    }

    #[test]
    fn test_list_empty_root() {
        let dir = TempDir::new().unwrap();
        assert!(list_entries(dir.path(), ".rs", "example").unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_file_uses_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin.rs"), [0xff, 0xfe, 0xfd]).unwrap();

        let entries = list_entries(dir.path(), ".rs", "module").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "module");
    }
}
