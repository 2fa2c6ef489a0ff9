//! Content Reader
//!
//! Reads a file's full text, keeping "missing" distinct from "unreadable".

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{CorpusError, Result};

/// Reads the whole file as UTF-8 text.
///
/// Returns `CorpusError::NotFound` when the path does not exist and
/// `CorpusError::Io` for any other failure (permissions, invalid UTF-8,
/// the path being a directory).
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CorpusError::NotFound(path.display().to_string()),
        _ => CorpusError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}
