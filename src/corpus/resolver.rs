//! Corpus Resolver
//!
//! Computes corpus root paths once at startup and records which corpora are
//! present on disk. Absence is data: a missing directory yields a `false`
//! flag, never an error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::CorpusError;

/// Sub-path of the documentation corpus under the primary root.
pub const DOCS_DIR: &str = "docs";
/// Sub-path of the examples corpus under the primary and secondary roots.
pub const EXAMPLES_DIR: &str = "examples";
/// Sub-path of the library-module corpus under the primary root.
pub const STDLIB_DIR: &str = "lib";

// == Corpus Id ==
/// Identifies one of the served corpora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusId {
    Docs,
    Examples,
    Stdlib,
    Secondary,
}

impl CorpusId {
    pub const ALL: [CorpusId; 4] = [
        CorpusId::Docs,
        CorpusId::Examples,
        CorpusId::Stdlib,
        CorpusId::Secondary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusId::Docs => "docs",
            CorpusId::Examples => "examples",
            CorpusId::Stdlib => "stdlib",
            CorpusId::Secondary => "secondary",
        }
    }

    /// Description used by listings when a file has no usable line.
    pub fn fallback_description(&self) -> &'static str {
        match self {
            CorpusId::Docs => "documentation",
            CorpusId::Examples | CorpusId::Secondary => "example",
            CorpusId::Stdlib => "module",
        }
    }

    /// Documentation pages get context extraction and extra scoring bonuses.
    pub fn is_documentation(&self) -> bool {
        matches!(self, CorpusId::Docs)
    }
}

impl fmt::Display for CorpusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorpusId {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docs" => Ok(CorpusId::Docs),
            "examples" => Ok(CorpusId::Examples),
            "stdlib" => Ok(CorpusId::Stdlib),
            "secondary" => Ok(CorpusId::Secondary),
            other => Err(CorpusError::Validation(format!("Unknown corpus '{}'", other))),
        }
    }
}

// == Availability Flags ==
/// Per-corpus presence, computed once from filesystem checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityFlags {
    pub docs: bool,
    pub examples: bool,
    pub stdlib: bool,
    pub secondary: bool,
}

impl AvailabilityFlags {
    pub fn get(&self, corpus: CorpusId) -> bool {
        match corpus {
            CorpusId::Docs => self.docs,
            CorpusId::Examples => self.examples,
            CorpusId::Stdlib => self.stdlib,
            CorpusId::Secondary => self.secondary,
        }
    }
}

// == Corpus Location ==
/// Root and recognized extension of a single corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLocation {
    pub id: CorpusId,
    pub root: PathBuf,
    /// Extension without the leading dot
    pub extension: String,
}

impl CorpusLocation {
    /// Suffix a file name must end with to belong to this corpus.
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension)
    }
}

// == Corpus Resolver ==
/// Immutable view of the configured corpora.
///
/// Flags are never refreshed; rebuild the resolver to re-check the disk.
#[derive(Debug, Clone)]
pub struct CorpusResolver {
    docs: PathBuf,
    examples: PathBuf,
    stdlib: PathBuf,
    secondary: Option<PathBuf>,
    docs_extension: String,
    source_extension: String,
    flags: AvailabilityFlags,
}

impl CorpusResolver {
    // == Constructor ==
    /// Resolves corpus roots under `primary` and the optional `secondary` root.
    pub fn new(
        primary: impl AsRef<Path>,
        secondary: Option<&Path>,
        docs_extension: impl Into<String>,
        source_extension: impl Into<String>,
    ) -> Self {
        let primary = primary.as_ref();
        let docs = primary.join(DOCS_DIR);
        let examples = primary.join(EXAMPLES_DIR);
        let stdlib = primary.join(STDLIB_DIR);
        let secondary = secondary.map(|root| root.join(EXAMPLES_DIR));

        let flags = AvailabilityFlags {
            docs: docs.is_dir(),
            examples: examples.is_dir(),
            stdlib: stdlib.is_dir(),
            secondary: secondary.as_deref().is_some_and(Path::is_dir),
        };

        info!(
            "Corpora resolved under {}: docs={}, examples={}, stdlib={}, secondary={}",
            primary.display(),
            flags.docs,
            flags.examples,
            flags.stdlib,
            flags.secondary
        );

        Self {
            docs,
            examples,
            stdlib,
            secondary,
            docs_extension: docs_extension.into(),
            source_extension: source_extension.into(),
            flags,
        }
    }

    /// Builds a resolver from the server configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.corpus_root,
            config.secondary_root.as_deref(),
            config.docs_extension.clone(),
            config.source_extension.clone(),
        )
    }

    pub fn flags(&self) -> AvailabilityFlags {
        self.flags
    }

    /// Location of a corpus, whether or not it is available.
    pub fn location(&self, corpus: CorpusId) -> Option<CorpusLocation> {
        let (root, extension) = match corpus {
            CorpusId::Docs => (self.docs.clone(), &self.docs_extension),
            CorpusId::Examples => (self.examples.clone(), &self.source_extension),
            CorpusId::Stdlib => (self.stdlib.clone(), &self.source_extension),
            CorpusId::Secondary => (self.secondary.clone()?, &self.source_extension),
        };
        Some(CorpusLocation {
            id: corpus,
            root,
            extension: extension.clone(),
        })
    }

    /// Location of an available corpus, or NotFound.
    pub fn resolve(&self, corpus: CorpusId) -> Result<CorpusLocation, CorpusError> {
        if !self.flags.get(corpus) {
            return Err(CorpusError::NotFound(format!(
                "Corpus '{}' is not available",
                corpus
            )));
        }
        self.location(corpus)
            .ok_or_else(|| CorpusError::NotFound(format!("Corpus '{}' is not configured", corpus)))
    }
}
