//! Search Engine
//!
//! Linear-scan, case-insensitive literal search over every file of a corpus.
//! Two entry points share the walk, matching and ranking steps:
//!
//! - [`search_documentation`] attaches a paragraph-bounded context block to
//!   each hit and applies the starts-with and context bonuses.
//! - [`search_directory`] reports bare line hits with the contains bonus only.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::corpus::read_text;
use crate::engine::walk::{relative_path, walk_files};
use crate::error::{CorpusError, Result};

/// Minimum query length after trimming.
pub const MIN_QUERY_LEN: usize = 2;

/// Lines kept on each side of a hit before paragraph growth.
pub const CONTEXT_RADIUS: usize = 3;

const BASE_SCORE: f64 = 1.0;
const CONTAINS_BONUS: f64 = 0.5;
const STARTS_WITH_BONUS: f64 = 0.3;
const CONTEXT_BONUS: f64 = 0.2;

// == Search Result ==
/// A single matching line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// 1-based line number
    pub line: usize,
    /// Matching line, trimmed
    pub content: String,
    /// Surrounding paragraph, documentation search only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Path relative to the corpus root
    pub file: String,
    pub score: f64,
    /// Query as given by the caller
    pub pattern: String,
}

// == Literal Matcher ==
/// Case-insensitive matcher that treats the query as plain text.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    regex: Regex,
}

impl LiteralMatcher {
    /// Compiles `pattern` with every regex metacharacter escaped.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| CorpusError::Pattern(e.to_string()))?;
        Ok(Self { regex })
    }

    /// True if the query occurs anywhere in `line`.
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    // Bonuses use the same case folding as matching.
    fn contained_in(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    fn starts(&self, line: &str) -> bool {
        self.regex.find(line).is_some_and(|m| m.start() == 0)
    }
}

/// Trims the query and rejects it when shorter than [`MIN_QUERY_LEN`].
pub fn validate_query(pattern: &str) -> Result<&str> {
    let trimmed = pattern.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Err(CorpusError::Validation(format!(
            "Query must be at least {} characters",
            MIN_QUERY_LEN
        )));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Documentation,
    Directory,
}

/// Searches documentation pages, attaching context to every hit.
pub fn search_documentation(
    root: &Path,
    suffix: &str,
    pattern: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    search(root, suffix, pattern, max_results, Variant::Documentation)
}

/// Searches a source directory tree; hits carry no context.
pub fn search_directory(
    root: &Path,
    suffix: &str,
    pattern: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    search(root, suffix, pattern, max_results, Variant::Directory)
}

fn search(
    root: &Path,
    suffix: &str,
    pattern: &str,
    max_results: usize,
    variant: Variant,
) -> Result<Vec<SearchResult>> {
    let query = validate_query(pattern)?;

    if !root.is_dir() {
        return Err(CorpusError::NotFound(root.display().to_string()));
    }

    let matcher = match LiteralMatcher::new(query) {
        Ok(matcher) => matcher,
        Err(err) => {
            // No file can match; the call still succeeds.
            warn!("Skipping search for {:?}: {}", query, err);
            return Ok(Vec::new());
        }
    };

    let mut results = Vec::new();
    for path in walk_files(root, suffix) {
        let text = match read_text(&path) {
            Ok(text) => text,
            Err(err) => {
                debug!("Skipping unreadable file: {}", err);
                continue;
            }
        };
        let file = relative_path(root, &path);
        scan_text(&text, &file, pattern, &matcher, variant, &mut results);
    }

    debug!(
        "Search {:?} under {} found {} raw matches",
        query,
        root.display(),
        results.len()
    );

    rank_results(&mut results, max_results);
    Ok(results)
}

fn scan_text(
    text: &str,
    file: &str,
    pattern: &str,
    matcher: &LiteralMatcher,
    variant: Variant,
    results: &mut Vec<SearchResult>,
) {
    let lines: Vec<&str> = text.lines().collect();

    for (idx, raw) in lines.iter().enumerate() {
        if !matcher.is_match(raw) {
            continue;
        }

        let mut score = BASE_SCORE;
        if matcher.contained_in(raw) {
            score += CONTAINS_BONUS;
        }

        let context = match variant {
            Variant::Directory => None,
            Variant::Documentation => {
                if matcher.starts(raw) {
                    score += STARTS_WITH_BONUS;
                }
                let context = extract_context(&lines, idx);
                if context.len() > raw.len() {
                    score += CONTEXT_BONUS;
                }
                Some(context)
            }
        };

        results.push(SearchResult {
            line: idx + 1,
            content: raw.trim().to_string(),
            context,
            file: file.to_string(),
            score,
            pattern: pattern.to_string(),
        });
    }
}

/// Paragraph-bounded block around `lines[idx]`.
///
/// Starts at `idx ± CONTEXT_RADIUS` clamped to the file, then grows each edge
/// outward until a blank line or the file boundary.
pub fn extract_context(lines: &[&str], idx: usize) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let last = lines.len() - 1;
    let mut start = idx.saturating_sub(CONTEXT_RADIUS);
    let mut end = (idx + CONTEXT_RADIUS).min(last);

    while start > 0 && !lines[start - 1].trim().is_empty() {
        start -= 1;
    }
    while end < last && !lines[end + 1].trim().is_empty() {
        end += 1;
    }

    lines[start..=end].join("\n").trim().to_string()
}

/// Sorts by score descending, keeping discovery order on ties, then caps the
/// list at `max_results`.
pub fn rank_results(results: &mut Vec<SearchResult>, max_results: usize) {
    // `sort_by` is stable.
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(max_results);
}
