//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary corpus root (holds `docs/`, `examples/` and `lib/`)
    pub corpus_root: PathBuf,
    /// Optional secondary corpus root (holds `examples/`)
    pub secondary_root: Option<PathBuf>,
    /// Cache TTL in seconds
    pub cache_ttl: u64,
    /// Maximum number of search results returned per query
    pub max_results: usize,
    /// Extension of documentation pages, without the dot
    pub docs_extension: String,
    /// Extension of example and library source files, without the dot
    pub source_extension: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CORPUS_ROOT` - Primary corpus root (default: ./corpus)
    /// - `SECONDARY_ROOT` - Secondary corpus root (default: unset)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `MAX_RESULTS` - Search result cap, at least 1 (default: 20)
    /// - `DOCS_EXTENSION` - Documentation file extension (default: md)
    /// - `SOURCE_EXTENSION` - Example/library file extension (default: rs)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            corpus_root: env::var("CORPUS_ROOT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.corpus_root),
            secondary_root: env::var("SECONDARY_ROOT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            max_results: parse_var("MAX_RESULTS")
                .unwrap_or(defaults.max_results)
                .max(1),
            docs_extension: extension_var("DOCS_EXTENSION").unwrap_or(defaults.docs_extension),
            source_extension: extension_var("SOURCE_EXTENSION")
                .unwrap_or(defaults.source_extension),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

// Accepts "md" and ".md" alike.
fn extension_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().trim_start_matches('.').to_string())
        .filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("./corpus"),
            secondary_root: None,
            cache_ttl: 300,
            max_results: 20,
            docs_extension: "md".to_string(),
            source_extension: "rs".to_string(),
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
