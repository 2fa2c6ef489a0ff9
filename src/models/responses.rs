//! Response DTOs for the corpus server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::corpus::{AvailabilityFlags, CorpusId};
use crate::engine::{ListingEntry, SearchResult};

/// Response body for `GET /search/:corpus`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub corpus: CorpusId,
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchResult>,
    /// Human-readable note when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn new(corpus: CorpusId, query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        let query = query.into();
        let message = if results.is_empty() {
            Some(format!("No matches for '{}' in {}", query.trim(), corpus))
        } else {
            None
        };
        Self {
            corpus,
            total: results.len(),
            query,
            results,
            message,
        }
    }
}

/// Response body for `GET /list/:corpus`
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub corpus: CorpusId,
    pub total: usize,
    pub entries: Vec<ListingEntry>,
}

impl ListResponse {
    pub fn new(corpus: CorpusId, entries: Vec<ListingEntry>) -> Self {
        Self {
            corpus,
            total: entries.len(),
            entries,
        }
    }
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub entry_count: usize,
    pub ttl_seconds: u64,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            entry_count: stats.entry_count,
            ttl_seconds: stats.ttl_seconds,
            hits: stats.hits,
            misses: stats.misses,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct CacheClearResponse {
    pub message: String,
    pub removed: usize,
}

impl CacheClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cached entries", removed),
            removed,
        }
    }
}

/// Response body for `GET /corpora`
#[derive(Debug, Clone, Serialize)]
pub struct CorporaResponse {
    pub available: AvailabilityFlags,
    pub max_results: usize,
}

/// Response body for `POST /call`
#[derive(Debug, Clone, Serialize)]
pub struct CallResponse {
    pub method: String,
    pub result: Value,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
