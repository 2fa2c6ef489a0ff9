//! API Handlers
//!
//! HTTP request handlers for each corpus server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::dispatch::OperationRegistry;
use crate::config::Config;
use crate::corpus::CorpusId;
use crate::engine::{ItemContent, ModuleInfo};
use crate::error::Result;
use crate::models::{
    CacheClearResponse, CacheStatsResponse, CallRequest, CallResponse, CorporaResponse,
    HealthResponse, ListResponse, SearchParams, SearchResponse,
};
use crate::service::CorpusService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Query service and its cache
    pub service: Arc<CorpusService>,
    /// Method table for `POST /call`
    pub registry: Arc<OperationRegistry>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: CorpusService) -> Self {
        Self {
            service: Arc::new(service),
            registry: Arc::new(OperationRegistry::new()),
        }
    }

    /// Resolves corpora and builds the service from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CorpusService::from_config(config))
    }
}

/// Handler for GET /search/:corpus?q=...
pub async fn search_handler(
    State(state): State<AppState>,
    Path(corpus): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let corpus: CorpusId = corpus.parse()?;
    let results = state.service.search(corpus, &params.q).await?;

    Ok(Json(SearchResponse::new(corpus, params.q, results)))
}

/// Handler for GET /list/:corpus
pub async fn list_handler(
    State(state): State<AppState>,
    Path(corpus): Path<String>,
) -> Result<Json<ListResponse>> {
    let corpus: CorpusId = corpus.parse()?;
    let entries = state.service.list(corpus).await?;

    Ok(Json(ListResponse::new(corpus, entries)))
}

/// Handler for GET /item/:corpus/*name
pub async fn item_handler(
    State(state): State<AppState>,
    Path((corpus, name)): Path<(String, String)>,
) -> Result<Json<ItemContent>> {
    let item = state.service.get_item(corpus.parse()?, &name).await?;
    Ok(Json(item))
}

/// Handler for GET /module/:corpus/:name
pub async fn module_handler(
    State(state): State<AppState>,
    Path((corpus, name)): Path<(String, String)>,
) -> Result<Json<ModuleInfo>> {
    let info = state.service.describe_module(corpus.parse()?, &name).await?;
    Ok(Json(info))
}

/// Handler for GET /corpora
pub async fn corpora_handler(State(state): State<AppState>) -> Json<CorporaResponse> {
    Json(CorporaResponse {
        available: state.service.availability(),
        max_results: state.service.max_results(),
    })
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.service.cache_stats().await.into())
}

/// Handler for DELETE /cache
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<CacheClearResponse> {
    Json(CacheClearResponse::new(state.service.cache_clear().await))
}

/// Handler for POST /call
///
/// Looks the method up in the operation registry.
pub async fn call_handler(
    State(state): State<AppState>,
    Json(req): Json<CallRequest>,
) -> Result<Json<CallResponse>> {
    let result = state.registry.dispatch(&state.service, &req).await?;

    Ok(Json(CallResponse {
        method: req.method,
        result,
    }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusResolver;
    use crate::error::CorpusError;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_state() -> (TempDir, AppState) {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("docs")).unwrap();
        fs::write(root.path().join("docs/intro.md"), "Getting started\nInstall it.").unwrap();
        let resolver = CorpusResolver::new(root.path(), None, "md", "rs");
        let state = AppState::new(CorpusService::new(resolver, Duration::from_secs(60), 10));
        (root, state)
    }

    #[tokio::test]
    async fn test_search_handler() {
        let (_root, state) = test_state();

        let response = search_handler(
            State(state),
            Path("docs".to_string()),
            Query(SearchParams {
                q: "install".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].line, 2);
        assert!(response.message.is_none());
    }

    #[tokio::test]
    async fn test_search_handler_unknown_corpus() {
        let (_root, state) = test_state();

        let result = search_handler(
            State(state),
            Path("movies".to_string()),
            Query(SearchParams { q: "x".repeat(3) }),
        )
        .await;
        assert!(matches!(result, Err(CorpusError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_handler_unavailable() {
        let (_root, state) = test_state();

        let result = list_handler(State(state), Path("examples".to_string())).await;
        assert!(matches!(result, Err(CorpusError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cache_handlers() {
        let (_root, state) = test_state();

        list_handler(State(state.clone()), Path("docs".to_string()))
            .await
            .unwrap();
        let stats = cache_stats_handler(State(state.clone())).await;
        assert_eq!(stats.entry_count, 1);

        let cleared = cache_clear_handler(State(state.clone())).await;
        assert_eq!(cleared.removed, 1);
        assert_eq!(cache_stats_handler(State(state)).await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
