//! Operation Registry
//!
//! Immutable mapping from method name to operation, built once at startup and
//! shared through `AppState`. Results are turned into JSON only here.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CorpusError, Result};
use crate::models::{
    CacheClearResponse, CacheStatsResponse, CallArguments, CallRequest, CorporaResponse,
    ListResponse, SearchResponse,
};
use crate::service::CorpusService;

/// An operation callable through `POST /call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    List,
    GetItem,
    DescribeModule,
    CacheClear,
    CacheStats,
    Corpora,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Search,
        Operation::List,
        Operation::GetItem,
        Operation::DescribeModule,
        Operation::CacheClear,
        Operation::CacheStats,
        Operation::Corpora,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::List => "list",
            Operation::GetItem => "get_item",
            Operation::DescribeModule => "describe_module",
            Operation::CacheClear => "cache_clear",
            Operation::CacheStats => "cache_stats",
            Operation::Corpora => "corpora",
        }
    }

    /// Runs the operation and serializes its result.
    pub async fn invoke(&self, service: &CorpusService, args: &CallArguments) -> Result<Value> {
        match self {
            Operation::Search => {
                let corpus = args.corpus()?;
                let query = args.query()?;
                let results = service.search(corpus, query).await?;
                to_json(&SearchResponse::new(corpus, query, results))
            }
            Operation::List => {
                let corpus = args.corpus()?;
                let entries = service.list(corpus).await?;
                to_json(&ListResponse::new(corpus, entries))
            }
            Operation::GetItem => {
                let item = service.get_item(args.corpus()?, args.name()?).await?;
                to_json(&item)
            }
            Operation::DescribeModule => {
                let info = service.describe_module(args.corpus()?, args.name()?).await?;
                to_json(&info)
            }
            Operation::CacheClear => to_json(&CacheClearResponse::new(service.cache_clear().await)),
            Operation::CacheStats => {
                to_json(&CacheStatsResponse::from(service.cache_stats().await))
            }
            Operation::Corpora => to_json(&CorporaResponse {
                available: service.availability(),
                max_results: service.max_results(),
            }),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| CorpusError::Internal(e.to_string()))
}

// == Operation Registry ==
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    operations: HashMap<&'static str, Operation>,
}

impl OperationRegistry {
    /// Registry with every operation under its canonical name.
    pub fn new() -> Self {
        Self {
            operations: Operation::ALL.iter().map(|op| (op.name(), *op)).collect(),
        }
    }

    pub fn get(&self, method: &str) -> Option<Operation> {
        self.operations.get(method).copied()
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&'static str> {
        let mut methods: Vec<_> = self.operations.keys().copied().collect();
        methods.sort_unstable();
        methods
    }

    /// Looks up `request.method` and invokes it.
    pub async fn dispatch(&self, service: &CorpusService, request: &CallRequest) -> Result<Value> {
        let operation = self.get(&request.method).ok_or_else(|| {
            CorpusError::InvalidRequest(format!(
                "Unknown method '{}', expected one of: {}",
                request.method,
                self.methods().join(", ")
            ))
        })?;
        debug!("Dispatching {}", operation.name());
        operation.invoke(service, &request.arguments).await
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
