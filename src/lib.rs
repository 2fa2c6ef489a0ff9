//! Corpus Server - cached search and listing over read-only text corpora
//!
//! Serves documentation pages, example files and library module trees through
//! full-text search, recursive listing and single-item retrieval, with results
//! held in a time-bounded cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{CorpusError, Result};
pub use service::CorpusService;
pub use tasks::spawn_cleanup_task;
