//! Error types for the corpus server
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Corpus Error Enum ==
/// Unified error type for corpus queries and the HTTP layer.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Query or argument failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Corpus root, file or module absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// File exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Literal matcher could not be compiled
    #[error("Pattern compilation failed: {0}")]
    Pattern(String),

    /// Malformed transport request (unknown method, missing argument)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CorpusError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CorpusError::Validation(_) | CorpusError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CorpusError::NotFound(_) => StatusCode::NOT_FOUND,
            CorpusError::Io { .. } | CorpusError::Pattern(_) | CorpusError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CorpusError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));

        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the corpus server.
pub type Result<T> = std::result::Result<T, CorpusError>;
