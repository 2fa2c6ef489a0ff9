//! API Module
//!
//! HTTP handlers, routing and method dispatch for the corpus server.
//!
//! # Endpoints
//! - `GET /search/:corpus?q=` - Ranked full-text search
//! - `GET /list/:corpus` - Listing with descriptions
//! - `GET /item/:corpus/*name` - Single file content
//! - `GET /module/:corpus/:name` - Module introspection
//! - `GET /corpora`, `GET /cache/stats`, `DELETE /cache`, `GET /health`
//! - `POST /call` - Dispatch through the operation registry

pub mod dispatch;
pub mod handlers;
pub mod routes;

pub use dispatch::{Operation, OperationRegistry};
pub use handlers::*;
pub use routes::create_router;
