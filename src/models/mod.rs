//! Request and Response models for the corpus server API
//!
//! DTOs used only at the HTTP boundary.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CallArguments, CallRequest, SearchParams};
pub use responses::{
    CacheClearResponse, CacheStatsResponse, CallResponse, CorporaResponse, ErrorResponse,
    HealthResponse, ListResponse, SearchResponse,
};
