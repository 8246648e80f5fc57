//! REST API layer for finance-server
//!
//! Provides HTTP/REST endpoints for:
//! - Financial projections and multi-building summaries
//! - Projection cache administration
//! - Building, bill and residence mutations
//! - System health

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use middleware::cors_layer;
pub use response::SuccessResponse;
pub use routes::{create_router, AppState};
