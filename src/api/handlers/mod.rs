//! Route handlers.
//!
//! `/login`, `/logout` and `/health` are documented in the `OpenAPI` spec;
//! the HTML pages and `/metrics` are not.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod metrics;
pub mod root;

pub use error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
