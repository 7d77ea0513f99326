use super::error::ApiError;
use crate::metrics::{Metrics, CONTENT_TYPE as OPENMETRICS};
use axum::{
    extract::Extension,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Prometheus scrape endpoint.
pub async fn metrics(registry: Extension<Arc<Metrics>>) -> Response {
    match registry.encode() {
        Ok(body) => ([(CONTENT_TYPE, OPENMETRICS)], body).into_response(),
        Err(err) => ApiError::Server(err).into_response(),
    }
}
