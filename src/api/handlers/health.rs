use crate::{auth::UserStore, GIT_COMMIT_HASH};
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    status: String,
    timestamp: String,
    database: String,
    name: String,
    version: String,
    commit: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Database is reachable", body = Health),
        (status = 503, description = "Database is unreachable", body = Health)
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(users: Extension<Arc<dyn UserStore>>) -> impl IntoResponse {
    let result = users.ping().await.map_err(|err| {
        error!("Failed to ping database: {err:#}");
    });

    let health = Health {
        status: if result.is_ok() { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        database: if result.is_ok() { "ok" } else { "error" }.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: GIT_COMMIT_HASH.to_string(),
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    let status = if result.is_ok() {
        debug!("Database connection is healthy");
        StatusCode::OK
    } else {
        debug!("Database connection is unhealthy");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, headers, Json(health))
}
