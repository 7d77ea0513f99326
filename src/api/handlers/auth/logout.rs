//! `POST /logout`.

use super::{state::AuthState, types::MessageResponse};
use crate::api::handlers::error::ApiError;
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session destroyed (or there was none), cookie cleared", body = MessageResponse),
        (status = 500, description = "Session store failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, auth: Extension<Arc<AuthState>>) -> Response {
    if let Some(token) = auth.cookie().extract(&headers) {
        if let Err(err) = auth.gate().logout(&token).await {
            return ApiError::LogoutFailed(err.into()).into_response();
        }
    }

    let body = Json(MessageResponse::new("Logged out successfully"));
    match auth.cookie().clear() {
        Ok(cookie) => (StatusCode::OK, [(SET_COOKIE, cookie)], body).into_response(),
        Err(err) => {
            error!("Failed to build clear-cookie header: {err}");
            (StatusCode::OK, body).into_response()
        }
    }
}
