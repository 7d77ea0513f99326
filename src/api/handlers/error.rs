//! JSON error responses shared by the handlers.

use super::auth::types::MessageResponse;
use crate::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing username or password")]
    MissingInput,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("session could not be established")]
    LoginFailed(#[source] anyhow::Error),
    #[error("session could not be destroyed")]
    LogoutFailed(#[source] anyhow::Error),
    #[error("internal error")]
    Server(#[source] anyhow::Error),
    #[error("route not found")]
    NotFound,
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingInput => (StatusCode::BAD_REQUEST, "Username and password are required"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password"),
            Self::LoginFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Login failed"),
            Self::LogoutFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Logout failed"),
            Self::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingInput => Self::MissingInput,
            // A login never yields `Unauthenticated`; treat it like a bad pair.
            AuthError::InvalidCredentials | AuthError::Unauthenticated => Self::InvalidCredentials,
            AuthError::Store(err) => Self::Server(err),
            AuthError::Session(err) => Self::LoginFailed(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            Self::LoginFailed(err) => error!("Failed to establish session: {err:#}"),
            Self::LogoutFailed(err) => error!("Failed to destroy session: {err:#}"),
            Self::Server(err) => error!("Failed to handle request: {err:#}"),
            Self::MissingInput | Self::InvalidCredentials | Self::NotFound => {}
        }
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
