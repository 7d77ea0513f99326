//! `POST /login`.

use super::{
    state::AuthState,
    types::{LoginRequest, MessageResponse},
};
use crate::api::handlers::error::ApiError;
use axum::{
    extract::{Extension, Form, FromRequest, Request},
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use std::{convert::Infallible, sync::Arc};
use tracing::{debug, error};

/// Login body from either JSON or an HTML form post.
///
/// A body that cannot be parsed is treated as empty, which the gate rejects
/// as missing input.
pub struct LoginForm(pub LoginRequest);

impl<S: Send + Sync> FromRequest<S> for LoginForm {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let parsed = if is_form {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map(|Form(request)| request)
                .map_err(|err| err.body_text())
        } else {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map(|Json(request)| request)
                .map_err(|err| err.body_text())
        };

        Ok(Self(parsed.unwrap_or_else(|reason| {
            debug!("Unreadable login body: {reason}");
            LoginRequest::default()
        })))
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, session cookie set", body = MessageResponse),
        (status = 400, description = "Username or password missing", body = MessageResponse),
        (status = 401, description = "Invalid username or password", body = MessageResponse),
        (status = 500, description = "Session or store failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    auth: Extension<Arc<AuthState>>,
    LoginForm(request): LoginForm,
) -> Response {
    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    let previous = auth.cookie().extract(&headers);

    let issued = match auth
        .gate()
        .login(&username, &password, previous.as_deref())
        .await
    {
        Ok(issued) => issued,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let cookie = match auth.cookie().issue(&issued.token) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            // The client never learns this token; drop the orphaned session.
            if let Err(err) = auth.gate().logout(&issued.token).await {
                error!("Failed to discard session: {err:#}");
            }
            return ApiError::LoginFailed(err.into()).into_response();
        }
    };

    (
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("Login successful!")),
    )
        .into_response()
}
