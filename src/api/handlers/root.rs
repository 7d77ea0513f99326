use super::auth::{guard::refresh_cookie, AuthState};
use crate::{api::pages, auth::AuthError};
use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

/// Login page, or straight to the dashboard when the session is still live.
pub async fn root(headers: HeaderMap, auth: Extension<Arc<AuthState>>) -> Response {
    if let Some(token) = auth.cookie().extract(&headers) {
        match auth.gate().resolve(&token).await {
            Ok(_) => {
                let mut response = Redirect::to("/dashboard").into_response();
                refresh_cookie(auth.cookie(), &token, &mut response);
                return response;
            }
            Err(AuthError::Unauthenticated) => {}
            Err(err) => error!("Failed to resolve session: {err:#}"),
        }
    }

    Html(pages::login_page()).into_response()
}
