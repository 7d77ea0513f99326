//! Access guard for protected routes.
//!
//! Flow Overview: read the session token, resolve it through the gate (which
//! also slides the expiry), stash the identity in the request extensions and
//! run the wrapped handler. Anything short of a live session redirects to `/`
//! without running the handler.

use super::{cookie::SessionCookie, state::AuthState};
use crate::{
    api::handlers::error::ApiError,
    auth::{AuthError, Identity},
};
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Identity of the session that passed the guard.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| Redirect::to("/").into_response())
    }
}

pub async fn require_session(
    Extension(auth): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = auth.cookie().extract(request.headers()) else {
        debug!("No session token presented");
        return Redirect::to("/").into_response();
    };

    match auth.gate().resolve(&token).await {
        Ok(record) => {
            request
                .extensions_mut()
                .insert(CurrentUser(record.identity));
            let mut response = next.run(request).await;
            refresh_cookie(auth.cookie(), &token, &mut response);
            response
        }
        Err(AuthError::Unauthenticated) => {
            debug!("Session not found or expired");
            Redirect::to("/").into_response()
        }
        Err(err) => ApiError::Server(err.into()).into_response(),
    }
}

/// Slide the browser-side `Max-Age` along with the server-side expiry.
pub(crate) fn refresh_cookie(cookie: &SessionCookie, token: &str, response: &mut Response) {
    if response.headers().contains_key(SET_COOKIE) {
        return;
    }
    match cookie.issue(token) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }
}
