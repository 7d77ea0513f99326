//! HTTP surface: router assembly and the server loop.

use crate::{auth::UserStore, metrics::Metrics};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Extension, Router,
};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, warn, Span};
use ulid::Ulid;
use utoipa_axum::router::OpenApiRouter;

pub mod handlers;
mod openapi;
pub mod pages;
mod sweeper;

pub use handlers::auth::{AuthState, SessionCookie};
pub use openapi::openapi;
pub use sweeper::spawn_session_sweeper;

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Everything the handlers need, constructed by the caller.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthState>,
    pub users: Arc<dyn UserStore>,
    pub metrics: Option<Arc<Metrics>>,
}

#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    pub listen: IpAddr,
    pub port: u16,
    pub purge_interval: Duration,
}

/// The full application: documented routes, HTML pages, the guarded
/// dashboard, optional `/metrics` and the 404 fallback.
#[must_use]
pub fn app(services: &Services) -> Router {
    // Documented routes come from openapi.rs; the pages are added here.
    let (router, _openapi) = router().split_for_parts();

    let protected = Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route_layer(middleware::from_fn(handlers::auth::require_session));

    let mut app = router
        .route("/", get(handlers::root::root))
        .merge(protected)
        .fallback(handlers::not_found);

    if let Some(metrics) = &services.metrics {
        // Layers only wrap what is already registered, fallback included.
        app = app
            .route("/metrics", get(handlers::metrics::metrics))
            .layer(middleware::from_fn_with_state(metrics.clone(), track_requests))
            .layer(Extension(metrics.clone()));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(services.auth.clone()))
            .layer(Extension(services.users.clone())),
    )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(config: ServerConfig, services: Services) -> Result<()> {
    match services.auth.gate().sessions().restore().await {
        Ok(active) => info!(active, "Restored session count"),
        Err(err) => warn!("Failed to count active sessions: {err:#}"),
    }

    let sweeper = spawn_session_sweeper(services.auth.clone(), config.purge_interval);

    let app = app(&services);

    let addr = SocketAddr::new(config.listen, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();

    info!("Gracefully shutdown");

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

/// Record request latency by method, route template and status.
async fn track_requests(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    metrics.observe_request(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
