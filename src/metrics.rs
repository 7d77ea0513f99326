//! Prometheus metrics.
//!
//! [`Metrics`] subscribes to gate events as an [`AuthObserver`] and also owns
//! the per-request latency histogram fed by the HTTP middleware.

use crate::auth::{AuthEvent, AuthObserver};
use anyhow::{Context, Result};
use prometheus_client::{
    encoding::{text::encode, EncodeLabelSet},
    metrics::{
        counter::Counter,
        family::Family,
        gauge::Gauge,
        histogram::{exponential_buckets, Histogram},
    },
    registry::Registry,
};

pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct OutcomeLabels {
    outcome: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct RequestLabels {
    method: String,
    route: String,
    status: String,
}

type DurationFamily = Family<RequestLabels, Histogram, fn() -> Histogram>;

fn duration_histogram() -> Histogram {
    // 5ms .. ~10s
    Histogram::new(exponential_buckets(0.005, 2.0, 12))
}

pub struct Metrics {
    registry: Registry,
    login_attempts: Family<OutcomeLabels, Counter>,
    active_sessions: Gauge,
    request_duration: DurationFamily,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let login_attempts = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "login_attempts",
            "Login attempts by outcome",
            login_attempts.clone(),
        );

        let active_sessions = Gauge::default();
        registry.register(
            "active_sessions",
            "Sessions currently established",
            active_sessions.clone(),
        );

        let request_duration: DurationFamily = Family::new_with_constructor(duration_histogram);
        registry.register(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            request_duration.clone(),
        );

        Self {
            registry,
            login_attempts,
            active_sessions,
            request_duration,
        }
    }

    pub fn observe_request(&self, method: &str, route: &str, status: u16, seconds: f64) {
        self.request_duration
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                route: route.to_string(),
                status: status.to_string(),
            })
            .observe(seconds);
    }

    #[must_use]
    pub fn active_sessions(&self) -> i64 {
        self.active_sessions.get()
    }

    #[must_use]
    pub fn login_attempts(&self, outcome: &str) -> u64 {
        self.login_attempts
            .get_or_create(&OutcomeLabels {
                outcome: outcome.to_string(),
            })
            .get()
    }

    /// Render the registry in the text exposition format.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn encode(&self) -> Result<String> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry).context("failed to encode registry")?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthObserver for Metrics {
    fn notify(&self, event: AuthEvent) {
        match event {
            AuthEvent::LoginAttempt(outcome) => {
                self.login_attempts
                    .get_or_create(&OutcomeLabels {
                        outcome: outcome.as_str().to_string(),
                    })
                    .inc();
            }
            AuthEvent::SessionEstablished => {
                self.active_sessions.inc();
            }
            AuthEvent::SessionDestroyed => {
                self.active_sessions.dec();
            }
            AuthEvent::SessionsExpired(count) => {
                self.active_sessions
                    .dec_by(i64::try_from(count).unwrap_or(i64::MAX));
            }
            AuthEvent::SessionsRestored(count) => {
                self.active_sessions
                    .set(i64::try_from(count).unwrap_or(i64::MAX));
            }
        }
    }
}
