//! Side-channel events published by the gate.
//!
//! Observers are infallible and are only invoked after an outcome has been
//! decided, so instrumentation can never change what the client sees.

use std::sync::Arc;

/// Tally key for a login attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginOutcome {
    MissingCredentials,
    UserNotFound,
    WrongPassword,
    SessionError,
    StoreError,
    Success,
}

impl LoginOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::UserNotFound => "user_not_found",
            Self::WrongPassword => "wrong_password",
            Self::SessionError => "session_error",
            Self::StoreError => "store_error",
            Self::Success => "success",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    LoginAttempt(LoginOutcome),
    SessionEstablished,
    SessionDestroyed,
    /// Sessions dropped because their window elapsed.
    SessionsExpired(u64),
    /// Live sessions found in the store at startup.
    SessionsRestored(u64),
}

pub trait AuthObserver: Send + Sync {
    fn notify(&self, event: AuthEvent);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl AuthObserver for NoopObserver {
    fn notify(&self, _event: AuthEvent) {}
}

impl<T: AuthObserver + ?Sized> AuthObserver for Arc<T> {
    fn notify(&self, event: AuthEvent) {
        (**self).notify(event);
    }
}
