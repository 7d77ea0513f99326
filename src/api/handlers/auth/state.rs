//! Shared state for the auth handlers.

use super::cookie::SessionCookie;
use crate::auth::Gate;

pub struct AuthState {
    gate: Gate,
    cookie: SessionCookie,
}

impl AuthState {
    #[must_use]
    pub fn new(gate: Gate, cookie: SessionCookie) -> Self {
        Self { gate, cookie }
    }

    #[must_use]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    #[must_use]
    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }
}
