//! Session Authentication Gate.
//!
//! Flow Overview: [`CredentialVerifier`] turns a `(username, password)` pair into
//! a [`User`], [`SessionManager`] binds that user to a freshly minted token, and
//! later requests resolve the token back into an [`Identity`]. [`Gate`] ties the
//! two together and reports the login outcome to the configured observer.
//!
//! Nothing in here knows about HTTP; the axum layer lives in `crate::api`.

mod clock;
mod credentials;
mod error;
pub mod events;
mod gate;
mod password;
mod session;
pub mod store;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::CredentialVerifier;
pub use error::AuthError;
pub use events::{AuthEvent, AuthObserver, LoginOutcome, NoopObserver};
pub use gate::Gate;
pub use password::{hash_password, verify_password};
pub use session::{
    IssuedSession, SessionManager, DEFAULT_SESSION_TTL_SECONDS, MAX_SESSION_TTL_SECONDS,
};
pub use store::{SessionRecord, SessionStore, UserStore};
pub use token::{generate_session_token, hash_session_token};

use serde::Serialize;

/// A row of the `users` table.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// The denormalized identity copied into a session at login time.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .finish()
    }
}

/// Who a session belongs to. Not refreshed until the next login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}
