//! Auth handlers and the access guard.
//!
//! Flow Overview: `POST /login` verifies a credential pair through the
//! [`Gate`](crate::auth::Gate) and answers with a session cookie; protected
//! routes sit behind [`guard::require_session`]; `POST /logout` destroys the
//! presented session and clears the cookie.
//!
//! The session token travels in the `sessionId` cookie (name configurable) or
//! as `Authorization: Bearer <token>`.

pub mod cookie;
pub mod guard;
pub mod login;
pub mod logout;
mod state;
pub mod types;

pub use cookie::{valid_cookie_name, SessionCookie, DEFAULT_SESSION_COOKIE_NAME};
pub use guard::{require_session, CurrentUser};
pub use state::AuthState;
