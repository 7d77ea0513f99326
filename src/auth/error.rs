use thiserror::Error;

/// Failure modes of the gate. Store variants carry the underlying error for
/// server-side logging only; it never reaches a client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingInput,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("no valid session")]
    Unauthenticated,
    #[error("user store failure")]
    Store(#[source] anyhow::Error),
    #[error("session store failure")]
    Session(#[source] anyhow::Error),
}
