use super::{
    events::{AuthEvent, AuthObserver, LoginOutcome},
    AuthError, CredentialVerifier, IssuedSession, SessionManager, SessionRecord,
};
use std::sync::Arc;
use tracing::{error, info};

/// Login, resolve and logout over one verifier and one session manager.
pub struct Gate {
    verifier: CredentialVerifier,
    sessions: SessionManager,
    observer: Arc<dyn AuthObserver>,
}

impl Gate {
    #[must_use]
    pub fn new(
        verifier: CredentialVerifier,
        sessions: SessionManager,
        observer: Arc<dyn AuthObserver>,
    ) -> Self {
        Self {
            verifier,
            sessions,
            observer,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Verify credentials and, on success, establish a new session.
    ///
    /// The session is committed to the store before this returns `Ok`, so the
    /// caller may report success immediately.
    ///
    /// # Errors
    /// Any [`AuthError`] from verification, or [`AuthError::Session`] if the
    /// session could not be stored.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        previous: Option<&str>,
    ) -> Result<IssuedSession, AuthError> {
        let user = self.verifier.verify(username, password).await?;

        match self.sessions.establish(user.identity(), previous).await {
            Ok(issued) => {
                info!(user_id = user.id, "Login successful");
                self.observer
                    .notify(AuthEvent::LoginAttempt(LoginOutcome::Success));
                Ok(issued)
            }
            Err(err) => {
                error!(user_id = user.id, "Failed to establish session: {err:#}");
                self.observer
                    .notify(AuthEvent::LoginAttempt(LoginOutcome::SessionError));
                Err(err)
            }
        }
    }

    /// # Errors
    /// See [`SessionManager::resolve`].
    pub async fn resolve(&self, token: &str) -> Result<SessionRecord, AuthError> {
        self.sessions.resolve(token).await
    }

    /// # Errors
    /// See [`SessionManager::destroy`].
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.destroy(token).await
    }
}
