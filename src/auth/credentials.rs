//! Credential verification against the user store.

use super::{
    events::{AuthEvent, AuthObserver, LoginOutcome},
    password::{verify_dummy, verify_password},
    store::UserStore,
    AuthError, User,
};
use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, error};

pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    observer: Arc<dyn AuthObserver>,
}

impl CredentialVerifier {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, observer: Arc<dyn AuthObserver>) -> Self {
        Self { users, observer }
    }

    /// Check a credential pair.
    ///
    /// Unknown users and wrong passwords both come back as
    /// [`AuthError::InvalidCredentials`]; only the published event differs.
    ///
    /// # Errors
    /// [`AuthError::MissingInput`] before any store access if either field is
    /// empty, [`AuthError::InvalidCredentials`] on mismatch and
    /// [`AuthError::Store`] if the lookup or the stored hash is broken.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User, AuthError> {
        self.check(username, password)
            .await
            .map_err(|(outcome, err)| {
                self.observer.notify(AuthEvent::LoginAttempt(outcome));
                err
            })
    }

    async fn check(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, (LoginOutcome, AuthError)> {
        if username.trim().is_empty() || password.is_empty() {
            return Err((LoginOutcome::MissingCredentials, AuthError::MissingInput));
        }

        let user = match self.users.find_by_username(username).await {
            Ok(user) => user,
            Err(err) => {
                error!("Failed to lookup user: {err:#}");
                return Err((LoginOutcome::StoreError, AuthError::Store(err)));
            }
        };

        let password = password.to_string();
        let Some(user) = user else {
            debug!("User not found");
            let _ = tokio::task::spawn_blocking(move || verify_dummy(&password)).await;
            return Err((LoginOutcome::UserNotFound, AuthError::InvalidCredentials));
        };

        let stored = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|err| anyhow!("password verification task failed: {err}"))
            .and_then(|result| result);

        match verified {
            Ok(true) => Ok(user),
            Ok(false) => {
                debug!(user_id = user.id, "Wrong password");
                Err((LoginOutcome::WrongPassword, AuthError::InvalidCredentials))
            }
            Err(err) => {
                error!(user_id = user.id, "Failed to verify password: {err:#}");
                Err((LoginOutcome::StoreError, AuthError::Store(err)))
            }
        }
    }
}
