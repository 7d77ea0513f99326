//! Session lifecycle: establish, resolve (rolling), destroy.

use super::{
    events::{AuthEvent, AuthObserver},
    store::{SessionRecord, SessionStore},
    token::{generate_session_token, hash_session_token},
    AuthError, Clock, Identity,
};
use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Upper bound accepted for the idle lifetime: ten years.
pub const MAX_SESSION_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

const TOKEN_ATTEMPTS: usize = 3;

/// A session that was just written to the store. `token` is the only copy of
/// the raw value and goes straight into the cookie.
#[derive(Clone, Debug)]
pub struct IssuedSession {
    pub token: String,
    pub record: SessionRecord,
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn AuthObserver>,
    ttl: TimeDelta,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn AuthObserver>,
    ) -> Self {
        Self {
            store,
            clock,
            observer,
            ttl: TimeDelta::seconds(DEFAULT_SESSION_TTL_SECONDS),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
        now.checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Session(anyhow!("session expiry out of range")))
    }

    /// Bind `identity` to a brand-new token.
    ///
    /// `previous` is the token presented with the login request, if any; it is
    /// revoked first so a planted token never survives authentication.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] if the store fails. Nothing has been
    /// committed for the new token in that case.
    pub async fn establish(
        &self,
        identity: Identity,
        previous: Option<&str>,
    ) -> Result<IssuedSession, AuthError> {
        if let Some(previous) = previous {
            self.destroy(previous).await?;
        }

        let now = self.clock.now();
        let record = SessionRecord {
            identity,
            created_at: now,
            expires_at: self.expiry_from(now)?,
        };

        for _ in 0..TOKEN_ATTEMPTS {
            let token = generate_session_token().map_err(AuthError::Session)?;
            let token_hash = hash_session_token(&token);
            if self
                .store
                .insert(&token_hash, &record)
                .await
                .map_err(AuthError::Session)?
            {
                debug!(user_id = record.identity.user_id, "session established");
                self.observer.notify(AuthEvent::SessionEstablished);
                return Ok(IssuedSession { token, record });
            }
            warn!("session token collision, retrying");
        }

        Err(AuthError::Session(anyhow!(
            "failed to generate unique session token"
        )))
    }

    /// Resolve a token into its session and slide the expiry to `now + ttl`.
    ///
    /// # Errors
    /// [`AuthError::Unauthenticated`] for unknown or expired tokens,
    /// [`AuthError::Session`] if the store fails.
    pub async fn resolve(&self, token: &str) -> Result<SessionRecord, AuthError> {
        let token_hash = hash_session_token(token);
        let Some(mut record) = self
            .store
            .get(&token_hash)
            .await
            .map_err(AuthError::Session)?
        else {
            return Err(AuthError::Unauthenticated);
        };

        let now = self.clock.now();
        if record.is_expired(now) {
            if self
                .store
                .delete(&token_hash)
                .await
                .map_err(AuthError::Session)?
            {
                self.observer.notify(AuthEvent::SessionsExpired(1));
            }
            return Err(AuthError::Unauthenticated);
        }

        let expires_at = self.expiry_from(now)?;
        if !self
            .store
            .touch(&token_hash, expires_at)
            .await
            .map_err(AuthError::Session)?
        {
            // Destroyed between the read and the write.
            return Err(AuthError::Unauthenticated);
        }
        record.expires_at = expires_at;
        Ok(record)
    }

    /// Remove a session. Unknown and expired tokens are not an error.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] if the store fails.
    pub async fn destroy(&self, token: &str) -> Result<(), AuthError> {
        let token_hash = hash_session_token(token);
        if self
            .store
            .delete(&token_hash)
            .await
            .map_err(AuthError::Session)?
        {
            self.observer.notify(AuthEvent::SessionDestroyed);
        }
        Ok(())
    }

    /// Drop every expired session.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] if the store fails.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let purged = self
            .store
            .purge_expired(self.clock.now())
            .await
            .map_err(AuthError::Session)?;
        if purged > 0 {
            self.observer.notify(AuthEvent::SessionsExpired(purged));
        }
        Ok(purged)
    }

    /// Count live sessions and report them, so gauges start from the real
    /// number after a restart.
    ///
    /// Rows that expired while the process was down are dropped first and not
    /// reported: they were never counted, so later purges must not see them.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] if the store fails.
    pub async fn restore(&self) -> Result<u64, AuthError> {
        let now = self.clock.now();
        let stale = self
            .store
            .purge_expired(now)
            .await
            .map_err(AuthError::Session)?;
        if stale > 0 {
            debug!(stale, "dropped sessions expired before startup");
        }
        let active = self
            .store
            .count_active(now)
            .await
            .map_err(AuthError::Session)?;
        self.observer.notify(AuthEvent::SessionsRestored(active));
        Ok(active)
    }
}
