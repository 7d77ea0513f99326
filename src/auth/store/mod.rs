//! Storage seams for users and sessions.
//!
//! Both traits assume per-key atomicity from the backend and nothing more.
//! Session keys are always token hashes.

mod memory;
mod postgres;

pub use memory::{MemorySessionStore, MemoryUserStore};
pub use postgres::{PgSessionStore, PgUserStore};

use super::{Identity, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// What a session token is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive username match.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `Ok(false)` if the hash is already taken.
    async fn insert(&self, token_hash: &[u8], record: &SessionRecord) -> Result<bool>;

    async fn get(&self, token_hash: &[u8]) -> Result<Option<SessionRecord>>;

    /// Move the expiry. Returns `Ok(false)` if the session is gone.
    async fn touch(&self, token_hash: &[u8], expires_at: DateTime<Utc>) -> Result<bool>;

    /// Returns `Ok(true)` if a session was removed.
    async fn delete(&self, token_hash: &[u8]) -> Result<bool>;

    /// Remove every session whose expiry is at or before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    async fn count_active(&self, now: DateTime<Utc>) -> Result<u64>;
}
