//! In-process stores. Used for `--session-store memory` and in tests.

use super::{SessionRecord, SessionStore, UserStore};
use crate::auth::User;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Vec<u8>, SessionRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, token_hash: &[u8], record: &SessionRecord) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(token_hash) {
            return Ok(false);
        }
        sessions.insert(token_hash.to_vec(), record.clone());
        Ok(true)
    }

    async fn get(&self, token_hash: &[u8]) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(token_hash).cloned())
    }

    async fn touch(&self, token_hash: &[u8], expires_at: DateTime<Utc>) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.get_mut(token_hash).is_some_and(|record| {
            record.expires_at = expires_at;
            true
        }))
    }

    async fn delete(&self, token_hash: &[u8]) -> Result<bool> {
        Ok(self.sessions.write().await.remove(token_hash).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        Ok(u64::try_from(before - sessions.len()).unwrap_or(u64::MAX))
    }

    async fn count_active(&self, now: DateTime<Utc>) -> Result<u64> {
        let sessions = self.sessions.read().await;
        let active = sessions
            .values()
            .filter(|record| !record.is_expired(now))
            .count();
        Ok(u64::try_from(active).unwrap_or(u64::MAX))
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users
            .write()
            .await
            .insert(user.username.clone(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use chrono::TimeDelta;

    fn record(expires_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            identity: Identity {
                user_id: 1,
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
            },
            created_at: expires_at - TimeDelta::hours(24),
            expires_at,
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_hash() -> Result<()> {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        assert!(store.insert(b"hash", &record(now)).await?);
        assert!(!store.insert(b"hash", &record(now)).await?);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn touch_and_delete() -> Result<()> {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        store.insert(b"hash", &record(now)).await?;

        let later = now + TimeDelta::hours(1);
        assert!(store.touch(b"hash", later).await?);
        assert_eq!(
            store.get(b"hash").await?.map(|r| r.expires_at),
            Some(later)
        );

        assert!(store.delete(b"hash").await?);
        assert!(!store.delete(b"hash").await?);
        assert!(!store.touch(b"hash", later).await?);
        assert!(store.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn purge_removes_only_expired() -> Result<()> {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        store.insert(b"old", &record(now - TimeDelta::seconds(1))).await?;
        store.insert(b"edge", &record(now)).await?;
        store.insert(b"live", &record(now + TimeDelta::hours(1))).await?;

        assert_eq!(store.count_active(now).await?, 1);
        assert_eq!(store.purge_expired(now).await?, 2);
        assert!(store.get(b"live").await?.is_some());
        assert!(store.get(b"old").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn user_lookup_is_exact() -> Result<()> {
        let users = MemoryUserStore::new();
        users
            .insert(User {
                id: 1,
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: String::new(),
            })
            .await;
        assert!(users.find_by_username("admin").await?.is_some());
        assert!(users.find_by_username("Admin").await?.is_none());
        assert!(users.find_by_username("admin ").await?.is_none());
        Ok(())
    }
}
