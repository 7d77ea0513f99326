//! Postgres-backed stores (`users` and `user_sessions`, see `sql/schema.sql`).

use super::{SessionRecord, SessionStore, UserStore};
use crate::auth::{Identity, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Connection, PgPool, Row};
use tracing::{info_span, Instrument, Span};

fn query_span(operation: &'static str, statement: &'static str) -> Span {
    info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = "SELECT id, username, email, password_hash FROM users WHERE username = $1";
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup user")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn ping(&self) -> Result<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("failed to acquire database connection")?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("failed to ping database")
    }
}

#[derive(Clone, Debug)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, token_hash: &[u8], record: &SessionRecord) -> Result<bool> {
        let query = r"
            INSERT INTO user_sessions
                (session_hash, user_id, username, email, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
        ";
        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(record.identity.user_id)
            .bind(&record.identity.username)
            .bind(&record.identity.email)
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .instrument(query_span("INSERT", query))
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err).context("failed to insert session"),
        }
    }

    async fn get(&self, token_hash: &[u8]) -> Result<Option<SessionRecord>> {
        let query = r"
            SELECT user_id, username, email, created_at, expires_at
            FROM user_sessions
            WHERE session_hash = $1
        ";
        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup session")?;

        Ok(row.map(|row| SessionRecord {
            identity: Identity {
                user_id: row.get("user_id"),
                username: row.get("username"),
                email: row.get("email"),
            },
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }))
    }

    async fn touch(&self, token_hash: &[u8], expires_at: DateTime<Utc>) -> Result<bool> {
        let query = "UPDATE user_sessions SET expires_at = $2 WHERE session_hash = $1";
        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(expires_at)
            .execute(&self.pool)
            .instrument(query_span("UPDATE", query))
            .await
            .context("failed to extend session")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, token_hash: &[u8]) -> Result<bool> {
        // Logout is idempotent; it's fine if no rows are deleted.
        let query = "DELETE FROM user_sessions WHERE session_hash = $1";
        let result = sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to delete session")?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let query = "DELETE FROM user_sessions WHERE expires_at <= $1";
        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to purge expired sessions")?;
        Ok(result.rows_affected())
    }

    async fn count_active(&self, now: DateTime<Utc>) -> Result<u64> {
        let query = "SELECT COUNT(*) AS active FROM user_sessions WHERE expires_at > $1";
        let row = sqlx::query(query)
            .bind(now)
            .fetch_one(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to count sessions")?;
        let active: i64 = row.get("active");
        Ok(u64::try_from(active).unwrap_or_default())
    }
}
