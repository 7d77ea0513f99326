//! Background purge of expired sessions.

use super::handlers::auth::AuthState;
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error};

/// Expired sessions are already invisible to `resolve`; this reclaims their
/// rows and keeps the active-session gauge honest.
pub fn spawn_session_sweeper(auth: Arc<AuthState>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            sleep(every).await;

            match auth.gate().sessions().purge_expired().await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "Purged expired sessions"),
                Err(err) => error!("session purge failed: {err:#}"),
            }
        }
    })
}
