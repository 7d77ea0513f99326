use crate::{
    api::{self, AuthState, ServerConfig, Services, SessionCookie},
    auth::{
        store::{MemorySessionStore, PgSessionStore, PgUserStore},
        AuthObserver, CredentialVerifier, Gate, NoopObserver, SessionManager, SessionStore,
        SystemClock, UserStore,
    },
    cli::commands::{database, session, session::SessionBackend},
    metrics::Metrics,
    secrets::DatabaseSecrets,
};
use anyhow::{Context, Result};
use chrono::TimeDelta;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::{net::IpAddr, sync::Arc, time::Duration};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub listen: IpAddr,
    pub database: database::Options,
    pub session: session::Options,
    pub disable_metrics: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the secrets cannot be read, the database is unreachable
/// or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let secrets = DatabaseSecrets::load(&args.database.secrets)?;
    let dsn = secrets.dsn(args.database.port)?;

    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(args.database.max_connections)
        .max_lifetime(Duration::from_secs(60 * 30))
        .test_before_acquire(true)
        .connect(dsn.expose_secret())
        .await
        .context("Failed to connect to database")?;

    info!(host = %secrets.host, database = %secrets.name, "Connected to database");

    let metrics = (!args.disable_metrics).then(|| Arc::new(Metrics::new()));
    let observer: Arc<dyn AuthObserver> = match &metrics {
        Some(metrics) => metrics.clone(),
        None => Arc::new(NoopObserver),
    };

    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let sessions: Arc<dyn SessionStore> = match args.session.backend {
        SessionBackend::Postgres => Arc::new(PgSessionStore::new(pool.clone())),
        SessionBackend::Memory => {
            warn!("Sessions are kept in memory and will not survive a restart");
            Arc::new(MemorySessionStore::new())
        }
    };

    let gate = Gate::new(
        CredentialVerifier::new(users.clone(), observer.clone()),
        SessionManager::new(sessions, Arc::new(SystemClock), observer.clone())
            .with_ttl(TimeDelta::seconds(args.session.ttl_seconds)),
        observer,
    );
    let cookie = SessionCookie::new(args.session.cookie_name, args.session.ttl_seconds)
        .with_secure(args.session.secure_cookies);

    let services = Services {
        auth: Arc::new(AuthState::new(gate, cookie)),
        users,
        metrics,
    };
    let config = ServerConfig {
        listen: args.listen,
        port: args.port,
        purge_interval: Duration::from_secs(args.session.purge_seconds),
    };

    let result = api::new(config, services).await;

    pool.close().await;

    result
}
