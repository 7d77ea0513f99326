//! Map validated CLI arguments to an [`Action`].

use crate::cli::actions::{hash_password, server, Action};
use crate::cli::commands::{
    database, session, ARG_DISABLE_METRICS, ARG_LISTEN, ARG_PASSWORD, ARG_PORT,
    CMD_HASH_PASSWORD,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::net::IpAddr;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub) = matches.subcommand_matches(CMD_HASH_PASSWORD) {
        return Ok(Action::HashPassword(hash_password::Args {
            password: sub
                .get_one::<String>(ARG_PASSWORD)
                .map(|password| SecretString::from(password.clone())),
        }));
    }

    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let listen = matches
        .get_one::<IpAddr>(ARG_LISTEN)
        .copied()
        .context("missing required argument: --listen")?;

    Ok(Action::Server(server::Args {
        port,
        listen,
        database: database::Options::parse(matches)?,
        session: session::Options::parse(matches)?,
        disable_metrics: matches.get_flag(ARG_DISABLE_METRICS),
    }))
}
