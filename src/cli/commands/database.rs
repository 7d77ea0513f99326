use crate::secrets::SecretPaths;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_SECRETS_DIR: &str = "secrets-dir";
pub const ARG_DB_HOST_FILE: &str = "db-host-file";
pub const ARG_DB_NAME_FILE: &str = "db-name-file";
pub const ARG_DB_USER_FILE: &str = "db-user-file";
pub const ARG_DB_PASSWORD_FILE: &str = "db-password-file";
pub const ARG_DB_PORT: &str = "db-port";
pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub secrets: SecretPaths,
    pub port: u16,
    pub max_connections: u32,
}

impl Options {
    /// Resolve the credential file paths: an explicit `--db-*-file` wins over
    /// the file of the same name under `--secrets-dir`.
    ///
    /// # Errors
    /// Returns an error if a defaulted argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let dir = matches
            .get_one::<String>(ARG_SECRETS_DIR)
            .context("missing required argument: --secrets-dir")?;
        let defaults = SecretPaths::in_dir(dir);
        let pick = |arg: &str, default: String| {
            matches.get_one::<String>(arg).cloned().unwrap_or(default)
        };

        Ok(Self {
            secrets: SecretPaths {
                host: pick(ARG_DB_HOST_FILE, defaults.host),
                name: pick(ARG_DB_NAME_FILE, defaults.name),
                username: pick(ARG_DB_USER_FILE, defaults.username),
                password: pick(ARG_DB_PASSWORD_FILE, defaults.password),
            },
            port: matches
                .get_one::<u16>(ARG_DB_PORT)
                .copied()
                .context("missing required argument: --db-port")?,
            max_connections: matches
                .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
                .copied()
                .context("missing required argument: --db-max-connections")?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SECRETS_DIR)
                .long(ARG_SECRETS_DIR)
                .help("Directory holding DB_HOST, DB_NAME, DB_USER and DB_PASSWORD")
                .env("PORTAL_SECRETS_DIR")
                .default_value("/secrets"),
        )
        .arg(
            Arg::new(ARG_DB_HOST_FILE)
                .long(ARG_DB_HOST_FILE)
                .help("File containing the database host")
                .env("PORTAL_DB_HOST_FILE"),
        )
        .arg(
            Arg::new(ARG_DB_NAME_FILE)
                .long(ARG_DB_NAME_FILE)
                .help("File containing the database name")
                .env("PORTAL_DB_NAME_FILE"),
        )
        .arg(
            Arg::new(ARG_DB_USER_FILE)
                .long(ARG_DB_USER_FILE)
                .help("File containing the database user")
                .env("PORTAL_DB_USER_FILE"),
        )
        .arg(
            Arg::new(ARG_DB_PASSWORD_FILE)
                .long(ARG_DB_PASSWORD_FILE)
                .help("File containing the database password")
                .env("PORTAL_DB_PASSWORD_FILE"),
        )
        .arg(
            Arg::new(ARG_DB_PORT)
                .long(ARG_DB_PORT)
                .help("Database port")
                .env("PORTAL_DB_PORT")
                .default_value("5432")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum database pool size")
                .env("PORTAL_DB_MAX_CONNECTIONS")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
}
