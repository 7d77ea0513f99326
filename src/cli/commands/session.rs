use crate::{
    api::handlers::auth::{valid_cookie_name, DEFAULT_SESSION_COOKIE_NAME},
    auth::MAX_SESSION_TTL_SECONDS,
};
use anyhow::{anyhow, Context, Result};
use clap::{builder::FalseyValueParser, builder::ValueParser, Arg, ArgAction, ArgMatches, Command};

pub const ARG_COOKIE_NAME: &str = "session-cookie-name";
pub const ARG_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_STORE: &str = "session-store";
pub const ARG_PURGE_SECONDS: &str = "session-purge-seconds";
pub const ARG_SECURE_COOKIES: &str = "secure-cookies";

/// Where sessions live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Postgres,
    /// Process-local; sessions are lost on restart.
    Memory,
}

impl std::str::FromStr for SessionBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown session store: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub cookie_name: String,
    pub ttl_seconds: i64,
    pub backend: SessionBackend,
    pub purge_seconds: u64,
    pub secure_cookies: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if a defaulted argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            cookie_name: matches
                .get_one::<String>(ARG_COOKIE_NAME)
                .cloned()
                .context("missing required argument: --session-cookie-name")?,
            ttl_seconds: matches
                .get_one::<i64>(ARG_TTL_SECONDS)
                .copied()
                .context("missing required argument: --session-ttl-seconds")?,
            backend: matches
                .get_one::<String>(ARG_STORE)
                .context("missing required argument: --session-store")?
                .parse()?,
            purge_seconds: matches
                .get_one::<u64>(ARG_PURGE_SECONDS)
                .copied()
                .context("missing required argument: --session-purge-seconds")?,
            secure_cookies: matches.get_flag(ARG_SECURE_COOKIES),
        })
    }
}

fn validator_cookie_name() -> ValueParser {
    ValueParser::from(move |name: &str| -> std::result::Result<String, String> {
        if valid_cookie_name(name) {
            Ok(name.to_string())
        } else {
            Err("cookie names may only contain letters, digits, '-', '_' and '.'".to_string())
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_NAME)
                .long(ARG_COOKIE_NAME)
                .help("Name of the session cookie")
                .env("PORTAL_SESSION_COOKIE_NAME")
                .default_value(DEFAULT_SESSION_COOKIE_NAME)
                .value_parser(validator_cookie_name()),
        )
        .arg(
            Arg::new(ARG_TTL_SECONDS)
                .long(ARG_TTL_SECONDS)
                .help("Idle lifetime of a session in seconds, extended on every request")
                .env("PORTAL_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_SECONDS)),
        )
        .arg(
            Arg::new(ARG_STORE)
                .long(ARG_STORE)
                .help("Session storage backend")
                .env("PORTAL_SESSION_STORE")
                .default_value("postgres")
                .value_parser(["postgres", "memory"]),
        )
        .arg(
            Arg::new(ARG_PURGE_SECONDS)
                .long(ARG_PURGE_SECONDS)
                .help("Interval between expired-session purges in seconds")
                .env("PORTAL_SESSION_PURGE_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_SECURE_COOKIES)
                .long(ARG_SECURE_COOKIES)
                .help("Mark the session cookie Secure (serve behind HTTPS)")
                .env("PORTAL_SECURE_COOKIES")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("portal"))
    }

    const ENV: [&str; 5] = [
        "PORTAL_SESSION_COOKIE_NAME",
        "PORTAL_SESSION_TTL_SECONDS",
        "PORTAL_SESSION_STORE",
        "PORTAL_SESSION_PURGE_SECONDS",
        "PORTAL_SECURE_COOKIES",
    ];

    #[test]
    fn defaults() -> Result<()> {
        temp_env::with_vars_unset(ENV, || {
            let matches = command().get_matches_from(vec!["portal"]);
            let options = Options::parse(&matches)?;
            assert_eq!(
                options,
                Options {
                    cookie_name: "sessionId".to_string(),
                    ttl_seconds: 86_400,
                    backend: SessionBackend::Postgres,
                    purge_seconds: 300,
                    secure_cookies: false,
                }
            );
            Ok(())
        })
    }

    #[test]
    fn from_env() -> Result<()> {
        temp_env::with_vars(
            [
                ("PORTAL_SESSION_COOKIE_NAME", Some("portal_sid")),
                ("PORTAL_SESSION_TTL_SECONDS", Some("3600")),
                ("PORTAL_SESSION_STORE", Some("memory")),
                ("PORTAL_SESSION_PURGE_SECONDS", Some("60")),
                ("PORTAL_SECURE_COOKIES", Some("true")),
            ],
            || {
                let matches = command().get_matches_from(vec!["portal"]);
                let options = Options::parse(&matches)?;
                assert_eq!(options.cookie_name, "portal_sid");
                assert_eq!(options.ttl_seconds, 3600);
                assert_eq!(options.backend, SessionBackend::Memory);
                assert_eq!(options.purge_seconds, 60);
                assert!(options.secure_cookies);
                Ok(())
            },
        )
    }

    #[test]
    fn secure_cookies_env_false() -> Result<()> {
        temp_env::with_vars([("PORTAL_SECURE_COOKIES", Some("false"))], || {
            let matches = command().get_matches_from(vec!["portal"]);
            assert!(!Options::parse(&matches)?.secure_cookies);
            Ok(())
        })
    }

    #[test]
    fn ttl_upper_bound_is_inclusive() -> Result<()> {
        temp_env::with_vars_unset(ENV, || {
            let max = MAX_SESSION_TTL_SECONDS.to_string();
            let matches =
                command().get_matches_from(vec!["portal", "--session-ttl-seconds", max.as_str()]);
            assert_eq!(Options::parse(&matches)?.ttl_seconds, MAX_SESSION_TTL_SECONDS);
            Ok(())
        })
    }

    #[test]
    fn rejects_bad_values() {
        temp_env::with_vars_unset(ENV, || {
            for args in [
                vec!["portal", "--session-cookie-name", "bad name"],
                vec!["portal", "--session-ttl-seconds", "0"],
                vec!["portal", "--session-ttl-seconds", "9000000000000"],
                vec!["portal", "--session-store", "redis"],
                vec!["portal", "--session-purge-seconds", "0"],
            ] {
                assert!(command().try_get_matches_from(args).is_err());
            }
        });
    }
}
