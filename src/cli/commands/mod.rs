pub mod database;
pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};
use std::net::IpAddr;

pub const ARG_PORT: &str = "port";
pub const ARG_LISTEN: &str = "listen";
pub const ARG_DISABLE_METRICS: &str = "disable-metrics";
pub const CMD_HASH_PASSWORD: &str = "hash-password";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("portal")
        .about("Session-based login portal")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("PORTAL_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_LISTEN)
                .long(ARG_LISTEN)
                .help("Address to bind, IPv4 or IPv6")
                .default_value("::")
                .env("PORTAL_LISTEN")
                .value_parser(clap::value_parser!(IpAddr)),
        )
        .arg(
            Arg::new(ARG_DISABLE_METRICS)
                .long(ARG_DISABLE_METRICS)
                .help("Do not collect or serve Prometheus metrics")
                .env("PORTAL_DISABLE_METRICS")
                .action(ArgAction::SetTrue)
                .value_parser(clap::builder::FalseyValueParser::new()),
        )
        .subcommand(
            Command::new(CMD_HASH_PASSWORD)
                .about("Print an Argon2id hash for the users.password_hash column")
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .help("Password to hash; read from stdin when omitted"),
                ),
        );

    let command = database::with_args(command);
    let command = session::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV: [&str; 4] = [
        "PORTAL_PORT",
        "PORTAL_LISTEN",
        "PORTAL_DISABLE_METRICS",
        "PORTAL_LOG_LEVEL",
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "portal");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Session-based login portal".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_port_and_listen() {
        temp_env::with_vars_unset(ENV, || {
            let matches = new().get_matches_from(vec!["portal", "--port", "9090", "--listen", "127.0.0.1"]);
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
            assert_eq!(
                matches.get_one::<IpAddr>(ARG_LISTEN).map(ToString::to_string),
                Some("127.0.0.1".to_string())
            );
            assert!(!matches.get_flag(ARG_DISABLE_METRICS));
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORTAL_PORT", Some("443")),
                ("PORTAL_LISTEN", Some("0.0.0.0")),
                ("PORTAL_DISABLE_METRICS", Some("true")),
                ("PORTAL_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["portal"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<IpAddr>(ARG_LISTEN).map(ToString::to_string),
                    Some("0.0.0.0".to_string())
                );
                assert!(matches.get_flag(ARG_DISABLE_METRICS));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, level) in (0u8..).zip(levels) {
            temp_env::with_vars([("PORTAL_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["portal"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for count in 1u8..=4 {
            temp_env::with_vars([("PORTAL_LOG_LEVEL", None::<String>)], || {
                let flag = format!("-{}", "v".repeat(usize::from(count)));
                let matches = new().get_matches_from(vec!["portal".to_string(), flag]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(count)
                );
            });
        }
    }

    #[test]
    fn test_hash_password_subcommand() {
        let matches = new().get_matches_from(vec!["portal", "hash-password", "s3cret"]);
        let sub = matches.subcommand_matches(CMD_HASH_PASSWORD);
        assert_eq!(
            sub.and_then(|m| m.get_one::<String>(ARG_PASSWORD)).map(String::as_str),
            Some("s3cret")
        );
    }
}
