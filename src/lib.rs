//! # Portal (Session Authentication Gate)
//!
//! `portal` is a small session-based login portal: a JSON login endpoint backed
//! by a relational `users` table, a cookie session, a protected dashboard page
//! and health/metrics endpoints.
//!
//! ## Authentication
//!
//! Passwords are stored as Argon2id PHC strings and verified in constant time.
//! Unknown usernames and wrong passwords are indistinguishable to the client;
//! internal events still tell them apart for observability.
//!
//! ## Sessions
//!
//! Every successful login mints a fresh random token (the token presented with
//! the request, if any, is revoked first). Only the SHA-256 of the token reaches
//! the session store. Sessions use a rolling expiry: each successful resolve
//! pushes the expiry to `now + ttl`.
//!
//! ## Observability
//!
//! The gate publishes [`auth::AuthEvent`]s to an [`auth::AuthObserver`]. The
//! [`metrics::Metrics`] observer turns them into Prometheus series; the gate
//! itself never depends on the metrics library.

pub mod api;
pub mod auth;
pub mod cli;
pub mod metrics;
pub mod secrets;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
