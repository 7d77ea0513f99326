use crate::cli::{
    actions::{hash_password, server, Action},
    telemetry,
};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::Server(args) => server::execute(args).await,
        Action::HashPassword(args) => hash_password::execute(args),
    };

    telemetry::shutdown_tracer();

    result
}
