use super::auth::CurrentUser;
use crate::api::pages;
use axum::response::Html;
use tracing::debug;

/// Only reachable through [`super::auth::require_session`].
pub async fn dashboard(CurrentUser(identity): CurrentUser) -> Html<String> {
    debug!(user_id = identity.user_id, "Rendering dashboard");
    Html(pages::dashboard_page(&identity))
}
