//! HTML pages served to browsers.

use crate::auth::Identity;

const LOGIN_TEMPLATE: &str = include_str!("../../templates/login.html");
const DASHBOARD_TEMPLATE: &str = include_str!("../../templates/dashboard.html");

#[must_use]
pub fn login_page() -> &'static str {
    LOGIN_TEMPLATE
}

#[must_use]
pub fn dashboard_page(identity: &Identity) -> String {
    DASHBOARD_TEMPLATE
        .replace("{{username}}", &escape_html(&identity.username))
        .replace("{{email}}", &escape_html(&identity.email))
        .replace("{{user_id}}", &identity.user_id.to_string())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_renders_identity() {
        let page = dashboard_page(&Identity {
            user_id: 12,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
        });
        assert!(page.contains("Welcome, admin"));
        assert!(page.contains("admin@example.com"));
        assert!(page.contains("<dd>12</dd>"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn dashboard_escapes_markup() {
        let page = dashboard_page(&Identity {
            user_id: 1,
            username: "<script>alert(1)</script>".to_string(),
            email: "a&b@example.com".to_string(),
        });
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("a&amp;b@example.com"));
    }

    #[test]
    fn login_page_posts_to_login() {
        assert!(login_page().contains("action=\"/login\""));
    }
}
