//! The session cookie: building, clearing and reading it back.

use axum::http::{
    header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "sessionId";

/// Cookie names are RFC 6265 tokens; keep to a conservative subset.
#[must_use]
pub fn valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[derive(Clone, Debug)]
pub struct SessionCookie {
    name: String,
    max_age_seconds: i64,
    secure: bool,
}

impl SessionCookie {
    #[must_use]
    pub fn new(name: String, max_age_seconds: i64) -> Self {
        Self {
            name,
            max_age_seconds,
            secure: false,
        }
    }

    /// `Secure` is only added when explicitly enabled; it is never inferred
    /// from request headers.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// `Set-Cookie` value carrying a freshly issued or refreshed token.
    pub fn issue(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(token, self.max_age_seconds)
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    pub fn clear(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: i64) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// Session token from `Authorization: Bearer` or the session cookie.
    #[must_use]
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(token) = extract_bearer_token(headers) {
            return Some(token);
        }
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| key.trim() == self.name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
