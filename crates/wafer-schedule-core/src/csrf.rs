//! CSRF token handling for mutating requests.

/// Value of cookie `name` from a `document.cookie` style string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| {
            urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
}

/// Methods that do not need CSRF protection.
pub fn is_csrf_safe_method(method: &str) -> bool {
    matches!(method, "GET" | "HEAD" | "OPTIONS" | "TRACE")
}

/// Token-injection policy, built once at startup and shared with the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfPolicy {
    header: String,
    token: Option<String>,
}

impl CsrfPolicy {
    pub fn new(header: impl Into<String>, token: Option<String>) -> Self {
        Self {
            header: header.into(),
            token,
        }
    }

    /// Read the token from a cookie string.
    pub fn from_cookies(header: impl Into<String>, cookies: &str, cookie_name: &str) -> Self {
        let token = cookie_value(cookies, cookie_name);
        if token.is_none() {
            tracing::warn!(cookie = cookie_name, "no CSRF cookie; mutating requests will be rejected");
        }
        Self::new(header, token)
    }

    /// Extra headers for a request with `method`.
    ///
    /// Safe methods get none; everything else gets the token (when known)
    /// and a JSON content type.
    pub fn headers_for(&self, method: &str) -> Vec<(&str, &str)> {
        if is_csrf_safe_method(method) {
            return Vec::new();
        }
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = &self.token {
            headers.push((self.header.as_str(), token.as_str()));
        }
        headers.push(("Content-Type", "application/json"));
        headers
    }
}
