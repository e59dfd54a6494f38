//! Client configuration.

use std::time::Duration;

/// Default catalog API endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Header the anti-forgery token is echoed in.
pub const DEFAULT_XSRF_HEADER: &str = "x-xsrf-token";

/// Cookie the server issues the anti-forgery token in.
pub const DEFAULT_XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Transport conventions applied to every request a [`FetchClient`] sends.
///
/// [`FetchClient`]: crate::FetchClient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prepended to relative request paths.
    pub base_url: String,
    /// Keep a cookie store and send its cookies with every request.
    pub with_credentials: bool,
    /// Cookie holding the server-issued anti-forgery token.
    pub xsrf_cookie_name: String,
    /// Header the token is echoed in.
    pub xsrf_header_name: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            with_credentials: true,
            xsrf_cookie_name: DEFAULT_XSRF_COOKIE.to_string(),
            xsrf_header_name: DEFAULT_XSRF_HEADER.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Default conventions against a different endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    pub fn with_xsrf(mut self, cookie_name: impl Into<String>, header_name: impl Into<String>) -> Self {
        self.xsrf_cookie_name = cookie_name.into();
        self.xsrf_header_name = header_name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
