//! HTTP client for the ShopSphere catalog API.
//!
//! Every request resolves against one base URL, carries the session cookies
//! the server has set, and echoes the anti-forgery cookie back as a header.
//!
//! # Example
//!
//! ```rust,ignore
//! use sphere_data::{ClientConfig, FetchClient};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Category {
//!     id: i64,
//!     name: String,
//! }
//!
//! let client = FetchClient::new(ClientConfig::default())?;
//!
//! let categories: Vec<Category> = client
//!     .get("/api/categories")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod config;
mod error;
mod request;
mod response;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_XSRF_COOKIE, DEFAULT_XSRF_HEADER};
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// HTTP client bound to one API endpoint.
///
/// Cheap to clone; clones share the connection pool and the cookie store.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    config: ClientConfig,
    cookies: Option<Arc<Jar>>,
    default_headers: HashMap<String, String>,
}

impl FetchClient {
    /// Create a client with the given transport conventions.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        let cookies = if config.with_credentials {
            let jar = Arc::new(Jar::default());
            builder = builder.cookie_provider(jar.clone());
            Some(jar)
        } else {
            None
        };
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        debug!(
            base_url = %config.base_url,
            with_credentials = config.with_credentials,
            "http client ready"
        );

        Ok(Self {
            http,
            config,
            cookies,
            default_headers: HashMap::new(),
        })
    }

    /// Add a header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Store a cookie as if the server at `url` had set it.
    ///
    /// Ignored when credentials are disabled.
    pub fn add_cookie(&self, cookie: &str, url: &str) -> Result<(), FetchError> {
        if let Some(jar) = &self.cookies {
            let url = self.resolve(url)?;
            jar.add_cookie_str(cookie, &url);
        }
        Ok(())
    }

    /// The anti-forgery token the server issued for `url`, if any.
    pub fn xsrf_token_for(&self, url: &Url) -> Option<String> {
        let jar = self.cookies.as_ref()?;
        let header = jar.cookies(url)?;
        let header = header.to_str().ok()?;
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.config.xsrf_cookie_name)
            .map(|(_, value)| value.to_string())
    }

    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Put, url)
    }

    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Patch, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Delete, url)
    }

    /// Create a request with an explicit method.
    ///
    /// Relative paths are joined onto the base URL; absolute URLs pass through.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let mut builder = RequestBuilder::new(method, url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }

    fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        let full = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.config.base_url.trim_end_matches('/'), url)
        } else {
            format!("{}/{}", self.config.base_url.trim_end_matches('/'), url)
        };

        Url::parse(&full).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", full, e)))
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl<'a> ClientRequestBuilder<'a> {
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append query parameters, in order.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query(pairs);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.builder = self.builder.text(text);
        self
    }

    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and read the whole response.
    ///
    /// Non-2xx statuses are returned as responses; call
    /// [`Response::error_for_status`] to treat them as errors.
    pub async fn send(self) -> Result<Response, FetchError> {
        let client = self.client;
        let RequestBuilder {
            method,
            url,
            query,
            headers,
            body,
        } = self.builder;

        let url = client.resolve(&url)?;
        let xsrf = client.xsrf_token_for(&url);

        let mut request = client.http.request(method.into(), url.clone());
        if !query.is_empty() {
            request = request.query(&query);
        }
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(token) = &xsrf {
            let already_set = headers
                .keys()
                .any(|k| k.eq_ignore_ascii_case(&client.config.xsrf_header_name));
            if !already_set {
                request = request.header(client.config.xsrf_header_name.as_str(), token.as_str());
            }
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        debug!(
            method = method.as_str(),
            url = %url,
            params = query.len(),
            xsrf = xsrf.is_some(),
            "sending request"
        );

        let response = request.send().await?;
        let response = Response::read(response).await?;

        debug!(status = response.status, bytes = response.body.len(), "response received");
        Ok(response)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ClientConfig, FetchClient, FetchError, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> FetchClient {
        FetchClient::new(ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_resolve_joins_base_url() {
        let c = client("http://localhost:5001/");
        assert_eq!(
            c.resolve("/api/products").unwrap().as_str(),
            "http://localhost:5001/api/products"
        );
        assert_eq!(
            c.resolve("api/categories").unwrap().as_str(),
            "http://localhost:5001/api/categories"
        );
        assert_eq!(
            c.resolve("https://cdn.shop.test/img.png").unwrap().as_str(),
            "https://cdn.shop.test/img.png"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = FetchClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_xsrf_token_from_cookie() {
        let c = client("http://localhost:5001");
        c.add_cookie("session=abc; Path=/", "/").unwrap();
        c.add_cookie("XSRF-TOKEN=tok123; Path=/", "/").unwrap();

        let url = c.resolve("/api/products").unwrap();
        assert_eq!(c.xsrf_token_for(&url).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_no_cookie_store_without_credentials() {
        let c = FetchClient::new(ClientConfig::default().with_credentials(false)).unwrap();
        c.add_cookie("XSRF-TOKEN=tok123; Path=/", "/").unwrap();

        let url = c.resolve("/api/products").unwrap();
        assert_eq!(c.xsrf_token_for(&url), None);
    }
}
