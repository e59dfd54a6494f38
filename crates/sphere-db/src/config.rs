//! Connection settings.

use crate::DbError;
use std::time::Duration;

/// Environment variable holding the connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Settings for the storefront's database connection.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection string, either a `postgres://` URL or `key=value` pairs.
    pub url: String,
    /// Whether to negotiate TLS. The connector is plain TCP, so this must stay off.
    pub ssl: bool,
    /// Reported to the server as `application_name`.
    pub application_name: Option<String>,
    /// Give up connecting after this long.
    pub connect_timeout: Option<Duration>,
}

impl DbConfig {
    /// Create settings for a connection string.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ssl: false,
            application_name: Some("shopsphere".to_string()),
            connect_timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Read the connection string from `DATABASE_URL`.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_env_var(DATABASE_URL_ENV)
    }

    /// Read the connection string from the named environment variable.
    pub fn from_env_var(name: &str) -> Result<Self, DbError> {
        let url = std::env::var(name)
            .map_err(|_| DbError::ConfigError(format!("{} is not set", name)))?;
        if url.trim().is_empty() {
            return Err(DbError::ConfigError(format!("{} is empty", name)));
        }
        Ok(Self::new(url))
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Parse into driver settings.
    pub(crate) fn to_pg_config(&self) -> Result<tokio_postgres::Config, DbError> {
        if self.ssl {
            return Err(DbError::ConfigError(
                "TLS connections are not supported; set ssl = false".to_string(),
            ));
        }

        let mut pg: tokio_postgres::Config = self
            .url
            .parse()
            .map_err(|e: tokio_postgres::Error| DbError::ConfigError(e.to_string()))?;

        pg.ssl_mode(tokio_postgres::config::SslMode::Disable);
        if let Some(name) = &self.application_name {
            pg.application_name(name);
        }
        if let Some(timeout) = self.connect_timeout {
            pg.connect_timeout(timeout);
        }
        Ok(pg)
    }
}
