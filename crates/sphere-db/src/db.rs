//! Database connection and query execution.

use crate::{DbConfig, DbError, QueryResult, Row, Value};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};

/// PostgreSQL database connection.
///
/// Opened once with [`Db::connect`] and passed by reference to the code that
/// needs it. The connection's driver task lives as long as the handle;
/// [`Db::close`] shuts both down.
pub struct Db {
    client: Client,
    driver: JoinHandle<()>,
}

impl Db {
    /// Open a connection with the given settings.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Db::connect(&DbConfig::from_env()?).await?;
    /// ```
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let pg = config.to_pg_config()?;
        let (client, connection) = pg
            .connect(NoTls)
            .await
            .map_err(|e| DbError::ConnectError(e.to_string()))?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("database connection error: {}", e);
            }
        });

        info!(
            host = ?pg.get_hosts().first(),
            dbname = pg.get_dbname().unwrap_or_default(),
            "connected to database"
        );

        Ok(Self { client, driver })
    }

    /// Whether the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    /// Close the connection and wait for the driver task to finish.
    pub async fn close(self) -> Result<(), DbError> {
        let Db { client, driver } = self;
        drop(client);
        driver
            .await
            .map_err(|e| DbError::ConnectError(format!("connection task failed: {}", e)))?;
        info!("database connection closed");
        Ok(())
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Returns the number of rows affected.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.execute(
    ///     "INSERT INTO categories (name, slug) VALUES ($1, $2)",
    ///     params!["Shoes", "shoes"]
    /// ).await?;
    /// ```
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        debug!(sql, params = params.len(), "execute");
        let affected = self.client.execute(sql, &param_refs(params)).await?;
        Ok(affected)
    }

    /// Execute a SQL query and return raw results.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = db.query("SELECT * FROM products WHERE price_cents < $1", params![10_000]).await?;
    /// for row in result.iter() {
    ///     let name = row.get("name").and_then(|v| v.as_text());
    ///     println!("Product: {:?}", name);
    /// }
    /// ```
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        debug!(sql, params = params.len(), "query");
        let statement = self.client.prepare(sql).await?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let pg_rows = self.client.query(&statement, &param_refs(params)).await?;
        let rows = pg_rows
            .iter()
            .map(|row| Row::from_pg(&columns, row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult::new(columns, rows))
    }

    /// Execute a SQL query and deserialize results into a vector.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// #[derive(Deserialize)]
    /// struct Category {
    ///     id: i64,
    ///     name: String,
    /// }
    ///
    /// let categories: Vec<Category> = db.query_as(
    ///     "SELECT id, name FROM categories ORDER BY name",
    ///     params![]
    /// ).await?;
    /// ```
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        let result = self.query(sql, params).await?;
        result.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns an error if no rows are returned.
    pub async fn query_one<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<T, DbError> {
        let result = self.query(sql, params).await?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    ///
    /// Returns `None` if no rows are returned.
    pub async fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params).await?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }
}

fn param_refs(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}
