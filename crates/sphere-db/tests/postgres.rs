//! Round trips against a live PostgreSQL server.
//!
//! Skipped unless `DATABASE_URL` points at a server that accepts plain TCP.

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use sphere_db::{params, Db, DbConfig, DbError, DATABASE_URL_ENV};

async fn connect() -> Option<Db> {
    if std::env::var(DATABASE_URL_ENV).is_err() {
        eprintln!("{} not set, skipping", DATABASE_URL_ENV);
        return None;
    }
    let config = DbConfig::from_env().unwrap();
    Some(Db::connect(&config).await.unwrap())
}

#[derive(Debug, Deserialize, PartialEq)]
struct ProductRow {
    id: i64,
    name: String,
    price_cents: i64,
    sizes: Vec<String>,
    created_at: chrono::DateTime<Utc>,
}

#[tokio::test]
async fn test_typed_queries() {
    let Some(db) = connect().await else {
        return;
    };

    db.execute(
        "CREATE TEMP TABLE sphere_products (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            price_cents BIGINT NOT NULL,
            sizes TEXT[] NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )",
        params![],
    )
    .await
    .unwrap();

    let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let inserted = db
        .execute(
            "INSERT INTO sphere_products VALUES ($1, $2, $3, $4, $5), ($6, $7, $8, $9, $10)",
            params![
                1i64,
                "Runner",
                4999i64,
                vec!["M".to_string(), "L".to_string()],
                created,
                2i64,
                "Loafer",
                7450i64,
                vec!["S".to_string()],
                created
            ],
        )
        .await
        .unwrap();
    assert_eq!(inserted, 2);

    let rows: Vec<ProductRow> = db
        .query_as(
            "SELECT * FROM sphere_products WHERE sizes && $1::text[] ORDER BY price_cents",
            params![vec!["L".to_string()]],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Runner");
    assert_eq!(rows[0].created_at, created);

    #[derive(Deserialize)]
    struct Count {
        total: i64,
    }
    let count: Count = db
        .query_one("SELECT COUNT(*) AS total FROM sphere_products", params![])
        .await
        .unwrap();
    assert_eq!(count.total, 2);

    let missing: Option<ProductRow> = db
        .query_optional("SELECT * FROM sphere_products WHERE id = $1", params![99i64])
        .await
        .unwrap();
    assert!(missing.is_none());

    let err = db
        .query_one::<ProductRow>("SELECT * FROM sphere_products WHERE id = $1", params![99i64])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_bad_sql_is_query_error() {
    let Some(db) = connect().await else {
        return;
    };
    let err = db.query("SELEKT 1", params![]).await.unwrap_err();
    assert!(matches!(err, DbError::QueryError(_)));
    db.close().await.unwrap();
}
