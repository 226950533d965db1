use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Creates a SQLite connection pool and bootstraps the schema.
///
/// The database file is created when missing; schema statements are all
/// `IF NOT EXISTS` so startup is idempotent.
pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(include_str!("schema.sql")).execute(&pool).await?;

    tracing::info!(url = %database_url, "Database initialized");

    Ok(pool)
}
