// src/db.rs - Connection pool and schema setup

use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use crate::config::DatabaseConfig;

pub async fn create_database_pool(db_config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&db_config.url)
        .with_context(|| format!("Invalid database url: {}", db_config.url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to database: {}", db_config.url))?;

    Ok(pool)
}

/// Creates every table idempotently. Documents never reference each other through
/// SQL foreign keys, so deleting a warehouse or product leaves dangling ids behind;
/// only line items are owned by (and cascade with) their receipt or delivery.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS warehouses (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0),
            short_code TEXT NOT NULL UNIQUE CHECK(length(short_code) > 0),
            address TEXT NOT NULL CHECK(length(address) > 0),
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0),
            short_code TEXT NOT NULL CHECK(length(short_code) > 0),
            warehouse_id TEXT NOT NULL,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_locations_warehouse ON locations(warehouse_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0),
            sku TEXT NOT NULL UNIQUE CHECK(length(sku) > 0),
            category TEXT NOT NULL CHECK(length(category) > 0),
            unit_of_measure TEXT NOT NULL CHECK(length(unit_of_measure) > 0),
            per_unit_cost REAL NOT NULL,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stocks (
            id TEXT PRIMARY KEY,
            product TEXT NOT NULL CHECK(length(product) > 0),
            per_unit_cost REAL NOT NULL,
            on_hand REAL NOT NULL DEFAULT 0,
            free_to_use REAL NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS receipts (
            id TEXT PRIMARY KEY,
            reference TEXT NOT NULL UNIQUE,
            from_party TEXT NOT NULL DEFAULT 'vendor',
            to_warehouse_id TEXT,
            contact TEXT NOT NULL CHECK(length(contact) > 0),
            scheduled_date DATETIME NOT NULL,
            status TEXT NOT NULL DEFAULT 'Draft' CHECK(
                status IN ('Draft', 'Waiting', 'Ready', 'Done', 'Cancelled')
            ),
            source_doc TEXT,
            responsible_person TEXT,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS receipt_lines (
            document_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            product_id TEXT,
            quantity REAL NOT NULL,
            PRIMARY KEY (document_id, position),
            FOREIGN KEY (document_id) REFERENCES receipts (id) ON DELETE CASCADE
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deliveries (
            id TEXT PRIMARY KEY,
            reference TEXT NOT NULL UNIQUE,
            from_warehouse_id TEXT,
            to_party TEXT NOT NULL DEFAULT 'customer',
            contact TEXT NOT NULL CHECK(length(contact) > 0),
            scheduled_date DATETIME NOT NULL,
            status TEXT NOT NULL DEFAULT 'Draft' CHECK(
                status IN ('Draft', 'Waiting', 'Ready', 'Done', 'Cancelled')
            ),
            delivery_address TEXT,
            responsible_person TEXT,
            operation_type TEXT,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS delivery_lines (
            document_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            product_id TEXT,
            quantity REAL NOT NULL,
            PRIMARY KEY (document_id, position),
            FOREIGN KEY (document_id) REFERENCES deliveries (id) ON DELETE CASCADE
        )
        "#,
    )
        .execute(pool)
        .await?;

    log::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);

    // One connection: every pooled connection to :memory: would be a separate database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory pool");

    run_migrations(&pool).await.expect("migrations");
    pool
}

/// File-backed pool in `dir`, for tests that need several real connections.
#[cfg(test)]
pub async fn test_file_pool(dir: &std::path::Path, max_connections: u32) -> SqlitePool {
    let config = DatabaseConfig {
        url: format!("sqlite:{}", dir.join("warehouse.db").display()),
        max_connections,
        min_connections: 1,
        connect_timeout: 5,
    };

    let pool = create_database_pool(&config).await.expect("file pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}
