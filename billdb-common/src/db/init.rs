//! Database initialization
//!
//! Connects to the target store and creates the three billdb relations
//! idempotently. The pool is capped at a single connection: the ingest run
//! owns one open connection/transaction for its whole duration, and the
//! deterministic processing order assumes no concurrent writers.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

/// Connect to the store and ensure the schema exists
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;

    // WAL keeps commits cheap for file-backed stores; a no-op for :memory:
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_bills_table(&pool).await?;
    create_bill_actions_table(&pool).await?;
    create_bill_cosponsors_table(&pool).await?;

    info!("Database schema initialized (bills, bill_actions, bill_cosponsors)");

    Ok(pool)
}

/// One row per bill, keyed by the canonical identity
pub async fn create_bills_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bills (
            congress INTEGER NOT NULL,
            bill_type TEXT NOT NULL,
            bill_number INTEGER NOT NULL,
            chamber TEXT,
            title TEXT,
            introduced_date TEXT,
            latest_action TEXT,
            latest_action_date TEXT,
            sponsor_bioguide TEXT,
            sponsor_fullname TEXT,
            PRIMARY KEY (congress, bill_type, bill_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append-only action log; duplicates on the natural key are ignored.
///
/// No foreign key to `bills`: buffered child rows may flush before the
/// owning bill row's first upsert lands.
pub async fn create_bill_actions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bill_actions (
            congress INTEGER NOT NULL,
            bill_type TEXT NOT NULL,
            bill_number INTEGER NOT NULL,
            action_datetime TEXT,
            actor TEXT,
            action_text TEXT,
            action_code TEXT,
            source_path TEXT NOT NULL,
            UNIQUE (congress, bill_type, bill_number, action_datetime, action_text)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// One row per (bill, person)
pub async fn create_bill_cosponsors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bill_cosponsors (
            congress INTEGER NOT NULL,
            bill_type TEXT NOT NULL,
            bill_number INTEGER NOT NULL,
            bioguide TEXT NOT NULL,
            fullname TEXT,
            party TEXT,
            state TEXT,
            joined_date TEXT,
            is_original INTEGER,
            PRIMARY KEY (congress, bill_type, bill_number, bioguide)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
