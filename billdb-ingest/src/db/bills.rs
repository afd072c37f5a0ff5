//! Bill row upsert
//!
//! One row per BillKey, written immediately per document (not buffered).
//! The conflict clause updates chamber unconditionally and coalesces every
//! other field (incoming non-null wins, existing values survive incoming
//! nulls), so bill metadata grows monotonically more complete across
//! re-ingestion of overlapping document sets.

use anyhow::Result;
use sqlx::SqliteConnection;

use billdb_common::db::models::BillRecord;

pub async fn upsert_bill(conn: &mut SqliteConnection, bill: &BillRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO bills
          (congress, bill_type, bill_number, chamber, title, introduced_date,
           latest_action, latest_action_date, sponsor_bioguide, sponsor_fullname)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (congress, bill_type, bill_number) DO UPDATE SET
          chamber            = excluded.chamber,
          title              = COALESCE(excluded.title, bills.title),
          introduced_date    = COALESCE(excluded.introduced_date, bills.introduced_date),
          latest_action      = COALESCE(excluded.latest_action, bills.latest_action),
          latest_action_date = COALESCE(excluded.latest_action_date, bills.latest_action_date),
          sponsor_bioguide   = COALESCE(excluded.sponsor_bioguide, bills.sponsor_bioguide),
          sponsor_fullname   = COALESCE(excluded.sponsor_fullname, bills.sponsor_fullname)
        "#,
    )
    .bind(bill.key.congress)
    .bind(&bill.key.bill_type)
    .bind(bill.key.bill_number)
    .bind(bill.key.chamber())
    .bind(&bill.title)
    .bind(bill.introduced_date)
    .bind(&bill.latest_action)
    .bind(bill.latest_action_date)
    .bind(&bill.sponsor_bioguide)
    .bind(&bill.sponsor_fullname)
    .execute(conn)
    .await?;

    Ok(())
}
