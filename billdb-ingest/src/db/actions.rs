//! Bulk action inserts
//!
//! `bill_actions` is an append-only log. Rows are written in pages as
//! multi-row statements; a row whose (bill key, datetime, text) already
//! exists is dropped, never merged, and differing actor/code on the
//! duplicate is ignored.

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use billdb_common::db::models::ActionRecord;

pub async fn bulk_insert(
    conn: &mut SqliteConnection,
    rows: &[ActionRecord],
    page_size: usize,
) -> Result<()> {
    for chunk in rows.chunks(page_size.max(1)) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO bill_actions \
             (congress, bill_type, bill_number, action_datetime, actor, \
              action_text, action_code, source_path) ",
        );

        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.key.congress)
                .push_bind(row.key.bill_type.as_str())
                .push_bind(row.key.bill_number)
                .push_bind(row.action_datetime)
                .push_bind(row.actor.as_deref())
                .push_bind(row.action_text.as_deref())
                .push_bind(row.action_code.as_deref())
                .push_bind(row.source_path.as_str());
        });

        builder.push(
            " ON CONFLICT (congress, bill_type, bill_number, action_datetime, action_text) \
             DO NOTHING",
        );

        builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}
