//! Bulk cosponsor upserts
//!
//! One row per (bill key, bioguide). On conflict every field coalesces
//! against existing storage (a later run can fill gaps but never erases a
//! known value), and the original-cosponsor flag is OR-promoted: once a
//! run has recorded true, no later observation demotes it.
//!
//! Callers must reduce the batch to one row per key first
//! (`services::cosponsor_merger`); a multi-row upsert that hits the same
//! key twice in one statement has no well-defined merge order.

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use billdb_common::db::models::CosponsorRecord;

pub async fn bulk_upsert(
    conn: &mut SqliteConnection,
    rows: &[CosponsorRecord],
    page_size: usize,
) -> Result<()> {
    for chunk in rows.chunks(page_size.max(1)) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO bill_cosponsors \
             (congress, bill_type, bill_number, bioguide, fullname, party, \
              state, joined_date, is_original) ",
        );

        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.key.congress)
                .push_bind(row.key.bill_type.as_str())
                .push_bind(row.key.bill_number)
                .push_bind(row.bioguide.as_str())
                .push_bind(row.fullname.as_deref())
                .push_bind(row.party.as_deref())
                .push_bind(row.state.as_deref())
                .push_bind(row.joined_date)
                .push_bind(row.is_original);
        });

        // MAX() is null when either side is null, so the COALESCE chain
        // falls back to whichever side is present.
        builder.push(
            " ON CONFLICT (congress, bill_type, bill_number, bioguide) DO UPDATE SET \
             fullname    = COALESCE(excluded.fullname, bill_cosponsors.fullname), \
             party       = COALESCE(excluded.party, bill_cosponsors.party), \
             state       = COALESCE(excluded.state, bill_cosponsors.state), \
             joined_date = COALESCE(excluded.joined_date, bill_cosponsors.joined_date), \
             is_original = COALESCE(MAX(excluded.is_original, bill_cosponsors.is_original), \
                                    excluded.is_original, bill_cosponsors.is_original)",
        );

        builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}
