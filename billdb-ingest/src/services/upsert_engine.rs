//! Batched upsert engine
//!
//! Accepts extracted documents one at a time and persists them with three
//! different write disciplines:
//!
//! - bill rows are upserted immediately, one statement per document;
//! - action and cosponsor rows accumulate in bounded buffers and are
//!   flushed as paged bulk statements once the combined buffer length
//!   reaches the flush threshold;
//! - every `commit_every_bills` bills the engine flushes and commits a
//!   durability checkpoint, closing the current transaction and opening
//!   the next one.
//!
//! A document's child rows are routed (and the threshold checked) before
//! its bill row is written. The engine owns the run's only transaction;
//! any statement failure propagates to the caller and aborts the run.
//! There is no partial-checkpoint recovery, and buffered rows from the
//! open interval are lost with it.

use anyhow::{Context, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::config::BatchSettings;
use crate::db;
use crate::services::cosponsor_merger;
use crate::services::record_extractor::ExtractedDocument;
use billdb_common::db::models::{ActionRecord, CosponsorRecord};

/// Counters for one engine lifetime
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    pub bills_upserted: u64,
    pub action_rows_flushed: u64,
    pub cosponsor_rows_flushed: u64,
    pub flushes: u64,
    pub checkpoints: u64,
}

pub struct UpsertEngine {
    pool: SqlitePool,
    /// Always `Some` between operations; `None` only transiently while a
    /// checkpoint swaps transactions
    tx: Option<Transaction<'static, Sqlite>>,
    settings: BatchSettings,
    actions: Vec<ActionRecord>,
    cosponsors: Vec<CosponsorRecord>,
    bills_since_checkpoint: usize,
    stats: EngineStats,
}

impl UpsertEngine {
    /// Open the engine's transaction on the (single-connection) pool
    pub async fn begin(pool: SqlitePool, settings: BatchSettings) -> Result<Self> {
        let tx = pool
            .begin()
            .await
            .context("failed to open ingest transaction")?;

        Ok(Self {
            pool,
            tx: Some(tx),
            settings,
            actions: Vec::new(),
            cosponsors: Vec::new(),
            bills_since_checkpoint: 0,
            stats: EngineStats::default(),
        })
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Route one extracted document into the store
    pub async fn ingest(&mut self, doc: ExtractedDocument) -> Result<()> {
        self.actions.extend(doc.actions);
        self.cosponsors.extend(doc.cosponsors);

        if self.actions.len() + self.cosponsors.len() >= self.settings.buffer_flush_rows {
            self.flush().await?;
        }

        let tx = self.transaction()?;
        db::bills::upsert_bill(&mut **tx, &doc.bill).await?;
        self.stats.bills_upserted += 1;
        self.bills_since_checkpoint += 1;

        if self.bills_since_checkpoint >= self.settings.commit_every_bills {
            self.checkpoint().await?;
        }

        Ok(())
    }

    /// Final flush and checkpoint; runs even when nothing was ingested
    pub async fn finish(mut self) -> Result<EngineStats> {
        self.flush().await?;
        if let Some(tx) = self.tx.take() {
            tx.commit().await.context("final commit failed")?;
        }
        self.stats.checkpoints += 1;
        Ok(self.stats)
    }

    /// Drain both buffers into bulk statements
    async fn flush(&mut self) -> Result<()> {
        if self.actions.is_empty() && self.cosponsors.is_empty() {
            return Ok(());
        }

        let page_size = self.settings.bulk_page_size;
        let actions = std::mem::take(&mut self.actions);
        let cosponsors = cosponsor_merger::reduce(std::mem::take(&mut self.cosponsors));

        let tx = self.tx.as_mut().context("ingest transaction closed")?;
        if !actions.is_empty() {
            db::actions::bulk_insert(&mut **tx, &actions, page_size).await?;
        }
        if !cosponsors.is_empty() {
            db::cosponsors::bulk_upsert(&mut **tx, &cosponsors, page_size).await?;
        }

        self.stats.action_rows_flushed += actions.len() as u64;
        self.stats.cosponsor_rows_flushed += cosponsors.len() as u64;
        self.stats.flushes += 1;

        debug!(
            actions = actions.len(),
            cosponsors = cosponsors.len(),
            "Flushed buffers"
        );

        Ok(())
    }

    /// Flush, commit the open transaction, and start the next interval
    async fn checkpoint(&mut self) -> Result<()> {
        self.flush().await?;

        if let Some(tx) = self.tx.take() {
            tx.commit().await.context("checkpoint commit failed")?;
        }
        self.tx = Some(
            self.pool
                .begin()
                .await
                .context("failed to reopen ingest transaction")?,
        );

        self.bills_since_checkpoint = 0;
        self.stats.checkpoints += 1;
        debug!(bills = self.stats.bills_upserted, "Checkpoint committed");

        Ok(())
    }

    fn transaction(&mut self) -> Result<&mut Transaction<'static, Sqlite>> {
        self.tx.as_mut().context("ingest transaction closed")
    }
}
