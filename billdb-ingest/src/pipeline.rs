//! Pipeline driver
//!
//! Drives discovery → extraction → batched upsert over a document corpus,
//! one document at a time in lexicographic path order. Extraction failures
//! (malformed markup, irresolvable identity) are counted and skipped;
//! storage failures abort the run. A final flush + checkpoint is
//! guaranteed regardless of how many documents were ingested.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::IngestConfig;
use crate::services::document_scanner;
use crate::services::record_extractor;
use crate::services::upsert_engine::{EngineStats, UpsertEngine};

/// Final counts for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    /// Documents extracted and persisted (or, in a dry run, extracted)
    pub processed: u64,
    /// Documents skipped on extraction failure
    pub skipped: u64,
    /// Engine counters; `None` for dry runs
    pub engine: Option<EngineStats>,
}

/// Run a full ingest (or dry run) from configuration
pub async fn run(config: &IngestConfig) -> Result<IngestSummary> {
    let files = discover_documents(config)?;
    if files.is_empty() {
        bail!(
            "no BILLSTATUS documents found under {}",
            config.data_root.display()
        );
    }
    info!("Discovered {} documents", files.len());

    if config.dry_run {
        return Ok(dry_run_pass(&files, config));
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL not set (required unless --dry-run)")?;
    let pool = billdb_common::db::init::connect(database_url)
        .await
        .context("store connection failed")?;

    let summary = ingest_documents(&files, config, &pool).await;
    pool.close().await;
    summary
}

/// Discover documents in deterministic order and apply the processing cap
pub fn discover_documents(config: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = document_scanner::discover(&config.data_root)?;
    if let Some(limit) = config.limit {
        files.truncate(limit);
    }
    Ok(files)
}

/// Ingest already-discovered documents through an open store
pub async fn ingest_documents(
    files: &[PathBuf],
    config: &IngestConfig,
    pool: &SqlitePool,
) -> Result<IngestSummary> {
    let mut engine = UpsertEngine::begin(pool.clone(), config.batch.clone()).await?;
    let mut processed = 0u64;
    let mut skipped = 0u64;

    for path in files {
        match record_extractor::extract_document(path, &config.data_root) {
            Ok(doc) => {
                engine.ingest(doc).await?;
                processed += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    // Unconditional, even when every document was skipped
    let stats = engine.finish().await?;
    info!(
        processed,
        skipped,
        flushes = stats.flushes,
        checkpoints = stats.checkpoints,
        "Ingest finished"
    );

    Ok(IngestSummary {
        processed,
        skipped,
        engine: Some(stats),
    })
}

/// Exercise extraction and identity resolution only; no persistence
fn dry_run_pass(files: &[PathBuf], config: &IngestConfig) -> IngestSummary {
    let mut processed = 0u64;
    let mut skipped = 0u64;

    for path in files {
        match record_extractor::extract_document(path, &config.data_root) {
            Ok(_) => processed += 1,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    info!(processed, skipped, "Dry run finished");

    IngestSummary {
        processed,
        skipped,
        engine: None,
    }
}
