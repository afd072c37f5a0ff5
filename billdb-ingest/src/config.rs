//! Ingest run configuration
//!
//! All tunables are explicit values passed into the pipeline at
//! construction, never process-wide state, so tests can run the pipeline
//! with synthetic thresholds.

use std::path::PathBuf;

/// Batch tunables for the upsert engine
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Commit a durability checkpoint every N bills
    pub commit_every_bills: usize,
    /// Rows per bulk insert statement
    pub bulk_page_size: usize,
    /// Flush the action/cosponsor buffers when their combined length
    /// reaches this many rows
    pub buffer_flush_rows: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            commit_every_bills: 5000,
            bulk_page_size: 1000,
            buffer_flush_rows: 20_000,
        }
    }
}

/// Full configuration for one ingest run
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Root of the document tree to ingest
    pub data_root: PathBuf,
    /// Target store; required unless `dry_run`
    pub database_url: Option<String>,
    /// Parse and resolve only, no persistence
    pub dry_run: bool,
    /// Process only the first N documents
    pub limit: Option<usize>,
    pub batch: BatchSettings,
}

impl IngestConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            database_url: None,
            dry_run: false,
            limit: None,
            batch: BatchSettings::default(),
        }
    }
}
