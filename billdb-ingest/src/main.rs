//! billdb-ingest - BILLSTATUS batch loader
//!
//! Recursively discovers BILLSTATUS XML documents under a data root,
//! resolves each bill's canonical identity, and reconciles bills, actions,
//! and cosponsors into the target store with batched, conflict-tolerant
//! upserts. Re-running over overlapping document sets is safe: ingestion
//! is idempotent and bill metadata only grows more complete.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billdb_ingest::config::{BatchSettings, IngestConfig};
use billdb_ingest::pipeline;

/// Command-line arguments for billdb-ingest
#[derive(Parser, Debug)]
#[command(name = "billdb-ingest")]
#[command(about = "BILLSTATUS XML batch loader for billdb")]
#[command(version)]
struct Args {
    /// Root folder containing the BILLSTATUS document tree
    #[arg(short = 'r', long)]
    data_root: Option<String>,

    /// Connection string for the target store
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Parse only; no store writes
    #[arg(long)]
    dry_run: bool,

    /// Process only the first N documents (0 = all)
    #[arg(long, default_value = "0")]
    limit: usize,

    /// Commit a checkpoint every N bills
    #[arg(long, default_value = "5000")]
    commit_every: usize,

    /// Rows per bulk insert statement
    #[arg(long, default_value = "1000")]
    page_size: usize,

    /// Flush buffered rows when the combined total reaches N
    #[arg(long, default_value = "20000")]
    flush_rows: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billdb_ingest=info,billdb_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let data_root = billdb_common::config::resolve_data_root(args.data_root.as_deref())?;

    let config = IngestConfig {
        data_root,
        database_url: args.database_url,
        dry_run: args.dry_run,
        limit: (args.limit > 0).then_some(args.limit),
        batch: BatchSettings {
            commit_every_bills: args.commit_every,
            bulk_page_size: args.page_size,
            buffer_flush_rows: args.flush_rows,
        },
    };

    let summary = pipeline::run(&config).await?;

    if args.dry_run {
        println!(
            "Dry run complete. OK={} Skipped={}",
            summary.processed, summary.skipped
        );
    } else {
        println!(
            "Ingest complete. OK={} Skipped={}",
            summary.processed, summary.skipped
        );
    }

    Ok(())
}
