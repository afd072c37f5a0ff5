// End-to-end pipeline tests: synthetic BILLSTATUS corpora under a temp
// data root, ingested into an in-memory store.

use std::fs;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;

use billdb_ingest::config::{BatchSettings, IngestConfig};
use billdb_ingest::pipeline;

async fn test_pool() -> SqlitePool {
    billdb_common::db::init::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

fn write_doc(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn bill_xml(congress: i64, bill_type: &str, number: i64, extra: &str) -> String {
    format!(
        "<billStatus><bill>\
         <congress>{congress}</congress><type>{bill_type}</type><number>{number}</number>\
         {extra}</bill></billStatus>"
    )
}

fn config(root: &Path) -> IngestConfig {
    IngestConfig::new(root)
}

#[tokio::test]
async fn ingests_a_small_corpus() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "data/BILLSTATUS-118hr1.xml",
        &bill_xml(
            118,
            "hr",
            1,
            "<title>First Act</title>\
             <actions><item><actionDate>2023-02-01</actionDate>\
             <text>Introduced in House</text></item></actions>\
             <cosponsors><item><bioguideId>A000001</bioguideId>\
             <party>D</party></item></cosponsors>",
        ),
    );
    write_doc(
        dir.path(),
        "data/118/bills/s/s2/fdsys_billstatus.xml",
        &bill_xml(118, "s", 2, "<title>Second Act</title>"),
    );

    let config = config(dir.path());
    let files = pipeline::discover_documents(&config).unwrap();
    assert_eq!(files.len(), 2);

    let pool = test_pool().await;
    let summary = pipeline::ingest_documents(&files, &config, &pool)
        .await
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 0);

    let bills: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(bills, 2);

    let actions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bill_actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(actions, 1);

    let cosponsors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bill_cosponsors")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(cosponsors, 1);

    let (chamber, title): (Option<String>, Option<String>) = sqlx::query_as(
        "SELECT chamber, title FROM bills WHERE congress = 118 AND bill_type = 'hr' AND bill_number = 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(chamber.as_deref(), Some("house"));
    assert_eq!(title.as_deref(), Some("First Act"));
}

#[tokio::test]
async fn unresolvable_documents_are_counted_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "data/BILLSTATUS-118hr1.xml",
        &bill_xml(118, "hr", 1, ""),
    );
    // No identity in content, filename, or directories
    write_doc(
        dir.path(),
        "misc/fdsys_billstatus.xml",
        "<billStatus><title>Orphan</title></billStatus>",
    );
    // Malformed markup
    write_doc(
        dir.path(),
        "data/BILLSTATUS-118hr2.xml",
        "<billStatus><bill></billStatus>",
    );

    let config = config(dir.path());
    let files = pipeline::discover_documents(&config).unwrap();
    assert_eq!(files.len(), 3);

    let pool = test_pool().await;
    let summary = pipeline::ingest_documents(&files, &config, &pool)
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 2);

    let bills: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(bills, 1);
}

#[tokio::test]
async fn limit_caps_processing_in_lexicographic_order() {
    let dir = tempfile::tempdir().unwrap();
    for number in 1..=5 {
        write_doc(
            dir.path(),
            &format!("data/BILLSTATUS-118hr{number}.xml"),
            &bill_xml(118, "hr", number, ""),
        );
    }

    let mut config = config(dir.path());
    config.limit = Some(2);

    let files = pipeline::discover_documents(&config).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("BILLSTATUS-118hr1.xml"));
    assert!(files[1].ends_with("BILLSTATUS-118hr2.xml"));
}

#[tokio::test]
async fn flush_cadence_matches_buffer_threshold() {
    let dir = tempfile::tempdir().unwrap();
    for number in 1..=4 {
        write_doc(
            dir.path(),
            &format!("data/BILLSTATUS-118hr{number}.xml"),
            &bill_xml(
                118,
                "hr",
                number,
                &format!(
                    "<actions>\
                     <item><actionDate>2023-01-0{number}</actionDate><text>one</text></item>\
                     <item><actionDate>2023-01-0{number}</actionDate><text>two</text></item>\
                     <item><actionDate>2023-01-0{number}</actionDate><text>three</text></item>\
                     </actions>"
                ),
            ),
        );
    }

    let mut config = config(dir.path());
    config.batch = BatchSettings {
        buffer_flush_rows: 10,
        commit_every_bills: 1000,
        bulk_page_size: 100,
    };

    let files = pipeline::discover_documents(&config).unwrap();
    let pool = test_pool().await;
    let summary = pipeline::ingest_documents(&files, &config, &pool)
        .await
        .unwrap();

    let stats = summary.engine.unwrap();
    // Buffer reaches 12 >= 10 while routing the 4th document: one flush,
    // carrying all twelve buffered rows; the final flush has nothing left.
    assert_eq!(stats.flushes, 1);
    assert_eq!(stats.action_rows_flushed, 12);
    assert_eq!(stats.bills_upserted, 4);

    let actions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bill_actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(actions, 12);
}

#[tokio::test]
async fn dry_run_exercises_extraction_without_a_store() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "data/BILLSTATUS-118hr1.xml",
        &bill_xml(118, "hr", 1, ""),
    );
    write_doc(
        dir.path(),
        "misc/fdsys_billstatus.xml",
        "<billStatus><title>Orphan</title></billStatus>",
    );

    let mut config = config(dir.path());
    config.dry_run = true;
    // Deliberately no database_url: a dry run must not need one

    let summary = pipeline::run(&config).await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert!(summary.engine.is_none());
}

#[tokio::test]
async fn empty_corpus_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    assert!(pipeline::run(&config).await.is_err());
}

#[tokio::test]
async fn normal_mode_requires_a_database_url() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "data/BILLSTATUS-118hr1.xml",
        &bill_xml(118, "hr", 1, ""),
    );

    let config = config(dir.path());
    assert!(config.database_url.is_none());
    assert!(pipeline::run(&config).await.is_err());
}

#[tokio::test]
async fn zero_extracted_documents_still_finishes_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "misc/fdsys_billstatus.xml",
        "<billStatus><title>Orphan</title></billStatus>",
    );

    let config = config(dir.path());
    let files = pipeline::discover_documents(&config).unwrap();
    let pool = test_pool().await;
    let summary = pipeline::ingest_documents(&files, &config, &pool)
        .await
        .unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 1);
    // The final checkpoint still committed
    assert_eq!(summary.engine.unwrap().checkpoints, 1);
}
