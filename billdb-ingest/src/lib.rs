//! billdb-ingest library interface
//!
//! Exposes the pipeline stages for integration testing: document discovery,
//! XML tree parsing, identity resolution, record extraction, batch merge
//! reduction, and the batched upsert engine.

pub mod config;
pub mod db;
pub mod merge;
pub mod pipeline;
pub mod services;
pub mod xml;
