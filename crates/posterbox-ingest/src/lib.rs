//! Posterbox Ingest - The inbox-to-record pipeline.
//!
//! This crate provides:
//! - A filesystem content store for attachment bytes
//! - The ingestion pass that turns unseen messages into posters and tags
//! - The static JSON export of stored posters

mod error;
mod export;
mod ingestor;
mod store;

pub use error::{IngestError, IngestResult};
pub use export::Exporter;
pub use ingestor::{Ingestor, PassSummary};
pub use store::ContentStore;
