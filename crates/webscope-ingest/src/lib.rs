//! Log ingestion for webscope
//!
//! This crate turns Apache "combined"-format access-log files into
//! structured records: a line parser with one fixed grammar, and a pipeline
//! that streams a file through it and persists matches in batches.

mod parser;
mod pipeline;

pub use parser::LineParser;
pub use pipeline::{DEFAULT_BATCH_SIZE, IngestError, IngestPipeline};

// Re-export types used in our public API
pub use webscope_types::LogRecord;
