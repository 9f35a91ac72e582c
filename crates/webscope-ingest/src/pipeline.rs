use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use webscope_store::{LogStore, StoreError};
use webscope_types::LogRecord;

use crate::LineParser;

/// Records buffered before each bulk write
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Failures that terminate an ingestion run
///
/// Individual unparseable lines are not failures; they are skipped.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("log file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read log file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Streams a log file through the line parser, persisting matches in batches
///
/// One sequential pass per call: lines are parsed in input order, buffered,
/// and flushed to the store whenever the buffer reaches the batch size. The
/// final partial batch is always flushed. Batches written before a
/// mid-stream I/O error remain persisted.
pub struct IngestPipeline<S> {
    store: S,
    parser: LineParser,
    batch_size: usize,
}

impl<S: LogStore> IngestPipeline<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            parser: LineParser::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the flush threshold (tuning and tests)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ingest one file to completion, returning the number of records inserted
    pub fn ingest(&self, path: &Path) -> Result<u64, IngestError> {
        if !path.exists() {
            return Err(IngestError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut batch: Vec<LogRecord> = Vec::with_capacity(self.batch_size);
        let mut inserted: u64 = 0;
        let mut skipped: u64 = 0;

        for line in reader.lines() {
            let line = line.map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            match self.parser.parse_line(&line) {
                Some(record) => {
                    batch.push(record);
                    if batch.len() >= self.batch_size {
                        inserted += self.flush(&mut batch)?;
                    }
                }
                None => skipped += 1,
            }
        }

        // The tail of a file rarely lands on a batch boundary.
        inserted += self.flush(&mut batch)?;

        info!(
            path = %path.display(),
            inserted,
            skipped,
            "ingestion finished"
        );
        Ok(inserted)
    }

    fn flush(&self, batch: &mut Vec<LogRecord>) -> Result<u64, IngestError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let count = batch.len() as u64;
        self.store.insert_batch(std::mem::take(batch))?;
        debug!(count, "batch flushed");
        Ok(count)
    }
}
