//! Storage for webscope
//!
//! This crate defines the narrow storage interface the ingestion and query
//! layers are written against, plus the in-memory reference backend.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use std::collections::HashMap;

// Re-export types used in our public API
pub use webscope_types::{GroupField, GroupKey, LogQuery, LogRecord, Page};

/// Storage interface for log records
///
/// Deliberately narrow: one bulk write, one bounded read, one grouped count.
/// Everything the ingestion, query, and statistics engines need goes through
/// these three calls, which keeps them testable against [`MemoryStore`] and
/// leaves the door open for a database-backed implementation.
pub trait LogStore {
    /// Persist a batch of records in a single write
    ///
    /// Ids are assigned by the store; the values carried in by `records`
    /// are ignored. Records are immutable once inserted.
    fn insert_batch(&self, records: Vec<LogRecord>) -> Result<(), StoreError>;

    /// Run one filtered, ordered, paginated read
    fn query(&self, query: &LogQuery) -> Result<Page<LogRecord>, StoreError>;

    /// Count records per distinct value of the given column
    ///
    /// Iteration order of the returned map is unspecified; callers impose
    /// their own ordering.
    fn group_count(&self, field: GroupField) -> Result<HashMap<GroupKey, u64>, StoreError>;
}
