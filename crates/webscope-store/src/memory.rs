use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Timelike;
use parking_lot::RwLock;
use tracing::debug;

use webscope_types::{
    GroupField, GroupKey, LogQuery, LogRecord, Page, SortDirection, SortField,
};

use crate::{LogStore, StoreError};

/// Thread-safe in-memory log store
///
/// Records live in insertion order behind an `RwLock`; ids come from an
/// atomic sequence starting at 1. Cloning shares the underlying storage, so
/// a pipeline writing and an engine reading can hold the same store.
#[derive(Clone)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<LogRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Total record count
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore for MemoryStore {
    fn insert_batch(&self, records: Vec<LogRecord>) -> Result<(), StoreError> {
        let count = records.len();
        let mut entries = self.records.write();
        for mut record in records {
            record.id = self.next_id.fetch_add(1, Ordering::SeqCst);
            entries.push(record);
        }
        debug!(count, total = entries.len(), "batch inserted");
        Ok(())
    }

    fn query(&self, query: &LogQuery) -> Result<Page<LogRecord>, StoreError> {
        let entries = self.records.read();
        let mut matched: Vec<LogRecord> = entries
            .iter()
            .filter(|record| query.filter.matches(record))
            .cloned()
            .collect();
        drop(entries);

        // Stable sort: equal keys keep insertion order in either direction.
        matched.sort_by(|a, b| {
            let ordering = compare_by(a, b, query.sort_field);
            match query.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let records = matched
            .into_iter()
            .skip(query.page.offset())
            .take(query.page.per_page)
            .collect();

        Ok(Page {
            total,
            page: query.page.page,
            per_page: query.page.per_page,
            records,
        })
    }

    fn group_count(&self, field: GroupField) -> Result<HashMap<GroupKey, u64>, StoreError> {
        let entries = self.records.read();
        let mut counts: HashMap<GroupKey, u64> = HashMap::new();

        for record in entries.iter() {
            let key = match field {
                GroupField::IpAddress => GroupKey::Ip(record.ip_address.clone()),
                GroupField::StatusCode => GroupKey::Status(record.status_code),
                GroupField::Hour => GroupKey::Hour(record.request_time.hour()),
            };
            *counts.entry(key).or_default() += 1;
        }

        Ok(counts)
    }
}

fn compare_by(a: &LogRecord, b: &LogRecord, field: SortField) -> CmpOrdering {
    match field {
        SortField::IpAddress => a.ip_address.cmp(&b.ip_address),
        SortField::RequestTime => a.request_time.cmp(&b.request_time),
        SortField::RequestMethod => a.request_method.cmp(&b.request_method),
        SortField::StatusCode => a.status_code.cmp(&b.status_code),
        // `None` sizes order below any numeric size
        SortField::ResponseSize => a.response_size.cmp(&b.response_size),
    }
}
