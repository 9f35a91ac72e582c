use tracing::debug;

use webscope_store::LogStore;
use webscope_types::{LogRecord, Page};

use crate::{QueryError, QueryParams};

/// Serves filtered, sorted, paginated listings over a store
pub struct QueryEngine<S> {
    store: S,
}

impl<S: LogStore> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve raw parameters and run exactly one bounded read
    ///
    /// Malformed supplied filters are rejected before the store is touched.
    pub fn list(&self, params: &QueryParams) -> Result<Page<LogRecord>, QueryError> {
        let query = params.resolve()?;
        debug!(
            sort = query.sort_field.as_str(),
            page = query.page.page,
            per_page = query.page.per_page,
            "running listing query"
        );
        Ok(self.store.query(&query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc};
    use webscope_store::MemoryStore;
    use webscope_types::LogRecord;

    fn record(ip: &str, status: u16, day: u32) -> LogRecord {
        LogRecord {
            id: 0,
            ip_address: ip.to_string(),
            request_method: "GET".to_string(),
            request_path: "/".to_string(),
            status_code: status,
            response_size: Some(100),
            referer: None,
            user_agent: None,
            request_time: Utc.with_ymd_and_hms(2025, 4, day, 10, 0, 0).unwrap(),
        }
    }

    fn engine_with(records: Vec<LogRecord>) -> QueryEngine<MemoryStore> {
        let store = MemoryStore::new();
        store.insert_batch(records).unwrap();
        QueryEngine::new(store)
    }

    #[test]
    fn test_status_filter_returns_only_matches() {
        let engine = engine_with(vec![
            record("10.0.0.1", 200, 1),
            record("10.0.0.2", 404, 2),
            record("10.0.0.3", 404, 3),
            record("10.0.0.4", 500, 4),
        ]);

        let params = QueryParams {
            status_code: Some("404".to_string()),
            ..Default::default()
        };

        let page = engine.list(&params).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.records.len(), 2);
        assert!(page.records.iter().all(|r| r.status_code == 404));
    }

    #[test]
    fn test_default_order_is_request_time_descending() {
        let engine = engine_with(vec![
            record("10.0.0.1", 200, 1),
            record("10.0.0.2", 200, 3),
            record("10.0.0.3", 200, 2),
        ]);

        let page = engine.list(&QueryParams::default()).unwrap();
        let days: Vec<u32> = page.records.iter().map(|r| r.request_time.day()).collect();
        assert_eq!(days, vec![3, 2, 1]);
    }

    #[test]
    fn test_date_window_and_pagination_together() {
        let engine = engine_with((1..=20).map(|day| record("10.0.0.1", 200, day)).collect());

        let params = QueryParams {
            date_from: Some("2025-04-05".to_string()),
            date_to: Some("2025-04-14".to_string()),
            sort_direction: Some("asc".to_string()),
            page: Some("2".to_string()),
            per_page: Some("4".to_string()),
            ..Default::default()
        };

        let page = engine.list(&params).unwrap();
        assert_eq!(page.total, 10);
        assert_eq!(page.page, 2);
        let days: Vec<u32> = page.records.iter().map(|r| r.request_time.day()).collect();
        assert_eq!(days, vec![9, 10, 11, 12]);
    }

    #[test]
    fn test_malformed_date_never_reaches_the_store() {
        let engine = engine_with(vec![record("10.0.0.1", 200, 1)]);
        let params = QueryParams {
            date_to: Some("yesterday".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            engine.list(&params),
            Err(QueryError::InvalidDate(_))
        ));
    }
}
