use webscope_store::LogStore;
use webscope_types::{GroupField, HourCount, IpCount, StatsSummary, StatusCount};

use crate::QueryError;

/// How many of the busiest client addresses the summary reports
const TOP_IP_LIMIT: usize = 10;

/// Computes aggregate counts over the full record set
///
/// Pure read-only aggregation with no parameters and no caching; every call
/// re-reads the store, so two calls with no intervening writes agree.
pub struct StatsEngine<S> {
    store: S,
}

impl<S: LogStore> StatsEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Compute the four-figure summary in one pass over the groupings
    pub fn summary(&self) -> Result<StatsSummary, QueryError> {
        let by_status = self.by_status()?;

        // Every record carries a status, so the status grouping is complete
        // and its counts sum to the record total.
        let total = by_status.iter().map(|row| row.count).sum();

        Ok(StatsSummary {
            total,
            by_status,
            top_ips: self.top_ips()?,
            by_hour: self.by_hour()?,
        })
    }

    /// Counts per distinct status code, ascending by status
    ///
    /// The ordering is for stable output only; consumers must not rely on it.
    fn by_status(&self) -> Result<Vec<StatusCount>, QueryError> {
        let counts = self.store.group_count(GroupField::StatusCode)?;
        let mut rows: Vec<StatusCount> = counts
            .into_iter()
            .filter_map(|(key, count)| {
                key.into_status()
                    .map(|status_code| StatusCount { status_code, count })
            })
            .collect();
        rows.sort_by_key(|row| row.status_code);
        Ok(rows)
    }

    /// The busiest client addresses, descending by count
    ///
    /// Ties resolve by ascending address so repeated runs agree.
    fn top_ips(&self) -> Result<Vec<IpCount>, QueryError> {
        let counts = self.store.group_count(GroupField::IpAddress)?;
        let mut rows: Vec<IpCount> = counts
            .into_iter()
            .filter_map(|(key, count)| {
                key.into_ip().map(|ip_address| IpCount { ip_address, count })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.ip_address.cmp(&b.ip_address))
        });
        rows.truncate(TOP_IP_LIMIT);
        Ok(rows)
    }

    /// Counts per observed hour of the day, ascending by hour
    ///
    /// Hours with no records are omitted, not zero-filled.
    fn by_hour(&self) -> Result<Vec<HourCount>, QueryError> {
        let counts = self.store.group_count(GroupField::Hour)?;
        let mut rows: Vec<HourCount> = counts
            .into_iter()
            .filter_map(|(key, count)| key.into_hour().map(|hour| HourCount { hour, count }))
            .collect();
        rows.sort_by_key(|row| row.hour);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use webscope_store::{LogStore, MemoryStore};
    use webscope_types::LogRecord;

    fn record(ip: &str, status: u16, hour: u32) -> LogRecord {
        LogRecord {
            id: 0,
            ip_address: ip.to_string(),
            request_method: "GET".to_string(),
            request_path: "/".to_string(),
            status_code: status,
            response_size: Some(100),
            referer: None,
            user_agent: None,
            request_time: Utc.with_ymd_and_hms(2025, 4, 6, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_summary_over_empty_store() {
        let engine = StatsEngine::new(MemoryStore::new());
        let summary = engine.summary().unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.by_status.is_empty());
        assert!(summary.top_ips.is_empty());
        assert!(summary.by_hour.is_empty());
    }

    #[test]
    fn test_by_hour_reports_observed_hours_only() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![
                record("10.0.0.1", 200, 0),
                record("10.0.0.1", 200, 0),
                record("10.0.0.1", 200, 5),
                record("10.0.0.1", 200, 23),
            ])
            .unwrap();

        let summary = StatsEngine::new(store).summary().unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(
            summary.by_hour,
            vec![
                HourCount { hour: 0, count: 2 },
                HourCount { hour: 5, count: 1 },
                HourCount { hour: 23, count: 1 },
            ]
        );
    }

    #[test]
    fn test_by_status_counts_every_distinct_status() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![
                record("10.0.0.1", 200, 1),
                record("10.0.0.2", 404, 2),
                record("10.0.0.3", 404, 3),
                record("10.0.0.4", 500, 4),
            ])
            .unwrap();

        let summary = StatsEngine::new(store).summary().unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(
            summary.by_status,
            vec![
                StatusCount { status_code: 200, count: 1 },
                StatusCount { status_code: 404, count: 2 },
                StatusCount { status_code: 500, count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_ips_caps_at_ten_sorted_by_count() {
        let store = MemoryStore::new();
        let mut records = Vec::new();
        // 15 distinct addresses; address k appears k times
        for k in 1..=15u64 {
            for _ in 0..k {
                records.push(record(&format!("10.0.0.{k}"), 200, 1));
            }
        }
        store.insert_batch(records).unwrap();

        let summary = StatsEngine::new(store).summary().unwrap();
        assert_eq!(summary.top_ips.len(), 10);

        let counts: Vec<u64> = summary.top_ips.iter().map(|row| row.count).collect();
        assert_eq!(counts, vec![15, 14, 13, 12, 11, 10, 9, 8, 7, 6]);
        assert_eq!(summary.top_ips[0].ip_address, "10.0.0.15");
    }

    #[test]
    fn test_top_ips_ties_resolve_by_address() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![
                record("10.0.0.9", 200, 1),
                record("10.0.0.1", 200, 1),
                record("10.0.0.5", 200, 1),
            ])
            .unwrap();

        let summary = StatsEngine::new(store).summary().unwrap();
        let ips: Vec<&str> = summary
            .top_ips
            .iter()
            .map(|row| row.ip_address.as_str())
            .collect();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.5", "10.0.0.9"]);
    }

    #[test]
    fn test_summary_is_idempotent_without_writes() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![
                record("10.0.0.1", 200, 3),
                record("10.0.0.2", 404, 7),
            ])
            .unwrap();

        let engine = StatsEngine::new(store);
        let first = engine.summary().unwrap();
        let second = engine.summary().unwrap();
        assert_eq!(first, second);
    }
}
