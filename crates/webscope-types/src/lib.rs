//! Shared types for webscope
//!
//! This crate contains data structures used across multiple webscope crates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Default page size when none (or an unusable one) is requested
pub const DEFAULT_PER_PAGE: usize = 15;

/// Largest page size a request may ask for
pub const MAX_PER_PAGE: usize = 100;

// ============================================================================
// Log Records
// ============================================================================

/// One parsed access-log entry
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogRecord {
    /// Opaque sequential ID, assigned by the store on insertion
    pub id: u64,

    /// Client IP or hostname token
    pub ip_address: String,

    /// HTTP method token as logged (not validated against a method list)
    pub request_method: String,

    /// Raw request target as logged, query string included
    pub request_path: String,

    /// Status code as logged, stored without range enforcement
    pub status_code: u16,

    /// Response size in bytes; `None` when the log used a non-numeric marker
    pub response_size: Option<u64>,

    /// Referer header value; `None` when logged as `-`
    pub referer: Option<String>,

    /// User agent header value; `None` when logged as `-`
    pub user_agent: Option<String>,

    /// Request timestamp normalized to UTC
    pub request_time: DateTime<Utc>,
}

// ============================================================================
// Query Types
// ============================================================================

/// Columns a listing may be ordered by
///
/// This is a closed set: request parameters are mapped onto it before any
/// query is built, so arbitrary field names never reach the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortField {
    IpAddress,
    #[default]
    RequestTime,
    RequestMethod,
    StatusCode,
    ResponseSize,
}

impl SortField {
    /// Map a request parameter onto the allowed columns
    ///
    /// Anything outside the set falls back to `RequestTime`.
    pub fn from_param(s: &str) -> Self {
        match s {
            "ip_address" => Self::IpAddress,
            "request_time" => Self::RequestTime,
            "request_method" => Self::RequestMethod,
            "status_code" => Self::StatusCode,
            "response_size" => Self::ResponseSize,
            _ => Self::RequestTime,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IpAddress => "ip_address",
            Self::RequestTime => "request_time",
            Self::RequestMethod => "request_method",
            Self::StatusCode => "status_code",
            Self::ResponseSize => "response_size",
        }
    }
}

/// Listing order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a request parameter, case-insensitively; unknown values fall
    /// back to `Desc`.
    pub fn from_param(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Record filters, combined with logical AND
///
/// Absent fields match everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogFilter {
    /// Case-sensitive substring match against the client address
    pub ip_address: Option<String>,

    /// Exact status code match
    pub status_code: Option<u16>,

    /// Inclusive lower bound on the record's UTC calendar date
    pub date_from: Option<NaiveDate>,

    /// Inclusive upper bound on the record's UTC calendar date
    pub date_to: Option<NaiveDate>,
}

impl LogFilter {
    /// Check whether a record passes every supplied filter
    ///
    /// An inverted date range matches nothing, by construction.
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(needle) = &self.ip_address {
            if !record.ip_address.contains(needle.as_str()) {
                return false;
            }
        }

        if let Some(status) = self.status_code {
            if record.status_code != status {
                return false;
            }
        }

        let date = record.request_time.date_naive();
        if let Some(from) = self.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if date > to {
                return false;
            }
        }

        true
    }

    /// Check if no filter is supplied (matches everything)
    pub fn is_empty(&self) -> bool {
        self.ip_address.is_none()
            && self.status_code.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

/// Pagination window, 1-indexed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Number of records preceding this window
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// A fully normalized listing query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogQuery {
    pub filter: LogFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page: PageRequest,
}

/// One page of listing results
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    /// Total matching records across all pages
    pub total: u64,

    /// Current 1-indexed page number
    pub page: usize,

    /// Requested page size
    pub per_page: usize,

    /// The ordered slice of records for this page
    pub records: Vec<T>,
}

// ============================================================================
// Aggregation Types
// ============================================================================

/// Columns the store can group-count by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupField {
    IpAddress,
    StatusCode,
    /// Hour-of-day (0-23) component of the UTC request time
    Hour,
}

/// A single group key produced by a group count
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Ip(String),
    Status(u16),
    Hour(u32),
}

impl GroupKey {
    pub fn into_ip(self) -> Option<String> {
        match self {
            Self::Ip(ip) => Some(ip),
            _ => None,
        }
    }

    pub fn into_status(self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }

    pub fn into_hour(self) -> Option<u32> {
        match self {
            Self::Hour(hour) => Some(hour),
            _ => None,
        }
    }
}

/// Record count for one status code
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusCount {
    pub status_code: u16,
    pub count: u64,
}

/// Record count for one client address
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IpCount {
    pub ip_address: String,
    pub count: u64,
}

/// Record count for one hour of the day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: u64,
}

/// Aggregate view over the full record set
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsSummary {
    /// Count of all stored records
    pub total: u64,

    /// Counts per distinct status code
    pub by_status: Vec<StatusCount>,

    /// The ten busiest client addresses, descending by count
    pub top_ips: Vec<IpCount>,

    /// Counts per observed hour of the day, ascending; silent hours are
    /// omitted rather than zero-filled
    pub by_hour: Vec<HourCount>,
}
