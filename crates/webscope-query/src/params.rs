use chrono::NaiveDate;

use webscope_types::{
    DEFAULT_PER_PAGE, LogFilter, LogQuery, MAX_PER_PAGE, PageRequest, SortDirection, SortField,
};

use crate::QueryError;

/// Raw listing parameters as they arrive from an adapter layer
///
/// Everything is optional and stringly typed, mirroring request query
/// parameters. [`QueryParams::resolve`] turns them into a typed
/// [`LogQuery`]: optional knobs that cannot be understood fall back to safe
/// defaults, while supplied filter values that cannot be understood are
/// rejected.
#[derive(Clone, Debug, Default)]
pub struct QueryParams {
    pub ip_address: Option<String>,
    pub status_code: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl QueryParams {
    /// Normalize into a typed query
    pub fn resolve(&self) -> Result<LogQuery, QueryError> {
        let filter = LogFilter {
            ip_address: self.ip_address.clone().filter(|s| !s.is_empty()),
            status_code: parse_status(self.status_code.as_deref())?,
            date_from: parse_date(self.date_from.as_deref())?,
            date_to: parse_date(self.date_to.as_deref())?,
        };

        Ok(LogQuery {
            filter,
            sort_field: self
                .sort_field
                .as_deref()
                .map(SortField::from_param)
                .unwrap_or_default(),
            sort_direction: self
                .sort_direction
                .as_deref()
                .map(SortDirection::from_param)
                .unwrap_or_default(),
            page: PageRequest {
                page: parse_page(self.page.as_deref()),
                per_page: parse_per_page(self.per_page.as_deref()),
            },
        })
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<u16>, QueryError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| QueryError::InvalidStatus(s.to_string())),
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, QueryError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QueryError::InvalidDate(s.to_string())),
    }
}

fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

fn parse_per_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|n| (1..=MAX_PER_PAGE).contains(n))
        .unwrap_or(DEFAULT_PER_PAGE)
}
