use thiserror::Error;

use webscope_store::StoreError;

/// Rejections for supplied inputs that cannot be normalized away
///
/// Absent or merely out-of-range optional knobs (sort field, direction,
/// page sizes) never produce these; they fall back to defaults instead. A
/// filter that was supplied but cannot be interpreted is a different thing
/// and is rejected before any query runs.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid status code filter: {0:?}")]
    InvalidStatus(String),

    #[error("invalid date filter (expected YYYY-MM-DD): {0:?}")]
    InvalidDate(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
