use thiserror::Error;

/// Failures raised by a storage backend
///
/// The in-memory backend never produces these; a durable backend maps its
/// constraint violations and connection failures onto `Backend`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}
