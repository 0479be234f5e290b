use thiserror::Error;

/// Failures reported by collaborator implementations
///
/// Callers on the selection path treat every variant as "no data" and
/// degrade; none of these abort an auction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type PortResult<T> = std::result::Result<T, PortError>;
