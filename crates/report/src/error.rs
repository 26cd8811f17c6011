//! Error types for the report library.

use thiserror::Error;

/// Result type alias for the report library.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or parsing report identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Host id is empty or contains one of the id delimiters.
    #[error("invalid host id {0:?}: must be non-empty and free of '|' and ';'")]
    InvalidHostId(String),
    /// Edge id string is not of the form `src|dst`.
    #[error("invalid edge id {0:?}: expected exactly one '|'")]
    InvalidEdgeId(String),
}
