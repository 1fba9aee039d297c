//! Error types for Elasticsearch client.

use thiserror::Error;

/// Result type for Elasticsearch client operations.
pub type Result<T> = std::result::Result<T, ElasticError>;

/// Elasticsearch client errors.
#[derive(Debug, Error)]
pub enum ElasticError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response other than a not-found)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (unexpected response body)
    #[error("Parse error: {0}")]
    Parse(String),
}
