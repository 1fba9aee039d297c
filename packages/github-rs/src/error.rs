//! Error types for GitHub client.

use thiserror::Error;

/// Result type for GitHub client operations.
pub type Result<T> = std::result::Result<T, GithubError>;

/// GitHub client errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (unexpected response body)
    #[error("Parse error: {0}")]
    Parse(String),
}
