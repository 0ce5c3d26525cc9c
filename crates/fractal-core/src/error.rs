//! Error types for the repository façade

use nix_flake::NixError;
use thiserror::Error;

/// Errors returned by [`crate::Repository`] queries.
///
/// Neither kind is retried; callers get the first failure unchanged.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The flake could not evaluate the expression
    #[error("failed to evaluate `{expression}`")]
    Evaluation {
        expression: String,
        #[source]
        source: NixError,
    },

    /// The flake evaluated, but its output does not have the expected shape
    #[error("failed to decode output of `{expression}`")]
    Decode {
        expression: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RepositoryError {
    /// Expression path whose evaluation or decoding failed
    pub fn expression(&self) -> &str {
        match self {
            RepositoryError::Evaluation { expression, .. }
            | RepositoryError::Decode { expression, .. } => expression,
        }
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;
