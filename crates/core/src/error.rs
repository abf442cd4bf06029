//! Error types for the linealign alignment library.

use thiserror::Error;

/// Primary error type for alignment, metrics and batch operations.
#[derive(Error, Debug)]
pub enum AlignError {
    #[error("invalid configuration: {param} = {value}: {reason}")]
    InvalidConfig {
        param: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("document has no lines but {references} reference items")]
    EmptyLines { references: usize },

    #[error("inconsistent alignment result: {0}")]
    InconsistentResult(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(String),

    #[error("document {id}: {source}")]
    Document {
        id: String,
        #[source]
        source: Box<AlignError>,
    },
}

impl AlignError {
    pub(crate) fn config(param: &'static str, value: impl ToString, reason: &'static str) -> Self {
        AlignError::InvalidConfig {
            param,
            value: value.to_string(),
            reason,
        }
    }
}

/// Convenience Result type alias for AlignError.
pub type Result<T> = std::result::Result<T, AlignError>;
