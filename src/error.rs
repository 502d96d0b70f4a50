use std::path::PathBuf;
use thiserror::Error;

// ── Catalog Errors ─────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Sampling was attempted against a pool with no slots.
    #[error("weighted pool is empty, nothing to draw")]
    EmptyPool,

    #[error("catalog contains no emotions")]
    Empty,

    #[error("invalid emotion '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidRecord {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// ── Input Errors ───────────────────────────────────────

/// Bad console input. Always recovered by prompting again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a menu choice (expected 1-5)")]
    OutOfRange(String),
}
