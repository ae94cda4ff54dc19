//! Error types for the styling system.

use crate::config::RenderMode;

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while realizing rules against a rule store.
///
/// Containers treat every one of these as a per-entity failure: the error is
/// logged and the remaining entities are still submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The rule store refused the rule text and returned no index.
    #[error("Rule store rejected rule '{css}'")]
    InsertRejected { css: String },

    /// The store accepted the rule but has no handle at the returned index.
    #[error("No rule handle at index {index}")]
    MissingHandle { index: usize },

    /// The operation needs a live store but the container renders in another mode.
    #[error("Cannot realize rules in {mode:?} mode")]
    NotLive { mode: RenderMode },
}

impl Error {
    /// Create an insertion error.
    pub fn insert_rejected(css: impl Into<String>) -> Self {
        Self::InsertRejected { css: css.into() }
    }

    /// Create a missing-handle error.
    pub fn missing_handle(index: usize) -> Self {
        Self::MissingHandle { index }
    }
}
