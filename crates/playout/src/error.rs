//! Build error types.

use playout_types::CollectionKey;
use thiserror::Error;

/// Errors that can occur while building a playout.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Cooperative cancellation; partial output up to the last committed
    /// schedule item is retained by the caller.
    #[error("playout build canceled")]
    Canceled,

    /// Invalid schedule-item configuration, e.g. more than one
    /// pad-to-nearest-minute filler on a single item. Recovered locally.
    #[error("invalid schedule configuration: {reason}")]
    BadConfiguration { reason: String },

    /// The primary collection's enumerator has no current item; the
    /// schedule item is skipped.
    #[error("collection has no items: {key:?}")]
    CollectionEmpty { key: CollectionKey },

    /// A collaborator (search index, metadata provider) faulted; the build
    /// continues without the affected work.
    #[error("collaborator failure: {reason}")]
    Collaborator { reason: String },

    /// Unexpected invariant violation; aborts the build.
    #[error("invariant violation: {reason}")]
    Fatal { reason: String },
}

impl BuildError {
    pub fn bad_configuration(reason: impl Into<String>) -> Self {
        Self::BadConfiguration {
            reason: reason.into(),
        }
    }

    pub fn collection_empty(key: CollectionKey) -> Self {
        Self::CollectionEmpty { key }
    }

    pub fn collaborator(reason: impl Into<String>) -> Self {
        Self::Collaborator {
            reason: reason.into(),
        }
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal {
            reason: reason.into(),
        }
    }

    /// Whether the build loop can absorb this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::BadConfiguration { .. } | Self::CollectionEmpty { .. } | Self::Collaborator { .. }
        )
    }
}

/// Failure reported by an external collaborator.
#[derive(Debug, Error)]
#[error("collaborator failure: {reason}")]
pub struct CollaboratorError {
    pub reason: String,
}

impl CollaboratorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<CollaboratorError> for BuildError {
    fn from(err: CollaboratorError) -> Self {
        BuildError::Collaborator { reason: err.reason }
    }
}
