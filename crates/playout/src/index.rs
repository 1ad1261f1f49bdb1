//! Search-index collaborator.
//!
//! The scheduler does not maintain the search index; upstream pipelines do.
//! The build does, however, own the index commit: exactly one `commit` per
//! build, guaranteed on every exit path, including cancellation and
//! failure. The RAII [`CommitGuard`] carries that contract.

use tracing::error;

use playout_types::MediaItemId;

use crate::error::CollaboratorError;

/// External search-index contract.
pub trait SearchIndex {
    fn add_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError>;
    fn update_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError>;
    fn remove_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError>;
    fn rebuild_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError>;
    fn commit(&mut self) -> Result<(), CollaboratorError>;
}

/// Commits the wrapped index exactly once, when finished or dropped.
///
/// A commit failure is a collaborator fault: it is logged and never aborts
/// the build.
pub struct CommitGuard<'a> {
    index: &'a mut dyn SearchIndex,
    committed: bool,
}

impl<'a> CommitGuard<'a> {
    pub fn new(index: &'a mut dyn SearchIndex) -> Self {
        Self {
            index,
            committed: false,
        }
    }

    fn commit_once(&mut self) {
        if self.committed {
            return;
        }
        self.committed = true;
        if let Err(err) = self.index.commit() {
            error!(error = %err, "search index commit failed");
        }
    }

    /// Commit now instead of at drop.
    pub fn finish(mut self) {
        self.commit_once();
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.commit_once();
    }
}

/// In-memory index used by tests and local tooling.
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    pub items: Vec<MediaItemId>,
    pub commits: usize,
    pub fail_commit: bool,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchIndex for MemorySearchIndex {
    fn add_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError> {
        self.items.extend_from_slice(ids);
        Ok(())
    }

    fn update_items(&mut self, _ids: &[MediaItemId]) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn remove_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError> {
        self.items.retain(|id| !ids.contains(id));
        Ok(())
    }

    fn rebuild_items(&mut self, ids: &[MediaItemId]) -> Result<(), CollaboratorError> {
        self.items = ids.to_vec();
        Ok(())
    }

    fn commit(&mut self) -> Result<(), CollaboratorError> {
        if self.fail_commit {
            return Err(CollaboratorError::new("commit failed"));
        }
        self.commits += 1;
        Ok(())
    }
}
