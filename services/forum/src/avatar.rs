//! Avatar file lifecycle
//!
//! Keeps the files under the media root consistent with the avatar
//! references stored on user records. When a user replaces their avatar or
//! deletes their account, the file that is no longer referenced is removed.
//! The shared default avatar is never touched.
//!
//! Cleanup is best-effort: nothing in here can fail the save or delete of
//! the record itself. Outcomes are logged and returned as [`AvatarCleanup`]
//! so callers can inspect them.
//!
//! Two updates of the same user racing each other can still delete a file
//! the other one just stored; only the row update is atomic. The stale file
//! is also removed before the row is written, so a write that then fails
//! (a duplicate email, say) leaves the row pointing at a deleted file.

use std::path::PathBuf;
use std::sync::Arc;

use common::error::FileSystemError;
use common::media::FileStore;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::User;

/// Reasons a reconciliation did not happen. Never fatal.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The persisted record vanished between the save check and the fetch
    #[error("User {0} was not found while reconciling its avatar")]
    LookupMiss(Uuid),

    /// Deleting the stale file failed
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),
}

/// What happened to the avatar file during a save or delete
#[derive(Debug)]
pub enum AvatarCleanup {
    /// Nothing to do: default avatar, unchanged or empty reference
    Skipped,
    /// The stale file was already absent
    Missing(PathBuf),
    /// The stale file was removed
    Deleted(PathBuf),
    /// Reconciliation was abandoned, the record operation went ahead anyway
    Failed(LifecycleError),
}

impl AvatarCleanup {
    /// Whether a file was removed from the media root
    pub fn deleted(&self) -> bool {
        matches!(self, AvatarCleanup::Deleted(_))
    }
}

/// Hooks the user repository calls around its writes
pub trait UserLifecycle: Send + Sync {
    /// Called on update with the persisted record and the one about to be
    /// written, before the write
    fn after_load_compare(&self, old: &User, new: &User) -> AvatarCleanup;

    /// Called before a record is deleted
    fn before_delete(&self, user: &User) -> AvatarCleanup;
}

/// Avatar housekeeping over a [`FileStore`]
#[derive(Clone)]
pub struct AvatarLifecycle {
    files: Arc<dyn FileStore>,
}

impl AvatarLifecycle {
    /// Create a lifecycle manager removing files from `files`
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    fn remove(&self, user_id: Uuid, reference: &str) -> AvatarCleanup {
        let path = self.files.resolve(reference);
        if !self.files.exists(&path) {
            debug!(%user_id, path = %path.display(), "Stale avatar already absent");
            return AvatarCleanup::Missing(path);
        }

        match self.files.delete(&path) {
            Ok(()) => {
                info!(%user_id, path = %path.display(), "Deleted stale avatar");
                AvatarCleanup::Deleted(path)
            }
            Err(e) => {
                warn!(%user_id, error = %e, "Failed to delete stale avatar");
                AvatarCleanup::Failed(e.into())
            }
        }
    }
}

impl UserLifecycle for AvatarLifecycle {
    fn after_load_compare(&self, old: &User, new: &User) -> AvatarCleanup {
        if old.avatar == new.avatar || !old.has_custom_avatar() {
            return AvatarCleanup::Skipped;
        }

        self.remove(old.id, &old.avatar)
    }

    fn before_delete(&self, user: &User) -> AvatarCleanup {
        if !user.has_custom_avatar() {
            return AvatarCleanup::Skipped;
        }

        self.remove(user.id, &user.avatar)
    }
}
