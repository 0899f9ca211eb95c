//! Media file store
//!
//! User-uploaded files (avatars) live under a media root directory. Records
//! only store a reference relative to that root; this module turns those
//! references into paths and removes files that are no longer referenced.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FileSystemError;

/// Reference stored on records that have no custom avatar.
///
/// The file behind it is a shared asset and is never deleted.
pub const DEFAULT_AVATAR: &str = "avatar.svg";

/// Operations the avatar lifecycle needs from a file store
pub trait FileStore: Send + Sync {
    /// Directory all references are relative to
    fn root(&self) -> &Path;

    /// Join the media root with a relative reference. Performs no I/O.
    fn resolve(&self, reference: &str) -> PathBuf {
        self.root().join(reference)
    }

    /// Whether a file is present at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Remove the file at `path`
    fn delete(&self, path: &Path) -> Result<(), FileSystemError>;
}

/// File store backed by a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for LocalFileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> Result<(), FileSystemError> {
        debug!("Deleting media file {}", path.display());
        std::fs::remove_file(path).map_err(|source| FileSystemError::Delete {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_joins_root_and_reference() {
        let store = LocalFileStore::new("/srv/media");
        assert_eq!(
            store.resolve("avatars/a.png"),
            PathBuf::from("/srv/media/avatars/a.png")
        );
    }

    #[test]
    fn test_delete_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let path = store.resolve("a.png");
        std::fs::write(&path, b"png").unwrap();

        assert!(store.exists(&path));
        store.delete(&path).unwrap();
        assert!(!store.exists(&path));
    }

    #[test]
    fn test_delete_missing_file_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        let path = store.resolve("gone.png");

        let err = store.delete(&path).unwrap_err();
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("gone.png"));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(temp_dir.path());
        std::fs::create_dir(temp_dir.path().join("avatars")).unwrap();

        assert!(!store.exists(&store.resolve("avatars")));
    }
}
