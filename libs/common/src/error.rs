//! Custom error types for the common library
//!
//! This module defines the error types shared by the StudyBud services:
//! database plumbing, media file handling and settings loading.

use std::path::PathBuf;

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error raised by the media file store
#[derive(Error, Debug)]
pub enum FileSystemError {
    /// Removing a file failed (permissions, already gone, I/O)
    #[error("Failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileSystemError {
    /// Path the failed operation targeted
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileSystemError::Delete { path, .. } => path,
        }
    }
}

/// Error raised while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized
    #[error("Invalid configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not usable
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
