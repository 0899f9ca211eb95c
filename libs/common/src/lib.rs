//! Common library for the StudyBud application
//!
//! This crate provides shared functionality used across the StudyBud
//! services: settings, database connectivity, the media file store and the
//! error types that go with them.

pub mod config;
pub mod database;
pub mod error;
pub mod media;

/// Example usage of the database and media modules
///
/// ```rust,no_run
/// use common::config::Settings;
/// use common::database::{health_check, init_pool};
/// use common::media::{FileStore, LocalFileStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = Settings::from_env()?;
///     let pool = init_pool(&settings.database()).await?;
///     println!("Database health check: {}", health_check(&pool).await?);
///
///     let media = LocalFileStore::new(&settings.media_root);
///     println!("Default avatar at {}", media.resolve("avatar.svg").display());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
