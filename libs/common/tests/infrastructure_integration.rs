//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is reachable and
//! migrated, and that the media store works against a real directory.

use common::{
    config::Settings,
    database::{health_check, init_pool, run_migrations},
    media::{DEFAULT_AVATAR, FileStore, LocalFileStore},
};
use sqlx::Row;

/// Database connectivity and schema, using `DATABASE_URL`
#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let pool = init_pool(&settings.database()).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;

    let row = sqlx::query(
        "SELECT COUNT(*) AS tables FROM information_schema.tables \
         WHERE table_name IN ('users', 'topics', 'rooms', 'room_participants', 'messages')",
    )
    .fetch_one(&pool)
    .await?;

    let tables: i64 = row.get("tables");
    assert_eq!(tables, 5, "Forum schema is incomplete");

    Ok(())
}

/// The media store resolves, finds and deletes files under its root
#[test]
fn test_media_store_integration() -> Result<(), Box<dyn std::error::Error>> {
    let media_root = tempfile::tempdir()?;
    let store = LocalFileStore::new(media_root.path());

    let default_avatar = store.resolve(DEFAULT_AVATAR);
    let upload = store.resolve("upload.png");
    std::fs::write(&default_avatar, b"<svg/>")?;
    std::fs::write(&upload, b"png")?;

    assert!(store.exists(&default_avatar));
    assert!(store.exists(&upload));

    store.delete(&upload)?;
    assert!(!store.exists(&upload));
    assert!(store.delete(&upload).is_err());
    assert!(store.exists(&default_avatar));

    Ok(())
}
