use std::sync::Arc;

use anyhow::Result;
use common::config::Settings;
use common::database::{health_check, init_pool, run_migrations};
use common::media::LocalFileStore;
use forum::{AppState, routes};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting forum service");

    let settings = Settings::from_env()?;
    info!(
        "Media root: {} (debug: {})",
        settings.media_root.display(),
        settings.debug
    );

    // Initialize database connection pool
    let pool = init_pool(&settings.database()).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let media = Arc::new(LocalFileStore::new(&settings.media_root));
    let app_state = AppState::new(pool, media);

    // Start the web server
    let app = routes::create_router(app_state, &settings);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!("Forum service listening on {}", settings.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
