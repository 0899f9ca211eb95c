//! Forum service routes
//!
//! The route table has three groups: the application routes at the site
//! root, the read-only API under `/api`, and a small staff area under
//! `/admin`. Uploaded media is served from the media root, under the
//! configured media URL in debug mode and under `/images` otherwise.

use axum::Router;
use common::config::Settings;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::AppState;

mod admin;
mod api;
mod base;

/// URL prefix media is served under in production
pub const PRODUCTION_MEDIA_PREFIX: &str = "/images";

/// Create the router for the forum service
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let router = Router::new()
        .merge(base::router())
        .merge(api::router())
        .merge(admin::router())
        .with_state(state);

    serve_media(router, settings).layer(TraceLayer::new_for_http())
}

fn serve_media(router: Router, settings: &Settings) -> Router {
    let prefix = if settings.debug {
        settings.media_prefix()
    } else {
        PRODUCTION_MEDIA_PREFIX
    };

    info!(
        "Serving media from {} under {}",
        settings.media_root.display(),
        prefix
    );
    router.nest_service(prefix, ServeDir::new(&settings.media_root))
}


#[cfg(test)]
mod tests {
    use super::testing::{settings, state};
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn media_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("avatar.svg"), b"<svg/>").unwrap();
        temp_dir
    }

    #[tokio::test]
    async fn test_debug_mode_serves_media_under_media_url() {
        let temp_dir = media_dir();
        let settings = settings(temp_dir.path(), true);
        let router = create_router(state(&settings), &settings);

        let (status, body) = get(router.clone(), "/media/avatar.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<svg/>");

        let (status, _) = get(router, "/images/avatar.svg").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_production_mode_serves_media_under_images() {
        let temp_dir = media_dir();
        let settings = settings(temp_dir.path(), false);
        let router = create_router(state(&settings), &settings);

        let (status, body) = get(router.clone(), "/images/avatar.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<svg/>");

        let (status, _) = get(router, "/media/avatar.svg").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_media_is_not_found() {
        let temp_dir = media_dir();
        let settings = settings(temp_dir.path(), false);
        let router = create_router(state(&settings), &settings);

        let (status, _) = get(router, "/images/nobody.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_check() {
        let temp_dir = media_dir();
        let settings = settings(temp_dir.path(), false);
        let router = create_router(state(&settings), &settings);

        let (status, body) = get(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
