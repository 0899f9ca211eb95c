//! Read-only JSON API

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::RoomQuery,
};

/// Routes advertised by the API index
const ROUTES: [&str; 3] = ["GET /api", "GET /api/rooms", "GET /api/rooms/:id"];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", get(get_routes))
        .route("/api/", get(get_routes))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/:id", get(get_room))
}

/// List the API routes
pub async fn get_routes() -> impl IntoResponse {
    Json(ROUTES)
}

/// Get all rooms
pub async fn get_rooms(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let rooms = state.room_repository.list(&RoomQuery::default()).await?;
    Ok(Json(rooms))
}

/// Get a room by ID
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let room = state
        .room_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Room"))?;

    Ok(Json(room))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{settings, state};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_api_index_lists_routes() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(temp_dir.path(), false);
        let app = router().with_state(state(&settings));

        for uri in ["/api", "/api/"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let routes: Vec<String> = serde_json::from_slice(&body).unwrap();
            assert_eq!(routes, ROUTES);
        }
    }
}
