//! Staff routes for account and topic housekeeping

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
};
use serde_json::json;
use uuid::Uuid;

use super::base;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(overview))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", delete(base::delete_user))
        .route("/admin/topics/:id", delete(delete_topic))
}

/// Record counts
pub async fn overview(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.list().await?;
    let rooms = state.room_repository.count().await?;

    Ok(Json(json!({
        "users": users.len(),
        "rooms": rooms,
    })))
}

/// Get all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.list().await?;
    Ok(Json(users))
}

/// Delete a topic; its rooms stay, without a topic
pub async fn delete_topic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.topic_repository.delete(id).await? {
        return Err(ApiError::NotFound("Topic"));
    }

    Ok(Json(json!({"message": "Topic deleted successfully"})))
}
