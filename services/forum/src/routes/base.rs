//! Application routes
//!
//! These back the site's pages. They answer with JSON; rendering is left to
//! the front end.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{NewMessage, NewRoom, NewUser, RoomQuery, UpdateRoom, UpdateUser},
    validation::validate_name,
};

/// Topics shown next to the room listing on the home page
const HOME_TOPICS: usize = 5;
/// Messages in the home page's activity column
const HOME_ACTIVITY: i64 = 3;
/// Messages on the full activity page
const ACTIVITY_PAGE: i64 = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/room/:id", get(room).post(post_message))
        .route("/profile/:id", get(profile))
        .route("/create-room", post(create_room))
        .route("/update-room/:id", post(update_room))
        .route("/delete-room/:id", post(delete_room))
        .route("/delete-message/:id", post(delete_message))
        .route("/update-user/:id", post(update_user))
        .route("/delete-user/:id", post(delete_user))
        .route("/topics", get(topics))
        .route("/activity", get(activity))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "forum"
    }))
}

/// Room listing filtered by `?q=`, with topics and recent activity
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
) -> ApiResult<impl IntoResponse> {
    let rooms = state.room_repository.list(&query).await?;
    let mut topics = state.topic_repository.list(&RoomQuery::default()).await?;
    topics.truncate(HOME_TOPICS);
    let activity = state
        .message_repository
        .recent(&query, HOME_ACTIVITY)
        .await?;

    Ok(Json(json!({
        "room_count": rooms.len(),
        "rooms": rooms,
        "topics": topics,
        "activity": activity,
    })))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_repository.create_user(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// A room with its messages and participants
pub async fn room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let room = state
        .room_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Room"))?;
    let messages = state.message_repository.list_for_room(id).await?;
    let participants = state.room_repository.participants(id).await?;

    Ok(Json(json!({
        "room": room,
        "messages": messages,
        "participants": participants,
    })))
}

/// Post a message in a room
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewMessage>,
) -> ApiResult<impl IntoResponse> {
    if payload.body.trim().is_empty() {
        return Err(ApiError::BadRequest("Message body is required".to_string()));
    }

    state
        .room_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Room"))?;

    let message = state.message_repository.create(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// A user's profile: hosted rooms and written messages
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let rooms = state.room_repository.hosted_by(id).await?;
    let messages = state.message_repository.list_for_user(id).await?;
    let topics = state.topic_repository.list(&RoomQuery::default()).await?;

    Ok(Json(json!({
        "user": user,
        "rooms": rooms,
        "messages": messages,
        "topics": topics,
    })))
}

/// Create a room
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<NewRoom>,
) -> ApiResult<impl IntoResponse> {
    validate_name("name", &payload.name)?;
    validate_name("topic", &payload.topic)?;

    let room = state.room_repository.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Edit a room
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoom>,
) -> ApiResult<impl IntoResponse> {
    if let Some(name) = &payload.name {
        validate_name("name", name)?;
    }
    if let Some(topic) = &payload.topic {
        validate_name("topic", topic)?;
    }

    let room = state
        .room_repository
        .update(id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Room"))?;

    Ok(Json(room))
}

/// Delete a room
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.room_repository.delete(id).await? {
        return Err(ApiError::NotFound("Room"));
    }

    Ok(Json(json!({"message": "Room deleted successfully"})))
}

/// Delete a message
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.message_repository.delete(id).await? {
        return Err(ApiError::NotFound("Message"));
    }

    Ok(Json(json!({"message": "Message deleted successfully"})))
}

/// Edit a user's profile, including replacing the avatar
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<impl IntoResponse> {
    let saved = state
        .user_repository
        .update_profile(id, &payload)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(saved.user))
}

/// Delete a user account and its avatar
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let avatar = state.user_repository.delete(&user).await?;

    Ok(Json(json!({
        "message": "User deleted successfully",
        "avatar_deleted": avatar.deleted(),
    })))
}

/// Topics, filtered by `?q=`
pub async fn topics(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
) -> ApiResult<impl IntoResponse> {
    let topics = state.topic_repository.list(&query).await?;
    Ok(Json(topics))
}

/// Recent messages across rooms, filtered by topic with `?q=`
pub async fn activity(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
) -> ApiResult<impl IntoResponse> {
    let messages = state
        .message_repository
        .recent(&query, ACTIVITY_PAGE)
        .await?;
    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{settings, state};
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_empty_message_is_rejected_before_touching_the_database() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(temp_dir.path(), false);
        let app = router().with_state(state(&settings));

        let body = json!({"user_id": Uuid::new_v4(), "body": "   "}).to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/room/{}", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_room_name_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(temp_dir.path(), false);
        let app = router().with_state(state(&settings));

        let body = json!({"host_id": null, "topic": "Rust", "name": " "}).to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/create-room")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(temp_dir.path(), false);
        let app = router().with_state(state(&settings));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/room/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
