//! Application state shared across handlers

use std::sync::Arc;

use common::media::FileStore;
use sqlx::PgPool;

use crate::repositories::{MessageRepository, RoomRepository, TopicRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub topic_repository: TopicRepository,
    pub room_repository: RoomRepository,
    pub message_repository: MessageRepository,
}

impl AppState {
    /// Build every repository over one pool and one media store
    pub fn new(pool: PgPool, media: Arc<dyn FileStore>) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone(), media),
            topic_repository: TopicRepository::new(pool.clone()),
            room_repository: RoomRepository::new(pool.clone()),
            message_repository: MessageRepository::new(pool.clone()),
            db_pool: pool,
        }
    }
}
