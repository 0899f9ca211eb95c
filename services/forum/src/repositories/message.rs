//! Message repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{Message, MessageView, NewMessage, RoomQuery};
use crate::repositories::room::add_participant_in;

/// Message repository
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Messages posted in a room
    pub async fn list_for_room(&self, room_id: Uuid) -> Result<Vec<MessageView>> {
        let messages = sqlx::query_as::<_, MessageView>(
            r#"
            SELECT m.id, m.user_id, m.room_id, m.body, m.updated, m.created,
                   u.email AS author_email, u.name AS author_name, u.avatar AS author_avatar,
                   r.name AS room_name
            FROM messages m
            JOIN users u ON u.id = m.user_id
            JOIN rooms r ON r.id = m.room_id
            WHERE m.room_id = $1
            ORDER BY m.updated DESC, m.created DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Activity feed: latest messages in rooms whose topic matches the query
    pub async fn recent(&self, query: &RoomQuery, limit: i64) -> Result<Vec<MessageView>> {
        let messages = sqlx::query_as::<_, MessageView>(
            r#"
            SELECT m.id, m.user_id, m.room_id, m.body, m.updated, m.created,
                   u.email AS author_email, u.name AS author_name, u.avatar AS author_avatar,
                   r.name AS room_name
            FROM messages m
            JOIN users u ON u.id = m.user_id
            JOIN rooms r ON r.id = m.room_id
            LEFT JOIN topics t ON t.id = r.topic_id
            WHERE $1 = '%' OR t.name ILIKE $1
            ORDER BY m.updated DESC, m.created DESC
            LIMIT $2
            "#,
        )
        .bind(query.pattern())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Messages written by a user
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MessageView>> {
        let messages = sqlx::query_as::<_, MessageView>(
            r#"
            SELECT m.id, m.user_id, m.room_id, m.body, m.updated, m.created,
                   u.email AS author_email, u.name AS author_name, u.avatar AS author_avatar,
                   r.name AS room_name
            FROM messages m
            JOIN users u ON u.id = m.user_id
            JOIN rooms r ON r.id = m.room_id
            WHERE m.user_id = $1
            ORDER BY m.updated DESC, m.created DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Get a message by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT id, user_id, room_id, body, updated, created FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Post a message. The author joins the room's participants and the
    /// room moves to the top of the listing.
    pub async fn create(&self, room_id: Uuid, new_message: &NewMessage) -> Result<Message> {
        info!("User {} posting in room {}", new_message.user_id, room_id);

        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (user_id, room_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, room_id, body, updated, created
            "#,
        )
        .bind(new_message.user_id)
        .bind(room_id)
        .bind(&new_message.body)
        .fetch_one(&mut *tx)
        .await?;

        add_participant_in(&mut tx, room_id, new_message.user_id).await?;

        sqlx::query("UPDATE rooms SET updated = NOW() WHERE id = $1")
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Delete a message
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting message {}", id);

        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
