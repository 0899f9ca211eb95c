//! Room repository for database operations

use anyhow::Result;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewRoom, Room, RoomQuery, RoomView, UpdateRoom, User};
use crate::repositories::topic::get_or_create_in;

/// Room repository
#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Create a new room repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List rooms whose topic, name or description matches the query
    pub async fn list(&self, query: &RoomQuery) -> Result<Vec<RoomView>> {
        let rooms = sqlx::query_as::<_, RoomView>(
            r#"
            SELECT r.id, r.host_id, r.topic_id, r.name, r.description, r.updated, r.created,
                   t.name AS topic_name,
                   COALESCE(u.name, u.email) AS host_name,
                   (SELECT COUNT(*) FROM room_participants p WHERE p.room_id = r.id)
                       AS participant_count
            FROM rooms r
            LEFT JOIN topics t ON t.id = r.topic_id
            LEFT JOIN users u ON u.id = r.host_id
            WHERE t.name ILIKE $1 OR r.name ILIKE $1 OR r.description ILIKE $1
            ORDER BY r.updated DESC, r.created DESC
            "#,
        )
        .bind(query.pattern())
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Rooms hosted by a user
    pub async fn hosted_by(&self, user_id: Uuid) -> Result<Vec<RoomView>> {
        let rooms = sqlx::query_as::<_, RoomView>(
            r#"
            SELECT r.id, r.host_id, r.topic_id, r.name, r.description, r.updated, r.created,
                   t.name AS topic_name,
                   COALESCE(u.name, u.email) AS host_name,
                   (SELECT COUNT(*) FROM room_participants p WHERE p.room_id = r.id)
                       AS participant_count
            FROM rooms r
            LEFT JOIN topics t ON t.id = r.topic_id
            LEFT JOIN users u ON u.id = r.host_id
            WHERE r.host_id = $1
            ORDER BY r.updated DESC, r.created DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Get a room by ID, with its listing details
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RoomView>> {
        let room = sqlx::query_as::<_, RoomView>(
            r#"
            SELECT r.id, r.host_id, r.topic_id, r.name, r.description, r.updated, r.created,
                   t.name AS topic_name,
                   COALESCE(u.name, u.email) AS host_name,
                   (SELECT COUNT(*) FROM room_participants p WHERE p.room_id = r.id)
                       AS participant_count
            FROM rooms r
            LEFT JOIN topics t ON t.id = r.topic_id
            LEFT JOIN users u ON u.id = r.host_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Create a room, filing it under the named topic.
    ///
    /// The topic is created when no topic has that name yet, and the host
    /// joins the room as its first participant.
    pub async fn create(&self, new_room: &NewRoom) -> Result<Room> {
        info!("Creating room: {}", new_room.name);

        let mut tx = self.pool.begin().await?;
        let topic = get_or_create_in(&mut tx, &new_room.topic).await?;

        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (host_id, topic_id, name, description)
            VALUES ($1, $2, $3, NULLIF($4, ''))
            RETURNING id, host_id, topic_id, name, description, updated, created
            "#,
        )
        .bind(new_room.host_id)
        .bind(topic.id)
        .bind(new_room.name.trim())
        .bind(&new_room.description)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(host_id) = room.host_id {
            add_participant_in(&mut tx, room.id, host_id).await?;
        }

        tx.commit().await?;
        Ok(room)
    }

    /// Update a room. `None` if it does not exist.
    ///
    /// Fields left out keep their value; an empty description clears it.
    pub async fn update(&self, id: Uuid, changes: &UpdateRoom) -> Result<Option<Room>> {
        info!("Updating room {}", id);

        let mut tx = self.pool.begin().await?;
        let topic_id = match &changes.topic {
            Some(name) => Some(get_or_create_in(&mut tx, name).await?.id),
            None => None,
        };

        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 IS NULL THEN description ELSE NULLIF($3, '') END,
                topic_id = COALESCE($4, topic_id),
                updated = NOW()
            WHERE id = $1
            RETURNING id, host_id, topic_id, name, description, updated, created
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(&changes.description)
        .bind(topic_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(room)
    }

    /// Delete a room and, through the schema, its messages
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting room {}", id);

        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Users taking part in a room
    pub async fn participants(&self, room_id: Uuid) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.bio, u.avatar, u.password_hash, u.is_active,
                   u.is_staff, u.is_superuser, u.last_login, u.date_joined
            FROM users u
            JOIN room_participants p ON p.user_id = u.id
            WHERE p.room_id = $1
            ORDER BY u.email
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Add a user to a room's participants, a no-op if already there
    pub async fn add_participant(&self, room_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        add_participant_in(&mut conn, room_id, user_id).await
    }

    /// Total number of rooms
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Add a participant on an open connection or transaction
pub(crate) async fn add_participant_in(
    conn: &mut PgConnection,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO room_participants (room_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(room_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
