//! Topic repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::models::{RoomQuery, Topic};

/// Topic repository
#[derive(Clone)]
pub struct TopicRepository {
    pool: PgPool,
}

impl TopicRepository {
    /// Create a new topic repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List topics, optionally filtered by a name substring
    pub async fn list(&self, query: &RoomQuery) -> Result<Vec<Topic>> {
        let topics = sqlx::query_as::<_, Topic>(
            r#"
            SELECT id, name
            FROM topics
            WHERE name ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(query.pattern())
        .fetch_all(&self.pool)
        .await?;

        Ok(topics)
    }

    /// Find the topic called `name`, creating it if there is none
    pub async fn get_or_create(&self, name: &str) -> Result<Topic> {
        let mut tx = self.pool.begin().await?;
        let topic = get_or_create_in(&mut tx, name).await?;
        tx.commit().await?;
        Ok(topic)
    }

    /// Delete a topic. Rooms filed under it keep existing without a topic.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting topic {}", id);

        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Get-or-create inside an open transaction.
///
/// Names are not unique; any row with a matching name is reused.
pub(crate) async fn get_or_create_in(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> Result<Topic> {
    let name = name.trim();

    let existing = sqlx::query_as::<_, Topic>(
        "SELECT id, name FROM topics WHERE name = $1 ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(topic) = existing {
        return Ok(topic);
    }

    info!("Creating topic: {}", name);
    let topic = sqlx::query_as::<_, Topic>(
        "INSERT INTO topics (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await?;

    Ok(topic)
}
