//! Room model and related functionality

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Discussion channel. Listed most recently updated first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub host_id: Option<Uuid>,
    pub topic_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub updated: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Room joined with the names shown next to it in listings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoomView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub room: Room,
    pub topic_name: Option<String>,
    pub host_name: Option<String>,
    pub participant_count: i64,
}

/// Room creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub host_id: Option<Uuid>,
    /// Topic name; the topic is created if none has this name yet
    pub topic: String,
    pub name: String,
    pub description: Option<String>,
}

/// Room update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRoom {
    pub topic: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Listing filter, matched against topic name, room name and description
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomQuery {
    pub q: Option<String>,
}

impl RoomQuery {
    /// `ILIKE` pattern for the query, `%` when no filter was given
    pub fn pattern(&self) -> String {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => format!("%{}%", escape_like(q)),
            _ => "%".to_string(),
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
