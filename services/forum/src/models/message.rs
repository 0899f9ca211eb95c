//! Message model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Characters of the body shown when a message is displayed
const PREVIEW_CHARS: usize = 50;

/// Post within a room. Deleted along with its room or its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub body: String,
    pub updated: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.body.char_indices().nth(PREVIEW_CHARS) {
            Some((end, _)) => f.write_str(&self.body[..end]),
            None => f.write_str(&self.body),
        }
    }
}

/// Message joined with its author and room, as shown in feeds
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub message: Message,
    pub author_email: String,
    pub author_name: Option<String>,
    pub author_avatar: String,
    pub room_name: String,
}

/// Message posting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub user_id: Uuid,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> Message {
        let now = Utc::now();
        Message {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            body: body.to_string(),
            updated: now,
            created: now,
        }
    }

    #[test]
    fn test_short_body_is_displayed_whole() {
        assert_eq!(message("hello").to_string(), "hello");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(80);
        assert_eq!(message(&body).to_string(), "x".repeat(50));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let body = "é".repeat(60);
        assert_eq!(message(&body).to_string().chars().count(), 50);
    }
}
