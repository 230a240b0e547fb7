//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::like::Like;
use super::user::{User, UserId};
use crate::shared::error::AppError;

/// Surrogate key of the `messages` table.
pub type MessageId = i64;

/// Maximum message length in characters, enforced by the `VARCHAR(140)` column.
pub const MAX_MESSAGE_LENGTH: usize = 140;

/// An individual message ("warble").
///
/// Maps to the `messages` table:
/// - id: BIGINT PRIMARY KEY (identity)
/// - text: VARCHAR(140) NOT NULL
/// - timestamp: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
///
/// Deleting a message removes its likes and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,

    /// Message text (up to 140 characters)
    pub text: String,

    /// When the message was stored
    pub timestamp: DateTime<Utc>,

    /// Owning user
    pub user_id: UserId,
}

/// Flat JSON shape of a message, as handed to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageJson {
    pub id: MessageId,
    pub text: String,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}

impl Message {
    pub const OWNER_FK: &'static str = "messages_user_id_fkey";

    /// Has `user_id` liked this message?
    ///
    /// `likes` is the hydrated like collection, usually from
    /// [`LikeRepository::likes_for_message`](super::LikeRepository::likes_for_message).
    /// Likes on other messages are ignored.
    pub fn is_liked_by(&self, likes: &[Like], user_id: UserId) -> bool {
        likes
            .iter()
            .any(|like| like.message_id == self.id && like.user_id == user_id)
    }

    /// Serialize with the owning user, which the caller must have loaded.
    pub fn serialize(&self, owner: &User) -> Result<MessageJson, AppError> {
        if owner.id != self.user_id {
            return Err(AppError::Internal(format!(
                "Message {} is owned by user {}, not user {}",
                self.id, self.user_id, owner.id
            )));
        }

        Ok(MessageJson {
            id: self.id,
            text: self.text.clone(),
            user_id: self.user_id,
            timestamp: self.timestamp,
            username: owner.username.clone(),
        })
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<id: {}\ntext: {}\nuser_id: {}>",
            self.id, self.text, self.user_id
        )
    }
}

/// A message staged for insertion.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub text: String,
    pub user_id: UserId,
}

impl NewMessage {
    pub fn new(user_id: UserId, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id,
        }
    }
}

/// Reject a negative feed limit before it reaches a store.
///
/// Both stores report it the same way instead of one clamping and the other
/// failing in the driver.
pub fn check_feed_limit(limit: i64) -> Result<i64, AppError> {
    if limit < 0 {
        return Err(AppError::Validation(format!(
            "limit: must not be negative, got {}",
            limit
        )));
    }
    Ok(limit)
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send {
    /// Insert a message. Text longer than 140 characters is rejected by the store.
    async fn insert_message(&mut self, message: &NewMessage) -> Result<Message, AppError>;

    async fn find_message(&mut self, id: MessageId) -> Result<Option<Message>, AppError>;

    /// Delete a message together with its likes and comments.
    async fn delete_message(&mut self, id: MessageId) -> Result<(), AppError>;

    /// Messages written by `user_id`, newest first. A negative `limit`
    /// fails with `Validation`.
    async fn messages_by_user(&mut self, user_id: UserId, limit: i64) -> Result<Vec<Message>, AppError>;

    /// Messages by `user_id` and everyone they follow, newest first.
    async fn timeline(&mut self, user_id: UserId, limit: i64) -> Result<Vec<Message>, AppError>;
}
