//! Comment entity and repository trait.
//!
//! Maps to the `comments` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::MessageId;
use super::user::{User, UserId};
use crate::shared::error::AppError;

pub type CommentId = i64;

/// A reply attached to a message.
///
/// Maps to the `comments` table:
/// - id: BIGINT PRIMARY KEY (identity)
/// - text: VARCHAR(140) NOT NULL
/// - timestamp: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - message_id: BIGINT NOT NULL REFERENCES messages(id) ON DELETE CASCADE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub message_id: MessageId,
}

/// Flat JSON shape of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentJson {
    pub id: CommentId,
    pub text: String,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub msg_id: MessageId,
    pub image_url: Option<String>,
}

impl Comment {
    pub const OWNER_FK: &'static str = "comments_user_id_fkey";
    pub const MESSAGE_FK: &'static str = "comments_message_id_fkey";

    /// Serialize with the commenting user, which the caller must have loaded.
    pub fn serialize(&self, owner: &User) -> Result<CommentJson, AppError> {
        if owner.id != self.user_id {
            return Err(AppError::Internal(format!(
                "Comment {} is owned by user {}, not user {}",
                self.id, self.user_id, owner.id
            )));
        }

        Ok(CommentJson {
            id: self.id,
            text: self.text.clone(),
            user_id: self.user_id,
            timestamp: self.timestamp,
            username: owner.username.clone(),
            msg_id: self.message_id,
            image_url: owner.image_url.clone(),
        })
    }
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<id: {}\ntext: {}\nuser_id: {}\nmessage_id: {}>",
            self.id, self.text, self.user_id, self.message_id
        )
    }
}

/// A comment staged for insertion.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub user_id: UserId,
    pub message_id: MessageId,
}

impl NewComment {
    pub fn new(user_id: UserId, message_id: MessageId, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id,
            message_id,
        }
    }
}

/// Repository trait for Comment data access operations.
#[async_trait]
pub trait CommentRepository: Send {
    async fn insert_comment(&mut self, comment: &NewComment) -> Result<Comment, AppError>;

    async fn find_comment(&mut self, id: CommentId) -> Result<Option<Comment>, AppError>;

    async fn delete_comment(&mut self, id: CommentId) -> Result<(), AppError>;

    /// Comments on `message_id`, oldest first.
    async fn comments_for_message(&mut self, message_id: MessageId) -> Result<Vec<Comment>, AppError>;
}
