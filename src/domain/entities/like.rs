//! Like relation and repository trait.
//!
//! Maps to the `likes` table in the database schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::message::{Message, MessageId};
use super::user::UserId;
use crate::shared::error::AppError;

/// A user liking a message.
///
/// Maps to the `likes` table:
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE (composite PK)
/// - message_id: BIGINT NOT NULL REFERENCES messages(id) ON DELETE CASCADE (composite PK)
///
/// The composite primary key allows one like per user per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Like {
    pub user_id: UserId,
    pub message_id: MessageId,
}

impl Like {
    /// Name of the composite primary key.
    pub const PRIMARY_KEY: &'static str = "likes_pkey";
    pub const USER_FK: &'static str = "likes_user_id_fkey";
    pub const MESSAGE_FK: &'static str = "likes_message_id_fkey";

    pub fn new(user_id: UserId, message_id: MessageId) -> Self {
        Self {
            user_id,
            message_id,
        }
    }
}

/// Repository trait for likes.
#[async_trait]
pub trait LikeRepository: Send {
    /// Insert a like. Fails with `Conflict` if the pair already exists.
    async fn insert_like(&mut self, like: Like) -> Result<Like, AppError>;

    /// Remove a like. Returns whether a row was removed.
    async fn delete_like(&mut self, like: Like) -> Result<bool, AppError>;

    async fn like_exists(&mut self, like: Like) -> Result<bool, AppError>;

    /// Every like on `message_id`, ordered by user id.
    async fn likes_for_message(&mut self, message_id: MessageId) -> Result<Vec<Like>, AppError>;

    /// Messages liked by `user_id`, newest first.
    async fn liked_messages(&mut self, user_id: UserId) -> Result<Vec<Message>, AppError>;

    /// Like the message if not yet liked, otherwise remove the like.
    ///
    /// Returns the liked state after the call.
    async fn toggle_like(&mut self, like: Like) -> Result<bool, AppError> {
        if self.like_exists(like).await? {
            self.delete_like(like).await?;
            Ok(false)
        } else {
            self.insert_like(like).await?;
            Ok(true)
        }
    }
}
