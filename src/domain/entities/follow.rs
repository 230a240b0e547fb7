//! Follow relation and repository trait.
//!
//! Maps to the `follows` table in the database schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};
use crate::shared::error::AppError;

/// A row of the follow graph: `follower_id` follows `followee_id`.
///
/// Maps to the `follows` table:
/// - followee_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE (composite PK)
/// - follower_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE (composite PK)
///
/// Self-follows are not rejected by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: UserId,
    pub followee_id: UserId,
}

impl Follow {
    /// Name of the composite primary key.
    pub const PRIMARY_KEY: &'static str = "follows_pkey";
    pub const FOLLOWER_FK: &'static str = "follows_follower_id_fkey";
    pub const FOLLOWEE_FK: &'static str = "follows_followee_id_fkey";

    pub fn new(follower_id: UserId, followee_id: UserId) -> Self {
        Self {
            follower_id,
            followee_id,
        }
    }

    /// Whether the row links a user to themself.
    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.followee_id
    }
}

/// Repository trait for the follow graph.
#[async_trait]
pub trait FollowRepository: Send {
    /// Insert a follow row. Fails with `Conflict` if the pair already exists.
    async fn insert_follow(&mut self, follow: Follow) -> Result<Follow, AppError>;

    /// Remove a follow row. Returns whether a row was removed.
    async fn delete_follow(&mut self, follow: Follow) -> Result<bool, AppError>;

    /// Every row where `user_id` is the follower or the followee.
    async fn follows_involving(&mut self, user_id: UserId) -> Result<Vec<Follow>, AppError>;

    /// Users following `user_id`, ordered by id.
    async fn followers(&mut self, user_id: UserId) -> Result<Vec<User>, AppError>;

    /// Users that `user_id` follows, ordered by id.
    async fn following(&mut self, user_id: UserId) -> Result<Vec<User>, AppError>;
}
