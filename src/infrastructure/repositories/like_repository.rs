//! Like Repository Implementation
//!
//! PostgreSQL implementation of the LikeRepository trait.
//! Inserting a duplicate like is an error; the composite primary key is the
//! only guard and its violation is surfaced as `AppError::Conflict`.

use async_trait::async_trait;

use super::message_repository::MessageRow;
use crate::domain::{Like, LikeRepository, Message, MessageId, UserId};
use crate::infrastructure::database::TransactionContext;
use crate::shared::error::AppError;

#[async_trait]
impl LikeRepository for TransactionContext {
    async fn insert_like(&mut self, like: Like) -> Result<Like, AppError> {
        sqlx::query("INSERT INTO likes (user_id, message_id) VALUES ($1, $2)")
            .bind(like.user_id)
            .bind(like.message_id)
            .execute(self.conn())
            .await?;

        Ok(like)
    }

    async fn delete_like(&mut self, like: Like) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND message_id = $2")
            .bind(like.user_id)
            .bind(like.message_id)
            .execute(self.conn())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn like_exists(&mut self, like: Like) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND message_id = $2)",
        )
        .bind(like.user_id)
        .bind(like.message_id)
        .fetch_one(self.conn())
        .await?;

        Ok(exists)
    }

    async fn likes_for_message(&mut self, message_id: MessageId) -> Result<Vec<Like>, AppError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT user_id, message_id FROM likes WHERE message_id = $1 ORDER BY user_id",
        )
        .bind(message_id)
        .fetch_all(self.conn())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, message_id)| Like::new(user_id, message_id))
            .collect())
    }

    async fn liked_messages(&mut self, user_id: UserId) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT m.id, m.text, m.timestamp, m.user_id
            FROM messages m
            INNER JOIN likes l ON l.message_id = m.id
            WHERE l.user_id = $1
            ORDER BY m.timestamp DESC, m.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }
}
