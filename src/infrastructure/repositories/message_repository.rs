//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait.
//! Feeds are ordered newest first with the id as a tie breaker, so two
//! messages stored in the same transaction keep a stable order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{check_feed_limit, Message, MessageId, MessageRepository, NewMessage, UserId};
use crate::infrastructure::database::TransactionContext;
use crate::shared::error::AppError;

/// Database row representation of the messages table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRow {
    id: i64,
    text: String,
    timestamp: DateTime<Utc>,
    user_id: i64,
}

impl MessageRow {
    pub(crate) fn into_message(self) -> Message {
        Message {
            id: self.id,
            text: self.text,
            timestamp: self.timestamp,
            user_id: self.user_id,
        }
    }
}

#[async_trait]
impl MessageRepository for TransactionContext {
    async fn insert_message(&mut self, message: &NewMessage) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (text, user_id)
            VALUES ($1, $2)
            RETURNING id, text, timestamp, user_id
            "#,
        )
        .bind(&message.text)
        .bind(message.user_id)
        .fetch_one(self.conn())
        .await?;

        Ok(row.into_message())
    }

    async fn find_message(&mut self, id: MessageId) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT id, text, timestamp, user_id FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await?;

        Ok(row.map(MessageRow::into_message))
    }

    /// Likes and comments are removed by ON DELETE CASCADE.
    async fn delete_message(&mut self, id: MessageId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Message with id {} not found", id)));
        }

        Ok(())
    }

    async fn messages_by_user(&mut self, user_id: UserId, limit: i64) -> Result<Vec<Message>, AppError> {
        let limit = check_feed_limit(limit)?;
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, text, timestamp, user_id
            FROM messages
            WHERE user_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }

    async fn timeline(&mut self, user_id: UserId, limit: i64) -> Result<Vec<Message>, AppError> {
        let limit = check_feed_limit(limit)?;
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT m.id, m.text, m.timestamp, m.user_id
            FROM messages m
            WHERE m.user_id = $1
               OR m.user_id IN (SELECT followee_id FROM follows WHERE follower_id = $1)
            ORDER BY m.timestamp DESC, m.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }
}
