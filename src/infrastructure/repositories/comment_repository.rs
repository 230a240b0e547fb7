//! Comment Repository Implementation
//!
//! PostgreSQL implementation of the CommentRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, CommentId, CommentRepository, MessageId, NewComment};
use crate::infrastructure::database::TransactionContext;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    text: String,
    timestamp: DateTime<Utc>,
    user_id: i64,
    message_id: i64,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            text: row.text,
            timestamp: row.timestamp,
            user_id: row.user_id,
            message_id: row.message_id,
        }
    }
}

#[async_trait]
impl CommentRepository for TransactionContext {
    async fn insert_comment(&mut self, comment: &NewComment) -> Result<Comment, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (text, user_id, message_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, timestamp, user_id, message_id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.user_id)
        .bind(comment.message_id)
        .fetch_one(self.conn())
        .await?;

        Ok(row.into())
    }

    async fn find_comment(&mut self, id: CommentId) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, text, timestamp, user_id, message_id FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await?;

        Ok(row.map(Comment::from))
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", id)));
        }

        Ok(())
    }

    async fn comments_for_message(&mut self, message_id: MessageId) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, text, timestamp, user_id, message_id
            FROM comments
            WHERE message_id = $1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(message_id)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
