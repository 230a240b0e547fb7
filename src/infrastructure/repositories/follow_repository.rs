//! Follow Repository Implementation
//!
//! PostgreSQL implementation of the FollowRepository trait.

use async_trait::async_trait;

use super::user_repository::UserRow;
use crate::domain::{Follow, FollowRepository, User, UserId};
use crate::infrastructure::database::TransactionContext;
use crate::shared::error::AppError;

#[async_trait]
impl FollowRepository for TransactionContext {
    async fn insert_follow(&mut self, follow: Follow) -> Result<Follow, AppError> {
        sqlx::query("INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2)")
            .bind(follow.follower_id)
            .bind(follow.followee_id)
            .execute(self.conn())
            .await?;

        Ok(follow)
    }

    async fn delete_follow(&mut self, follow: Follow) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
                .bind(follow.follower_id)
                .bind(follow.followee_id)
                .execute(self.conn())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn follows_involving(&mut self, user_id: UserId) -> Result<Vec<Follow>, AppError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT follower_id, followee_id
            FROM follows
            WHERE follower_id = $1 OR followee_id = $1
            ORDER BY follower_id, followee_id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.conn())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(follower_id, followee_id)| Follow::new(follower_id, followee_id))
            .collect())
    }

    async fn followers(&mut self, user_id: UserId) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.username, u.image_url, u.header_image_url,
                   u.bio, u.location, u.password
            FROM users u
            INNER JOIN follows f ON f.follower_id = u.id
            WHERE f.followee_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn following(&mut self, user_id: UserId) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.username, u.image_url, u.header_image_url,
                   u.bio, u.location, u.password
            FROM users u
            INNER JOIN follows f ON f.followee_id = u.id
            WHERE f.follower_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}
