//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Maps between the `users` table and the domain User entity.

use async_trait::async_trait;

use crate::domain::{
    NewUser, User, UserId, UserProfileUpdate, UserRepository, DEFAULT_IMAGE_URL,
};
use crate::infrastructure::database::TransactionContext;
use crate::shared::error::AppError;

/// Database row representation matching the users table schema.
/// The credential column is `password`; the domain calls it `password_hash`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: i64,
    email: String,
    username: String,
    image_url: Option<String>,
    header_image_url: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    password: String,
}

impl UserRow {
    /// Convert database row to domain User entity.
    pub(crate) fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            image_url: self.image_url,
            header_image_url: self.header_image_url,
            bio: self.bio,
            location: self.location,
            password_hash: self.password,
        }
    }
}

/// Column list shared by every users query.
pub(crate) const USER_COLUMNS: &str =
    "id, email, username, image_url, header_image_url, bio, location, password";

#[async_trait]
impl UserRepository for TransactionContext {
    /// Insert a new user.
    ///
    /// A missing `image_url` is stored as the column default.
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL))
        .fetch_one(self.conn())
        .await?;

        Ok(row.into_user())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.conn())
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(self.conn())
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Substring match on username.
    ///
    /// `strpos` instead of LIKE so `%` and `_` in the query match literally.
    async fn search_users(&mut self, query: &str) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE strpos(username, $1) > 0 ORDER BY id",
            USER_COLUMNS
        ))
        .bind(query)
        .fetch_all(self.conn())
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn update_user(&mut self, id: UserId, update: &UserProfileUpdate) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                image_url = COALESCE($4, image_url),
                header_image_url = COALESCE($5, header_image_url),
                bio = COALESCE($6, bio),
                location = COALESCE($7, location)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.image_url)
        .bind(&update.header_image_url)
        .bind(&update.bio)
        .bind(&update.location)
        .fetch_optional(self.conn())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        Ok(row.into_user())
    }

    /// Delete a user (hard delete). Dependent rows are removed by
    /// ON DELETE CASCADE.
    async fn delete_user(&mut self, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        Ok(())
    }
}
