//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::follow::Follow;
use crate::shared::error::AppError;

/// Surrogate key of the `users` table.
pub type UserId = i64;

/// Column default for `users.image_url`.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Column default for `users.header_image_url`.
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (identity)
/// - email: TEXT NOT NULL UNIQUE
/// - username: TEXT NOT NULL UNIQUE
/// - image_url: TEXT NULL DEFAULT '/static/images/default-pic.png'
/// - header_image_url: TEXT NULL DEFAULT '/static/images/warbler-hero.jpg'
/// - bio: TEXT NULL
/// - location: TEXT NULL
/// - password: TEXT NOT NULL (Argon2 PHC string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate primary key
    pub id: UserId,

    /// Email address (unique)
    pub email: String,

    /// Username (unique)
    pub username: String,

    /// Avatar image URL
    pub image_url: Option<String>,

    /// Profile header image URL
    pub header_image_url: Option<String>,

    pub bio: Option<String>,

    pub location: Option<String>,

    /// Argon2 password hash, never the plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Name of the unique constraint on `users.email`.
    pub const EMAIL_UNIQUE: &'static str = "users_email_key";

    /// Name of the unique constraint on `users.username`.
    pub const USERNAME_UNIQUE: &'static str = "users_username_key";

    /// Is this user followed by `other`?
    ///
    /// `follows` is the hydrated follow collection for this user, usually
    /// loaded with [`FollowRepository::follows_involving`](super::FollowRepository::follows_involving).
    /// Rows that do not point at this user are ignored.
    pub fn is_followed_by(&self, follows: &[Follow], other: &User) -> bool {
        follows
            .iter()
            .any(|f| f.followee_id == self.id && f.follower_id == other.id)
    }

    /// Is this user following `other`?
    pub fn is_following(&self, follows: &[Follow], other: &User) -> bool {
        follows
            .iter()
            .any(|f| f.follower_id == self.id && f.followee_id == other.id)
    }

    /// Avatar URL, falling back to the column default.
    pub fn image_url_or_default(&self) -> &str {
        self.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL)
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

/// A user staged for insertion. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// `None` stores the column default.
    pub image_url: Option<String>,
}

/// Profile changes applied by [`UserRepository::update_user`].
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Repository trait for User data access operations.
///
/// Every method runs inside the caller's unit of work; nothing here commits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send {
    /// Stage a new user. A duplicate username or email is not detected here;
    /// it fails the commit with `Conflict` naming the constraint.
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError>;

    /// Find a user by id.
    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, AppError>;

    /// Find a user by exact username.
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, AppError>;

    /// Users whose username contains `query`, ordered by id.
    async fn search_users(&mut self, query: &str) -> Result<Vec<User>, AppError>;

    /// Apply a profile update. A username or email clash fails the commit.
    async fn update_user(&mut self, id: UserId, update: &UserProfileUpdate) -> Result<User, AppError>;

    /// Delete a user; messages, comments, likes and follows go with it.
    async fn delete_user(&mut self, id: UserId) -> Result<(), AppError>;
}
