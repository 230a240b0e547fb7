//! Authentication Service
//!
//! Signup and credential checks against the caller's session.

use std::sync::Arc;

use tracing::instrument;
use validator::Validate;

use super::credentials::CredentialHasher;
use crate::application::dto::SignupRequest;
use crate::domain::{NewUser, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

/// Signup and authentication.
#[derive(Clone)]
pub struct AuthService {
    hasher: Arc<CredentialHasher>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(hasher: Arc<CredentialHasher>) -> Self {
        Self { hasher }
    }

    /// Hash the password and stage a new user in `repo`.
    ///
    /// Nothing is committed. A taken username or email is reported by the
    /// caller's commit as `AppError::Conflict` naming the violated
    /// constraint.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn signup<R>(&self, repo: &mut R, request: SignupRequest) -> Result<User, AppError>
    where
        R: UserRepository + ?Sized,
    {
        request.validate().map_err(validation_error)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let new_user = NewUser {
            image_url: request.image_url().map(str::to_string),
            username: request.username,
            email: request.email,
            password_hash,
        };

        let user = repo.insert_user(&new_user).await?;
        tracing::debug!(user_id = user.id, "User staged");

        Ok(user)
    }

    /// Look up `username` and check `password` against the stored hash.
    ///
    /// Returns `None` for an unknown username and for a wrong password alike.
    /// An unknown username still costs one hash verification.
    #[instrument(skip(self, repo, password))]
    pub async fn authenticate<R>(
        &self,
        repo: &mut R,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError>
    where
        R: UserRepository + ?Sized,
    {
        let Some(user) = repo.find_user_by_username(username).await? else {
            self.hasher.verify_dummy(password)?;
            tracing::debug!("Authentication failed");
            return Ok(None);
        };

        if self.hasher.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Authenticated");
            Ok(Some(user))
        } else {
            tracing::debug!("Authentication failed");
            Ok(None)
        }
    }
}
