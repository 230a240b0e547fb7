//! Table state and schema rules for the in-memory store.
//!
//! Every write checks its constraints before mutating, so a rejected
//! statement leaves the tables untouched. Username and email uniqueness is
//! deferred: [`Tables::check_users_unique`] runs at commit, like the
//! `DEFERRABLE INITIALLY DEFERRED` constraints in the PostgreSQL migration.
//! Constraint names match the migration.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SubsecRound, Utc};

use crate::domain::{
    Comment, CommentId, Follow, Like, Message, MessageId, NewComment, NewMessage, NewUser, User,
    UserId, UserProfileUpdate, DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL, MAX_MESSAGE_LENGTH,
};
use crate::shared::error::AppError;

/// `VARCHAR(n)` check, counted in characters like PostgreSQL.
fn check_varchar(value: &str, limit: usize) -> Result<(), AppError> {
    if value.chars().count() > limit {
        return Err(AppError::ConstraintViolation(format!(
            "value too long for type character varying({})",
            limit
        )));
    }
    Ok(())
}

/// `NOW()` at `TIMESTAMPTZ` precision (microseconds).
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Row for a new user with the column defaults applied.
pub(crate) fn user_row(id: UserId, new: &NewUser) -> User {
    User {
        id,
        email: new.email.clone(),
        username: new.username.clone(),
        image_url: Some(
            new.image_url
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
        ),
        header_image_url: Some(DEFAULT_HEADER_IMAGE_URL.to_string()),
        bio: None,
        location: None,
        password_hash: new.password_hash.clone(),
    }
}

pub(crate) fn message_row(id: MessageId, new: &NewMessage) -> Message {
    Message {
        id,
        text: new.text.clone(),
        timestamp: now(),
        user_id: new.user_id,
    }
}

pub(crate) fn comment_row(id: CommentId, new: &NewComment) -> Comment {
    Comment {
        id,
        text: new.text.clone(),
        timestamp: now(),
        user_id: new.user_id,
        message_id: new.message_id,
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) messages: BTreeMap<MessageId, Message>,
    pub(crate) comments: BTreeMap<CommentId, Comment>,
    pub(crate) likes: BTreeSet<Like>,
    pub(crate) follows: BTreeSet<Follow>,
}

impl Tables {
    // -- Users --

    pub(crate) fn insert_user(&mut self, user: User) -> User {
        self.users.insert(user.id, user.clone());
        user
    }

    pub(crate) fn update_user(
        &mut self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, AppError> {
        let user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(url) = &update.image_url {
            user.image_url = Some(url.clone());
        }
        if let Some(url) = &update.header_image_url {
            user.header_image_url = Some(url.clone());
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(location) = &update.location {
            user.location = Some(location.clone());
        }

        Ok(user.clone())
    }

    /// Deferred uniqueness check for the users in `ids`.
    pub(crate) fn check_users_unique(
        &self,
        ids: impl IntoIterator<Item = UserId>,
    ) -> Result<(), AppError> {
        for id in ids {
            let Some(user) = self.users.get(&id) else {
                continue;
            };
            let others = || self.users.values().filter(move |u| u.id != id);

            if others().any(|u| u.email == user.email) {
                return Err(AppError::Conflict(User::EMAIL_UNIQUE.to_string()));
            }
            if others().any(|u| u.username == user.username) {
                return Err(AppError::Conflict(User::USERNAME_UNIQUE.to_string()));
            }
        }
        Ok(())
    }

    /// Delete a user and everything hanging off them.
    pub(crate) fn delete_user(&mut self, id: UserId) -> Result<(), AppError> {
        if self.users.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        let owned: Vec<MessageId> = self
            .messages
            .values()
            .filter(|m| m.user_id == id)
            .map(|m| m.id)
            .collect();
        for message_id in owned {
            self.cascade_message(message_id);
        }

        self.comments.retain(|_, c| c.user_id != id);
        self.likes.retain(|l| l.user_id != id);
        self.follows
            .retain(|f| f.follower_id != id && f.followee_id != id);
        Ok(())
    }

    fn require_user(&self, id: UserId, constraint: &str) -> Result<(), AppError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    // -- Messages --

    pub(crate) fn insert_message(&mut self, message: Message) -> Result<Message, AppError> {
        check_varchar(&message.text, MAX_MESSAGE_LENGTH)?;
        self.require_user(message.user_id, Message::OWNER_FK)?;

        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    pub(crate) fn delete_message(&mut self, id: MessageId) -> Result<(), AppError> {
        if !self.messages.contains_key(&id) {
            return Err(AppError::NotFound(format!("Message with id {} not found", id)));
        }
        self.cascade_message(id);
        Ok(())
    }

    fn cascade_message(&mut self, id: MessageId) {
        self.messages.remove(&id);
        self.likes.retain(|l| l.message_id != id);
        self.comments.retain(|_, c| c.message_id != id);
    }

    fn require_message(&self, id: MessageId, constraint: &str) -> Result<(), AppError> {
        if self.messages.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    /// Newest first, id breaking ties.
    pub(crate) fn newest_first<'a>(
        messages: impl Iterator<Item = &'a Message>,
        limit: Option<usize>,
    ) -> Vec<Message> {
        let mut selected: Vec<Message> = messages.cloned().collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            selected.truncate(limit);
        }
        selected
    }

    pub(crate) fn timeline(&self, user_id: UserId, limit: usize) -> Vec<Message> {
        let followed: BTreeSet<UserId> = self
            .follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .map(|f| f.followee_id)
            .collect();

        Self::newest_first(
            self.messages
                .values()
                .filter(|m| m.user_id == user_id || followed.contains(&m.user_id)),
            Some(limit),
        )
    }

    // -- Comments --

    pub(crate) fn insert_comment(&mut self, comment: Comment) -> Result<Comment, AppError> {
        check_varchar(&comment.text, MAX_MESSAGE_LENGTH)?;
        self.require_user(comment.user_id, Comment::OWNER_FK)?;
        self.require_message(comment.message_id, Comment::MESSAGE_FK)?;

        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    pub(crate) fn delete_comment(&mut self, id: CommentId) -> Result<(), AppError> {
        self.comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))
    }

    // -- Likes --

    pub(crate) fn insert_like(&mut self, like: Like) -> Result<Like, AppError> {
        if self.likes.contains(&like) {
            return Err(AppError::Conflict(Like::PRIMARY_KEY.to_string()));
        }
        self.require_user(like.user_id, Like::USER_FK)?;
        self.require_message(like.message_id, Like::MESSAGE_FK)?;

        self.likes.insert(like);
        Ok(like)
    }

    // -- Follows --

    pub(crate) fn insert_follow(&mut self, follow: Follow) -> Result<Follow, AppError> {
        if self.follows.contains(&follow) {
            return Err(AppError::Conflict(Follow::PRIMARY_KEY.to_string()));
        }
        self.require_user(follow.followee_id, Follow::FOLLOWEE_FK)?;
        self.require_user(follow.follower_id, Follow::FOLLOWER_FK)?;

        self.follows.insert(follow);
        Ok(follow)
    }

    /// Users picked by `pick` from the follow rows, ordered by id.
    pub(crate) fn users_linked(&self, pick: impl Fn(&Follow) -> Option<UserId>) -> Vec<User> {
        let ids: BTreeSet<UserId> = self.follows.iter().filter_map(pick).collect();
        ids.iter()
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }
}
