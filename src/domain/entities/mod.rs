//! # Domain Entities
//!
//! Entities mapping the five Warbler tables.
//!
//! ## Entities
//!
//! - **User**: account with credential hash and profile fields
//! - **Message**: a short text post ("warble") owned by a user
//! - **Comment**: a reply owned by a user, attached to a message
//!
//! ## Relations
//!
//! - **Like**: user ↔ message join, one per pair
//! - **Follow**: follower → followee self-join on users
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait. Methods take `&mut self`
//! because they run inside a unit of work (see
//! [`infrastructure::database::Session`](crate::infrastructure::database::Session));
//! the store implementations live in the infrastructure layer.
//!
//! Relationship predicates (`is_followed_by`, `is_liked_by`) and `serialize`
//! never touch storage. Callers hydrate the rows they need first.

mod comment;
mod follow;
mod like;
mod message;
mod user;

pub use user::{
    NewUser, User, UserId, UserProfileUpdate, UserRepository, DEFAULT_HEADER_IMAGE_URL,
    DEFAULT_IMAGE_URL,
};

#[cfg(test)]
pub use user::MockUserRepository;

pub use message::{
    check_feed_limit, Message, MessageId, MessageJson, MessageRepository, NewMessage,
    MAX_MESSAGE_LENGTH,
};

pub use comment::{Comment, CommentId, CommentJson, CommentRepository, NewComment};

pub use like::{Like, LikeRepository};

pub use follow::{Follow, FollowRepository};
