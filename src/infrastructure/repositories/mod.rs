//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! Every trait is implemented directly on
//! [`TransactionContext`](crate::infrastructure::database::TransactionContext),
//! so a single open transaction serves all five tables and nothing becomes
//! visible to other connections until the caller commits.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use warbler::domain::{MessageRepository, NewMessage};
//! use warbler::infrastructure::database::{PgUnitOfWork, Session, UnitOfWork};
//!
//! async fn post(uow: &PgUnitOfWork, user_id: i64) -> Result<(), AppError> {
//!     let mut session = uow.begin().await?;
//!     session.insert_message(&NewMessage::new(user_id, "hello")).await?;
//!     session.commit().await
//! }
//! ```

mod comment_repository;
mod follow_repository;
mod like_repository;
mod message_repository;
mod user_repository;
