//! In-Memory Store
//!
//! A [`UnitOfWork`] backed by process memory, enforcing the same unique,
//! foreign-key, length and cascade rules as the PostgreSQL schema.
//!
//! Semantics:
//! - A session reads a snapshot of the committed tables taken at `begin`,
//!   plus its own writes.
//! - Every successful write is also recorded in the session's log. `commit`
//!   replays the log against the current committed tables under the lock,
//!   re-checking constraints, so concurrent commits are never overwritten.
//!   A replay failure rejects the commit and publishes nothing.
//! - Username and email uniqueness is checked at commit only.
//! - Identity sequences are shared and never rolled back.
//! - After a constraint violation the session is aborted: further statements
//!   fail and `commit` discards the changes, as PostgreSQL does.

mod repositories;
mod tables;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    Comment, CommentId, Follow, Like, Message, MessageId, User, UserId, UserProfileUpdate,
};
use crate::infrastructure::database::{Session, UnitOfWork};
use crate::shared::error::AppError;
use tables::Tables;

const ABORTED: &str =
    "current transaction is aborted, commands ignored until end of transaction block";

#[derive(Debug, Default)]
struct Sequences {
    users: AtomicI64,
    messages: AtomicI64,
    comments: AtomicI64,
}

impl Sequences {
    fn next(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Debug, Default)]
struct Shared {
    committed: Mutex<Tables>,
    sequences: Sequences,
}

/// A logged write, replayed against the committed tables at commit.
#[derive(Debug, Clone)]
enum Write {
    InsertUser(User),
    UpdateUser(UserId, UserProfileUpdate),
    DeleteUser(UserId),
    InsertMessage(Message),
    DeleteMessage(MessageId),
    InsertComment(Comment),
    DeleteComment(CommentId),
    InsertLike(Like),
    DeleteLike(Like),
    InsertFollow(Follow),
    DeleteFollow(Follow),
}

impl Write {
    fn apply(&self, tables: &mut Tables) -> Result<(), AppError> {
        match self {
            Write::InsertUser(user) => {
                tables.insert_user(user.clone());
                Ok(())
            }
            Write::UpdateUser(id, update) => tables.update_user(*id, update).map(drop),
            Write::DeleteUser(id) => tables.delete_user(*id),
            Write::InsertMessage(message) => tables.insert_message(message.clone()).map(drop),
            Write::DeleteMessage(id) => tables.delete_message(*id),
            Write::InsertComment(comment) => tables.insert_comment(comment.clone()).map(drop),
            Write::DeleteComment(id) => tables.delete_comment(*id),
            Write::InsertLike(like) => tables.insert_like(*like).map(drop),
            Write::DeleteLike(like) => {
                tables.likes.remove(like);
                Ok(())
            }
            Write::InsertFollow(follow) => tables.insert_follow(*follow).map(drop),
            Write::DeleteFollow(follow) => {
                tables.follows.remove(follow);
                Ok(())
            }
        }
    }

    /// User whose username or email this write may have changed.
    fn user_changed(&self) -> Option<UserId> {
        match self {
            Write::InsertUser(user) => Some(user.id),
            Write::UpdateUser(id, _) => Some(*id),
            _ => None,
        }
    }
}

/// In-memory [`UnitOfWork`]. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    type Session = MemorySession;

    async fn begin(&self) -> Result<MemorySession, AppError> {
        let tables = self.shared.committed.lock().clone();
        Ok(MemorySession {
            shared: Arc::clone(&self.shared),
            tables,
            log: Vec::new(),
            aborted: false,
        })
    }
}

/// An open in-memory transaction.
#[derive(Debug)]
pub struct MemorySession {
    shared: Arc<Shared>,
    tables: Tables,
    log: Vec<Write>,
    aborted: bool,
}

impl MemorySession {
    fn next_user_id(&self) -> i64 {
        Sequences::next(&self.shared.sequences.users)
    }

    fn next_message_id(&self) -> i64 {
        Sequences::next(&self.shared.sequences.messages)
    }

    fn next_comment_id(&self) -> i64 {
        Sequences::next(&self.shared.sequences.comments)
    }

    /// Run a read against the snapshot.
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, AppError> {
        if self.aborted {
            return Err(AppError::Internal(ABORTED.to_string()));
        }
        Ok(f(&self.tables))
    }

    /// Run a statement against the snapshot and log it for commit.
    ///
    /// A constraint violation aborts the session. `NotFound` does not: in
    /// PostgreSQL it is an empty result, not a failed statement.
    fn write<T>(
        &mut self,
        write: Write,
        f: impl FnOnce(&mut Tables) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        if self.aborted {
            return Err(AppError::Internal(ABORTED.to_string()));
        }
        let result = f(&mut self.tables);
        match &result {
            Ok(_) => self.log.push(write),
            Err(
                AppError::Conflict(_)
                | AppError::ForeignKeyViolation(_)
                | AppError::ConstraintViolation(_),
            ) => self.aborted = true,
            Err(_) => {}
        }
        result
    }

    /// Replay the log on the committed tables and publish the result.
    ///
    /// A row deleted by a concurrent commit makes the replayed update or
    /// delete a no-op, as it would match zero rows in PostgreSQL.
    fn publish(&self) -> Result<(), AppError> {
        let mut committed = self.shared.committed.lock();
        let mut next = committed.clone();

        for write in &self.log {
            match write.apply(&mut next) {
                Ok(()) | Err(AppError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let changed: BTreeSet<UserId> = self.log.iter().filter_map(Write::user_changed).collect();
        next.check_users_unique(changed)?;

        *committed = next;
        Ok(())
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn commit(self) -> Result<(), AppError> {
        if self.aborted {
            tracing::debug!("Commit of aborted in-memory session discarded");
            return Ok(());
        }
        if self.log.is_empty() {
            return Ok(());
        }
        self.publish().map_err(|e| {
            tracing::debug!(error = %e, "In-memory commit rejected");
            e
        })
    }

    async fn rollback(self) -> Result<(), AppError> {
        Ok(())
    }
}
