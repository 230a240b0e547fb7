//! Unit of Work Pattern Implementation
//!
//! Provides transactional boundaries for repository operations.
//! The request layer opens a session, stages changes through the repository
//! traits, and commits or rolls back once at the end of the request.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::domain::{
    CommentRepository, FollowRepository, LikeRepository, MessageRepository, UserRepository,
};
use crate::shared::error::AppError;

/// An open transaction exposing every repository.
///
/// Dropping a session without calling [`Session::commit`] discards its changes.
#[async_trait]
pub trait Session:
    UserRepository
    + MessageRepository
    + CommentRepository
    + LikeRepository
    + FollowRepository
    + Send
    + Sized
{
    /// Make every staged change durable.
    async fn commit(self) -> Result<(), AppError>;

    /// Discard every staged change.
    async fn rollback(self) -> Result<(), AppError>;
}

/// Unit of Work trait for opening sessions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: Session;

    /// Begin a new transaction.
    async fn begin(&self) -> Result<Self::Session, AppError>;
}

/// Transaction context that wraps a SQLx transaction.
///
/// The PostgreSQL [`Session`]; repository impls live in
/// `infrastructure::repositories`.
pub struct TransactionContext {
    tx: Transaction<'static, Postgres>,
}

impl TransactionContext {
    /// Create a new transaction context.
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    /// Connection of the underlying transaction, for query execution.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

#[async_trait]
impl Session for TransactionContext {
    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await.map_err(AppError::from)
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.tx.rollback().await.map_err(AppError::from)
    }
}

/// PostgreSQL Unit of Work implementation.
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    /// Create from a PgPool. Pools are reference counted, so this is cheap.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Session = TransactionContext;

    async fn begin(&self) -> Result<TransactionContext, AppError> {
        let tx = self.pool.begin().await?;
        Ok(TransactionContext::new(tx))
    }
}

/// Execute a closure within a transaction.
///
/// Commits when the closure returns `Ok`. On `Err` the session has already
/// been consumed by the closure and is dropped, which rolls it back.
///
/// # Example
/// ```ignore
/// let user = with_transaction(&uow, |mut session| async move {
///     let user = auth.signup(&mut session, request).await?;
///     Ok((user, session))
/// })
/// .await?;
/// ```
pub async fn with_transaction<W, F, Fut, T>(uow: &W, f: F) -> Result<T, AppError>
where
    W: UnitOfWork,
    F: FnOnce(W::Session) -> Fut,
    Fut: std::future::Future<Output = Result<(T, W::Session), AppError>>,
{
    let session = uow.begin().await?;

    match f(session).await {
        Ok((result, session)) => {
            if let Err(e) = session.commit().await {
                tracing::warn!(error = %e, "Transaction commit failed");
                return Err(e);
            }
            Ok(result)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Transaction rolled back");
            Err(e)
        }
    }
}
