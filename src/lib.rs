//! # Warbler Library
//!
//! Persistence layer for a small microblogging service: users, messages,
//! comments, likes and follows, plus signup/authentication and JSON
//! serialization helpers.
//!
//! ## Architecture
//!
//! - **Domain Layer**: entities, relationship predicates and repository traits
//! - **Application Layer**: signup, authentication and feed services
//! - **Infrastructure Layer**: PostgreSQL and in-memory stores behind a unit of work
//!
//! ## Module Structure
//!
//! ```text
//! warbler/
//! +-- config/         Configuration management
//! +-- domain/         Entities and repository traits
//! +-- application/    Services and request DTOs
//! +-- infrastructure/ PostgreSQL and in-memory implementations
//! +-- shared/         Errors and validation helpers
//! ```
//!
//! ## Usage
//!
//! Every operation runs against a session the caller opened and the caller
//! commits:
//!
//! ```no_run
//! use warbler::application::dto::SignupRequest;
//! use warbler::application::services::{AuthService, CredentialHasher};
//! use warbler::infrastructure::database::{with_transaction, UnitOfWork};
//! use warbler::infrastructure::memory::MemoryStore;
//!
//! # async fn run() -> Result<(), warbler::shared::error::AppError> {
//! let store = MemoryStore::new();
//! let auth = AuthService::new(CredentialHasher::default().into());
//!
//! let _user = with_transaction(&store, |mut session| async move {
//!     let request = SignupRequest::new("alice", "a@x.io", "pw123", None);
//!     let user = auth.signup(&mut session, request).await?;
//!     Ok::<_, warbler::shared::error::AppError>((user, session))
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Application startup
pub mod startup;

// Telemetry and observability
pub mod telemetry;
