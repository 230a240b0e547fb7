//! Infrastructure Layer
//!
//! Store implementations of the domain repository traits:
//! - PostgreSQL via sqlx (connection pool, migrations, repositories)
//! - In-memory store used by tests and local tooling

pub mod database;
pub mod memory;
pub mod repositories;
