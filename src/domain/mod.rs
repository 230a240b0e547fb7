//! # Domain Layer
//!
//! Entities, relations and repository contracts for Warbler.
//! It is independent of any storage engine.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure
//! - Repository traits define data access contracts
//! - Entities carry only pure predicates and serialization; relations they
//!   inspect are passed in explicitly

pub mod entities;

// Re-export commonly used types
pub use entities::*;
