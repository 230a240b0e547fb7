//! Application Services
//!
//! Services take the caller's session as an argument and never commit.
//!
//! ## Available Services
//!
//! - **AuthService**: signup and credential checks
//! - **FeedService**: serialized timelines and comment threads
//! - **CredentialHasher**: Argon2id hashing shared by the above

pub mod auth_service;
pub mod credentials;
pub mod feed_service;

pub use auth_service::AuthService;
pub use credentials::CredentialHasher;
pub use feed_service::FeedService;
