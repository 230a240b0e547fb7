//! Application Layer
//!
//! Services the request layer calls with an open session: signup and
//! authentication, and the feed helpers that hydrate owners for
//! serialization.

pub mod dto;
pub mod services;
