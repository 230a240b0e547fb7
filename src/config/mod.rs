//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus DATABASE_URL)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warbler::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Connecting to {}", settings.database.url);
//! ```

mod settings;

pub use settings::*;
