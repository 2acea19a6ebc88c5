//! # roster-core
//!
//! Core library for roster - a local user directory over SQLite.
//!
//! This library provides:
//! - Domain types for users and profiles
//! - Database storage layer with named migrations
//! - Configuration management
//! - Logging infrastructure
//!
//! The database handle is constructed explicitly and passed by reference;
//! there is no global connection state.
//!
//! ## Example
//!
//! ```rust,no_run
//! use roster_core::{Config, Database, User};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database and apply pending migrations
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let alice = db
//!     .create_user(&User::new("Alice", "alice@example.com"))
//!     .expect("failed to create user");
//! println!("created user {:?}", alice.id);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::{Profile, User, UserWithProfile};

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
