//! Database layer for roster
//!
//! This module provides the storage layer using SQLite with:
//! - Named, ordered schema migrations
//! - A repository for user and profile CRUD plus the join query

pub mod repo;
pub mod schema;

pub use repo::Database;
