//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - users(user_id, username)

pub mod schema;
pub mod sqlite;

pub use sqlite::UserStore;
