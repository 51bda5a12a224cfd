//! # Userbox - Reactive local user profile store
//!
//! A single-table persistence sample built around a live read stream.
//!
//! Userbox provides:
//! - A SQLite-backed record store holding user profiles
//! - A data access gateway exposing the tracked row as a conflating stream
//! - A view model that projects the row to a display name and serializes writes
//! - A CLI binary acting as the screen (show / set / clear / watch)

pub mod config;
pub mod source;
pub mod storage;
pub mod user;
pub mod viewmodel;

// Re-exports for convenient access
pub use source::{LocalUserDataSource, UserDataSource};
pub use storage::UserStore;
pub use user::User;
pub use viewmodel::{UserViewModel, ViewModelFactory, ViewState};

/// Result type alias for Userbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Userbox operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("A write is already in flight")]
    WriteInFlight,
}
