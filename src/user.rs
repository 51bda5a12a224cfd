//! User entity - the single record type held by the store

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile row. `id` is the primary key and stays stable for the
/// lifetime of the record; `display_name` carries no constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

impl User {
    /// Create a brand-new user with a freshly generated id
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.into(),
        }
    }

    /// Create a user that reuses an existing id (an update of that record)
    pub fn with_id(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
