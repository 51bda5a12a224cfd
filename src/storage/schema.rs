//! Database schema definitions

/// Schema version recorded in `PRAGMA user_version`. No migrations exist;
/// version 1 is the only schema this crate understands.
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    username TEXT NOT NULL
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_USERS_TABLE]
}
