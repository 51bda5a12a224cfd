//! SQLite storage implementation

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use super::schema;
use crate::Result;
use crate::user::User;

/// SQLite-backed store for user records
pub struct UserStore {
    conn: Connection,
}

impl UserStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        self.conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        Ok(())
    }

    /// Get the tracked row: the first user by rowid order, if any.
    /// The store may hold more rows; only this one is ever surfaced.
    pub fn first_user(&self) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_id, username FROM users ORDER BY rowid LIMIT 1",
                [],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        display_name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a user, replacing any existing row with the same id
    pub fn upsert_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO users (user_id, username) VALUES (?1, ?2)",
            params![user.id, user.display_name],
        )?;
        Ok(())
    }

    /// Delete every user row unconditionally
    pub fn delete_all_users(&self) -> Result<()> {
        self.conn.execute("DELETE FROM users", [])?;
        Ok(())
    }

    /// Count user rows
    pub fn count_users(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_then_first() {
        let store = UserStore::open_in_memory().unwrap();

        let user = User::new("alice");
        store.upsert_user(&user).unwrap();

        let retrieved = store.first_user().unwrap().unwrap();
        assert_eq!(retrieved.id, user.id);
        assert_eq!(retrieved.display_name, "alice");
    }

    #[test]
    fn test_empty_store_has_no_first_user() {
        let store = UserStore::open_in_memory().unwrap();
        assert!(store.first_user().unwrap().is_none());
    }

    #[test]
    fn test_upsert_same_id_replaces_row() {
        let store = UserStore::open_in_memory().unwrap();

        let user = User::new("alice");
        store.upsert_user(&user).unwrap();
        store.upsert_user(&User::with_id(user.id.clone(), "bob")).unwrap();

        assert_eq!(store.count_users().unwrap(), 1);
        let retrieved = store.first_user().unwrap().unwrap();
        assert_eq!(retrieved.id, user.id);
        assert_eq!(retrieved.display_name, "bob");
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let store = UserStore::open_in_memory().unwrap();

        let user = User::new("alice");
        store.upsert_user(&user).unwrap();
        store.upsert_user(&user).unwrap();

        assert_eq!(store.count_users().unwrap(), 1);
        assert_eq!(store.first_user().unwrap().unwrap().display_name, "alice");
    }

    #[test]
    fn test_first_user_is_stable_across_inserts() {
        let store = UserStore::open_in_memory().unwrap();

        let first = User::new("alice");
        store.upsert_user(&first).unwrap();
        store.upsert_user(&User::new("carol")).unwrap();

        assert_eq!(store.count_users().unwrap(), 2);
        assert_eq!(store.first_user().unwrap().unwrap().id, first.id);
    }

    #[test]
    fn test_delete_all() {
        let store = UserStore::open_in_memory().unwrap();

        store.upsert_user(&User::new("alice")).unwrap();
        store.upsert_user(&User::new("bob")).unwrap();
        store.delete_all_users().unwrap();

        assert_eq!(store.count_users().unwrap(), 0);
        assert!(store.first_user().unwrap().is_none());
    }

    #[test]
    fn test_delete_all_on_empty_store_is_noop() {
        let store = UserStore::open_in_memory().unwrap();
        store.delete_all_users().unwrap();
        assert_eq!(store.count_users().unwrap(), 0);
    }

    #[test]
    fn test_open_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userbox.db");

        {
            let store = UserStore::open(&path).unwrap();
            store.upsert_user(&User::new("alice")).unwrap();
        }

        let reopened = UserStore::open(&path).unwrap();
        assert_eq!(reopened.first_user().unwrap().unwrap().display_name, "alice");
    }
}
