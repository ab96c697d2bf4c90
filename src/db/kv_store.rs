//! String-keyed storage for whole collections.
//!
//! Each tracker module keeps its records under one key. Values are opaque
//! strings here; [crate::db::repository] decides how they are encoded.

use crate::error::Error;
use rusqlite::{Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;

pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value)
    }
}

/// Stores values in the `kv_entries` table of a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// `conn` must already have the `kv_entries` table, see
    /// [crate::db::connection::establish_connection].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

/// Keeps values for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::cell::Cell;

    /// A store whose writes can be made to fail, e.g. to mimic a full disk.
    #[derive(Default)]
    pub struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_writes: Cell<bool>,
        pub writes: Cell<usize>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, Error> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), Error> {
            if self.fail_writes.get() {
                return Err(Error::PersistenceWrite {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_sqlite_get_missing_key() {
        let store = SqliteStore::new(establish_test_connection().unwrap());
        assert_eq!(store.get("budgetTransactions").unwrap(), None);
    }

    #[test]
    fn test_sqlite_set_overwrites() {
        let store = SqliteStore::new(establish_test_connection().unwrap());
        store.set("habits", "[1]").unwrap();
        store.set("habits", "[2]").unwrap();

        assert_eq!(store.get("habits").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_memory_store_keys_are_independent() {
        let store = MemoryStore::new();
        store.set("habits", "a").unwrap();
        store.set("goals", "b").unwrap();

        assert_eq!(store.get("habits").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("goals").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_store_through_reference() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.set("goals", "[]").unwrap();
        assert_eq!(store.get("goals").unwrap().as_deref(), Some("[]"));
    }
}
