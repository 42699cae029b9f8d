// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key-value stores for local preferences.
//
// Schema:
//   preferences(
//     key        TEXT PRIMARY KEY,
//     value      TEXT NOT NULL,   -- JSON text
//     updated_at TEXT NOT NULL    -- RFC 3339
//   )

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use medreceita_core::error::{MedReceitaError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, instrument};

/// Convert a `rusqlite::Error` into a `MedReceitaError::Database`.
fn db_err(e: rusqlite::Error) -> MedReceitaError {
    MedReceitaError::Database(e.to_string())
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS preferences (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// Text slots addressed by key. Last write wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Preferences persisted in a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the preferences database at `path`. WAL mode is
    /// enabled so a crash mid-write never corrupts earlier slots.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;

        debug!("preference store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;

        debug!("in-memory preference store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored slots.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().expect("preference store lock poisoned");
        conn.query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))
            .map_err(db_err)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("preference store lock poisoned");
        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_err)
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("preference store lock poisoned");
        conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(db_err)?;

        debug!("preference written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().expect("preference store lock poisoned");
        conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])
            .map_err(db_err)?;
        Ok(())
    }
}

/// Volatile store for tests and for sessions without a writable data dir.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().expect("memory store lock poisoned");
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().expect("memory store lock poisoned");
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.lock().expect("memory store lock poisoned");
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Removing a missing key is not an error.
        store.remove("a").unwrap();
    }

    #[test]
    fn sqlite_last_write_wins() {
        let store = SqliteStore::open_in_memory().unwrap();
        exercise(&store);
        store.set("x", "{}").unwrap();
        store.set("x", "[]").unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn memory_store_behaves_like_sqlite() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("prescription-style", r#"{"texture":"grid"}"#).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("prescription-style").unwrap().as_deref(),
            Some(r#"{"texture":"grid"}"#)
        );
    }
}
