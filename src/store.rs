//! A small persisted key-value store for UI state such as date filters.
//!
//! Values are stored as JSON text under string keys. Reading is forgiving:
//! anything that cannot be read or decoded is reported as absent, so callers
//! fall back to their defaults instead of failing the request.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// Storage for JSON encoded values keyed by a string.
///
/// There is no eviction or expiry, the last write to a key wins.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw text stored under `key`, if any.
    fn read_raw(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn write_raw(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`.
    fn clear(&self, key: &str) -> Result<(), Error>;
}

/// Read and decode the value stored under `key`.
///
/// Returns `None` if the key is missing, the store could not be read, or the
/// stored text is not valid JSON for `T`.
pub fn read<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.read_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!("could not read \"{key}\" from the store: {error}");
            return None;
        }
    };

    serde_json::from_str(&raw)
        .inspect_err(|error| {
            tracing::warn!("ignoring malformed value stored under \"{key}\": {error}")
        })
        .ok()
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if `value` cannot be encoded, or
/// the error from the underlying store if the write fails.
pub fn write<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), Error> {
    let raw = serde_json::to_string(value)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    store.write_raw(key, &raw)
}

/// A [KeyValueStore] backed by the application's SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a store that keeps its values in the `key_value` table.
    ///
    /// The connection lock is taken for each call, so callers must not hold
    /// it while using the store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl KeyValueStore for SqliteStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, Error> {
        let connection = self.lock()?;

        connection
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1",
                (key,),
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::from)
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute("DELETE FROM key_value WHERE key = ?1", (key,))?;

        Ok(())
    }
}

/// Create the table used by [SqliteStore].
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        (),
    )?;

    Ok(())
}

/// An in-memory [KeyValueStore] that counts how many writes it has received.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    write_count: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of successful calls to [KeyValueStore::write_raw].
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, Error> {
        self.values
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire memory store lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl KeyValueStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), Error> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        self.write_count.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), Error> {
        self.lock()?.remove(key);

        Ok(())
    }
}
