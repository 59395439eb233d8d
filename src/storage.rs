//! A string-keyed, string-valued persistent key-value store.
//!
//! The transaction store only ever talks to [KeyValueStore], so the SQLite
//! backed implementation can be swapped for another one without touching the
//! route handlers.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

/// Get, set and remove string values by string key.
pub trait KeyValueStore: Debug + Clone + Send + Sync + 'static {
    /// Get the value stored under `key`, or `None` if there is no such key.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove `key` and its value. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be written.
    fn remove(&self, key: &str) -> Result<(), Error>;

    /// Run `operation` while holding exclusive access to the store.
    ///
    /// Read-modify-write sequences must go through this so that two requests
    /// cannot interleave and lose each other's writes.
    ///
    /// # Errors
    /// Returns an error if exclusive access could not be acquired or if
    /// `operation` fails.
    fn exclusive<T>(
        &self,
        operation: impl FnOnce(&dyn KeyValueAccess) -> Result<T, Error>,
    ) -> Result<T, Error>;
}

/// Unsynchronized access to a key-value store, handed out by
/// [KeyValueStore::exclusive].
pub trait KeyValueAccess {
    /// See [KeyValueStore::get].
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    /// See [KeyValueStore::set].
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    /// See [KeyValueStore::remove].
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// A [KeyValueStore] backed by the `key_value` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    /// Wrap a connection whose database has been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        KeyValueAccess::get(&*self.lock()?, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        KeyValueAccess::set(&*self.lock()?, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        KeyValueAccess::remove(&*self.lock()?, key)
    }

    fn exclusive<T>(
        &self,
        operation: impl FnOnce(&dyn KeyValueAccess) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = self.lock()?;

        operation(&*connection)
    }
}

impl KeyValueAccess for Connection {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.query_row(
            "SELECT value FROM key_value WHERE key = :key",
            &[(":key", &key)],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.execute("DELETE FROM key_value WHERE key = ?1", (key,))?;

        Ok(())
    }
}

/// Create the key-value table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}
