//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, storage::SqliteKeyValueStore, transaction::TransactionStore};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,

    /// The store holding every transaction.
    pub transaction_store: TransactionStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the key-value table.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Sao_Paulo".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            transaction_store: TransactionStore::new(SqliteKeyValueStore::new(connection)),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::AppState;

    #[test]
    fn new_initializes_empty_store() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "Etc/UTC").unwrap();

        assert_eq!(state.local_timezone, "Etc/UTC");
        assert_eq!(state.transaction_store.load_all(), Ok(Vec::new()));
    }
}
