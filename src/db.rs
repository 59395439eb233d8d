//! Database initialization.

use rusqlite::Connection;

use crate::{Error, storage::create_key_value_table};

/// Create all the tables the application needs if they do not already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if any table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_key_value_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialization should succeed");
        initialize(&connection).expect("second initialization should succeed");
    }
}
