//! Opening the SQLite database and creating the application's tables.

use std::{path::Path, time::Duration};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{leave::create_leave_table, person::create_person_table};

/// How long a connection waits for another connection's write lock before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the database file at `path` and create any missing tables.
///
/// The connection waits up to `busy_timeout` for locks held by other
/// connections and uses write-ahead logging so readers do not block the
/// writer.
///
/// # Errors
/// Returns an error if the file cannot be opened or the tables cannot be created.
pub fn open(path: &Path, busy_timeout: Duration) -> Result<Connection, rusqlite::Error> {
    let connection = Connection::open(path)?;
    connection.busy_timeout(busy_timeout)?;

    let journal_mode: String = connection.pragma_update_and_check(
        None,
        "journal_mode",
        "WAL",
        |row| row.get(0),
    )?;
    tracing::debug!("opened {} with journal mode {journal_mode}", path.display());

    initialize(&connection)?;

    Ok(connection)
}

/// Create the tables for people and leave records if they do not exist, and
/// turn on foreign key enforcement for `connection`.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_person_table(&transaction)?;
    create_leave_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;
    use tempfile::NamedTempFile;

    use crate::{
        db::{DEFAULT_BUSY_TIMEOUT, initialize, open},
        person::{create_person, get_all_people, test_person_details},
    };

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database twice");
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let foreign_keys: bool = connection
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(foreign_keys);
    }

    #[test]
    fn reopened_file_keeps_data() {
        let db_file = NamedTempFile::new().expect("Could not create temp file");
        let person = {
            let connection =
                open(db_file.path(), DEFAULT_BUSY_TIMEOUT).expect("Could not open database");
            create_person(test_person_details("alice@example.com"), &connection)
                .expect("Could not create person")
        };

        let connection =
            open(db_file.path(), DEFAULT_BUSY_TIMEOUT).expect("Could not reopen database");

        assert_eq!(get_all_people(&connection), Ok(vec![person]));
    }
}
