//! Sets up the application's SQLite database.

use rusqlite::Connection;

use crate::{Error, metrics::create_transaction_table};

/// Create the tables for the application's data.
///
/// Tables that already exist are left as they are.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}
