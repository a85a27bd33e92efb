//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, daily::create_daily_expense_table,
    expense::create_expense_table, short_url::create_short_url_table,
};

/// Create all of the application's tables if they do not already exist.
///
/// The tables are created inside a single exclusive transaction so that a
/// partially initialized database is never left behind.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_short_url_table(&transaction)?;
    create_daily_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
