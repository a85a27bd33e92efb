//! Database operations for expenses.
//!
//! Every query is scoped to the owning user.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    expense::{Expense, ExpenseId, NewExpense},
};

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_id ON expense(user_id);",
    )?;

    Ok(())
}

/// Save `expense` for `user_id` and return it with its generated ID.
pub fn create_expense(
    user_id: UserID,
    expense: NewExpense,
    date: Date,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, description, category, amount, date)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            user_id.as_i64(),
            &expense.description,
            &expense.category,
            expense.amount,
            date,
        ),
    )?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        user_id,
        description: expense.description,
        category: expense.category,
        amount: expense.amount,
        date,
    })
}

/// All of the user's expenses, newest first.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, category, amount, date FROM expense
            WHERE user_id = :user_id
            ORDER BY id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// The user's `limit` largest expenses, largest first.
pub fn get_top_expenses(
    user_id: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, category, amount, date FROM expense
            WHERE user_id = ?1
            ORDER BY amount DESC, id DESC
            LIMIT ?2",
        )?
        .query_map((user_id.as_i64(), limit), map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// The sum of all of the user's expenses, or zero if they have none.
pub fn get_total_expenses(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expense WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete the expense `expense_id` if `user_id` owns it.
///
/// Returns the number of rows deleted, which is zero when the expense does
/// not exist or belongs to someone else.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
            (expense_id, user_id.as_i64()),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
    })
}
