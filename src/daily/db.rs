//! Database operations for daily records.

use rusqlite::{Connection, Row, types::Type};
use time::{Date, PrimitiveDateTime, Time};

use crate::{
    Error,
    auth::UserID,
    daily::{DailyItem, DailyRecord, DailyRecordId, DateRange, NewDailyRecord},
};

/// Initialize the daily expense table and indexes.
///
/// Items are stored as a JSON array in `items_json`.
pub fn create_daily_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS daily_expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            items_json TEXT NOT NULL,
            total_amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_daily_expense_user_date ON daily_expense(user_id, date);",
    )?;

    Ok(())
}

/// Save `record` for `user_id` stamped with `date`.
pub fn create_daily_record(
    user_id: UserID,
    record: NewDailyRecord,
    date: PrimitiveDateTime,
    connection: &Connection,
) -> Result<DailyRecord, Error> {
    let items_json = serde_json::to_string(&record.items)
        .map_err(|error| Error::InvalidDailyItems(error.to_string()))?;

    connection.execute(
        "INSERT INTO daily_expense (user_id, date, items_json, total_amount)
        VALUES (?1, ?2, ?3, ?4)",
        (user_id.as_i64(), date, items_json, record.total_amount),
    )?;

    Ok(DailyRecord {
        id: connection.last_insert_rowid(),
        user_id,
        date,
        items: record.items,
        total_amount: record.total_amount,
    })
}

fn start_of_day(date: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT)
}

/// The user's daily records, newest first.
///
/// With a `range`, only records saved from the start of the first day up to
/// the end of the last day are returned.
pub fn get_daily_records(
    user_id: UserID,
    range: Option<DateRange>,
    connection: &Connection,
) -> Result<Vec<DailyRecord>, Error> {
    let Some(range) = range else {
        return connection
            .prepare(
                "SELECT id, user_id, date, items_json, total_amount FROM daily_expense
                WHERE user_id = ?1
                ORDER BY date DESC, id DESC",
            )?
            .query_map([user_id.as_i64()], map_row)?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect();
    };

    let start = start_of_day(range.start);
    let end_exclusive = start_of_day(range.end.next_day().unwrap_or(Date::MAX));

    connection
        .prepare(
            "SELECT id, user_id, date, items_json, total_amount FROM daily_expense
            WHERE user_id = ?1 AND date >= ?2 AND date < ?3
            ORDER BY date DESC, id DESC",
        )?
        .query_map((user_id.as_i64(), start, end_exclusive), map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Get one of the user's daily records.
///
/// # Errors
///
/// Returns [Error::NotFound] if the record does not exist or belongs to another user.
pub fn get_daily_record(
    user_id: UserID,
    record_id: DailyRecordId,
    connection: &Connection,
) -> Result<DailyRecord, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, items_json, total_amount FROM daily_expense
            WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((record_id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Delete the daily record `record_id` if `user_id` owns it.
///
/// Returns the number of rows deleted.
pub fn delete_daily_record(
    user_id: UserID,
    record_id: DailyRecordId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM daily_expense WHERE id = ?1 AND user_id = ?2",
            (record_id, user_id.as_i64()),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<DailyRecord, rusqlite::Error> {
    let raw_items: String = row.get(3)?;
    let items: Vec<DailyItem> = serde_json::from_str(&raw_items).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;

    Ok(DailyRecord {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        date: row.get(2)?,
        items,
        total_amount: row.get(4)?,
    })
}
