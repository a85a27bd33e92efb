//! Database operations for short URLs.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    short_url::{ShortCode, ShortUrl, ShortUrlId, TargetUrl},
};

/// How many codes are tried before giving up on a short URL.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Initialize the short URL table and indexes.
pub fn create_short_url_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS short_url (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            original_url TEXT NOT NULL,
            short_code TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_short_url_user_id ON short_url(user_id);",
    )?;

    Ok(())
}

/// Save a short URL pointing at `target` under a code from `generate_code`.
///
/// The unique constraint on `short_code` decides whether a code is free, so
/// a colliding code is simply replaced by a fresh one and the insert retried.
///
/// # Errors
///
/// Returns [Error::ShortCodeExhausted] if [MAX_CODE_ATTEMPTS] generated
/// codes were all taken, or an [Error::SqlError] for any other failure.
pub fn create_short_url(
    user_id: UserID,
    target: &TargetUrl,
    created_at: OffsetDateTime,
    mut generate_code: impl FnMut() -> ShortCode,
    connection: &Connection,
) -> Result<ShortUrl, Error> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let short_code = generate_code();

        let result = connection.execute(
            "INSERT INTO short_url (user_id, original_url, short_code, created_at)
            VALUES (?1, ?2, ?3, ?4)",
            (
                user_id.as_i64(),
                target.as_str(),
                short_code.as_str(),
                created_at,
            ),
        );

        match result.map_err(Error::from) {
            Ok(_) => {
                return Ok(ShortUrl {
                    id: connection.last_insert_rowid(),
                    user_id,
                    original_url: target.as_str().to_owned(),
                    short_code,
                    created_at,
                });
            }
            Err(Error::DuplicateShortCode) => {
                tracing::debug!("Short code {short_code} is taken (attempt {attempt})");
            }
            Err(error) => return Err(error),
        }
    }

    tracing::warn!("Could not allocate a short code after {MAX_CODE_ATTEMPTS} attempts");
    Err(Error::ShortCodeExhausted)
}

/// Look up a short URL by its code, regardless of owner.
pub fn get_short_url_by_code(
    short_code: &ShortCode,
    connection: &Connection,
) -> Result<ShortUrl, Error> {
    connection
        .query_row(
            "SELECT id, user_id, original_url, short_code, created_at FROM short_url
            WHERE short_code = ?1",
            [short_code.as_str()],
            map_row,
        )
        .map_err(|error| error.into())
}

/// All of the user's short URLs, newest first.
pub fn get_short_urls(user_id: UserID, connection: &Connection) -> Result<Vec<ShortUrl>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, original_url, short_code, created_at FROM short_url
            WHERE user_id = ?1
            ORDER BY id DESC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_url| maybe_url.map_err(|error| error.into()))
        .collect()
}

/// Delete the short URL `url_id` if `user_id` owns it.
///
/// Returns the number of rows deleted.
pub fn delete_short_url(
    user_id: UserID,
    url_id: ShortUrlId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM short_url WHERE id = ?1 AND user_id = ?2",
            (url_id, user_id.as_i64()),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<ShortUrl, rusqlite::Error> {
    Ok(ShortUrl {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        original_url: row.get(2)?,
        short_code: ShortCode::new_unchecked(row.get(3)?),
        created_at: row.get(4)?,
    })
}
