//! The user table and the credential lookups built on top of it.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// Keeps user IDs from being mixed up with the IDs of the rows they own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A trimmed, non-empty username without whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// The maximum number of characters in a username.
    pub const MAX_LENGTH: usize = 64;

    /// Trim and validate `raw_username`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] if the trimmed username is empty,
    /// longer than [Username::MAX_LENGTH] characters or contains whitespace.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();

        if username.is_empty() {
            return Err(Error::InvalidUsername("username cannot be empty".to_owned()));
        }

        if username.chars().count() > Self::MAX_LENGTH {
            return Err(Error::InvalidUsername(format!(
                "username cannot be longer than {} characters",
                Self::MAX_LENGTH
            )));
        }

        if username.chars().any(char::is_whitespace) {
            return Err(Error::InvalidUsername(
                "username cannot contain spaces".to_owned(),
            ));
        }

        Ok(Self(username.to_owned()))
    }

    /// Wrap a username read back from the database.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user into the database.
///
/// # Errors
///
/// Returns:
/// - [Error::DuplicateUsername] if the username is already registered,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    username: Username,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, password) VALUES (?1, ?2)",
        (username.as_str(), password_hash.as_str()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username,
        password_hash,
    })
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = UserID::new(row.get(0)?);
    let username: String = row.get(1)?;
    let password_hash: String = row.get(2)?;

    Ok(User {
        id,
        username: Username::new_unchecked(&username),
        password_hash: PasswordHash::new_unchecked(&password_hash),
    })
}

/// Get the user with the ID `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the ID, or [Error::SqlError] for
/// other SQL errors.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered under `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the username, or
/// [Error::SqlError] for other SQL errors.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password FROM user WHERE username = :username")?
        .query_row(&[(":username", username.trim())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user trying to log in as `username`.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the username is not registered, so
/// that an unknown user looks the same as a wrong password.
pub fn get_log_in_user(username: &str, connection: &Connection) -> Result<User, Error> {
    match get_user_by_username(username, connection) {
        Err(Error::NotFound) => Err(Error::InvalidCredentials),
        result => result,
    }
}

/// Check `raw_password` against the hash stored for `user`.
///
/// Hashing is slow, so call this after the database lock has been released.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the password does not match. Any
/// other error means the check could not be performed.
pub fn authenticate(user: User, raw_password: &str) -> Result<User, Error> {
    if user.password_hash.verify(raw_password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}
