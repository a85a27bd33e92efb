//! Ledgerlink is a web app for keeping track of your spending and sharing
//! short links.
//!
//! This library provides a REST API that directly serves HTML pages, plus a
//! couple of JSON endpoints that feed the dashboard charts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod daily;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod short_url;
mod summary;
#[cfg(test)]
mod test_utils;
mod timezone;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, Username, ValidatedPassword};
pub use logging::logging_middleware;
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password combination did not match a registered user.
    ///
    /// Unknown usernames and wrong passwords both map to this error so that
    /// the response does not reveal which usernames exist.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request did not carry a valid auth token.
    #[error("you must be logged in to access this resource")]
    NotAuthenticated,

    /// Another user has already registered the username.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// The username was empty, too long or contained whitespace.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth cookie could not be created or read.
    #[error("could not set the auth cookie: {0}")]
    CookieError(String),

    /// An amount could not be parsed as a finite, non-negative number.
    ///
    /// Holds the raw text the user entered.
    #[error("\"{0}\" is not a valid amount, enter a number that is zero or more")]
    InvalidAmount(String),

    /// An expense was submitted without a description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// The items of a daily record were missing or malformed.
    #[error("invalid daily items: {0}")]
    InvalidDailyItems(String),

    /// The total sent by the client disagrees with the sum of the items.
    #[error("the total {submitted:.2} does not match the sum of the items {computed:.2}")]
    DailyTotalMismatch {
        /// The sum of the item amounts.
        computed: f64,
        /// The total the client sent.
        submitted: f64,
    },

    /// A date in a query string or form could not be parsed.
    #[error("\"{0}\" is not a valid date, use the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The URL submitted for shortening was rejected.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The short code already exists in the database.
    ///
    /// This is used internally to retry short code allocation and should not
    /// reach the client.
    #[error("the short code already exists in the database")]
    DuplicateShortCode,

    /// Every attempt at allocating an unused short code collided.
    #[error("could not allocate a unique short code")]
    ShortCodeExhausted,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("short_url.short_code") =>
            {
                Error::DuplicateShortCode
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by bad input from the client.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidUsername(_)
                | Error::TooWeak(_)
                | Error::DuplicateUsername
                | Error::InvalidCredentials
                | Error::InvalidAmount(_)
                | Error::EmptyDescription
                | Error::InvalidDailyItems(_)
                | Error::DailyTotalMismatch { .. }
                | Error::InvalidDate(_)
                | Error::InvalidUrl(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error if error.is_client_error() => {
                (StatusCode::BAD_REQUEST, error.to_string()).into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::Error;

    #[test]
    fn unique_username_violation_maps_to_duplicate_username() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE user (id INTEGER PRIMARY KEY, username TEXT NOT NULL UNIQUE);
                INSERT INTO user (username) VALUES ('alice');",
            )
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO user (username) VALUES ('alice')", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::DuplicateUsername);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn not_authenticated_is_unauthorized() {
        let response = Error::NotAuthenticated.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::InvalidAmount("abc".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unexpected_errors_are_internal_server_errors() {
        let response = Error::ShortCodeExhausted.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
