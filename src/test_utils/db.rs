use rusqlite::Connection;

use crate::auth::{PasswordHash, UserID, Username, create_user};

/// Insert a user with a placeholder password hash and return its ID.
#[track_caller]
pub(crate) fn create_test_user(connection: &Connection, username: &str) -> UserID {
    create_user(
        Username::new_unchecked(username),
        PasswordHash::new_unchecked("hash"),
        connection,
    )
    .expect("could not create test user")
    .id
}
