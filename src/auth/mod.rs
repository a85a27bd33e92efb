//! User registration, log-in and the cookie-based sessions that protect the
//! rest of the application.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_api, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{get_register_page, register_user};
pub use user::{User, UserID, Username, create_user_table};
pub(crate) use user::{authenticate, create_user, get_log_in_user, get_user_by_id};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

