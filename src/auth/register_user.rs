//! The registration page and the handler that creates new users.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{PasswordHash, Username, ValidatedPassword, create_user},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        loading_spinner, log_in_register, password_input, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The minimum number of characters the password input accepts on the client
/// side. The server applies its own strength check on top of this.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 12;

#[cfg(not(test))]
const PASSWORD_HASH_COST: u32 = PasswordHash::DEFAULT_COST;
// Keeps the handler tests fast.
#[cfg(test)]
const PASSWORD_HASH_COST: u32 = 4;

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// Error messages for each field of the registration form.
#[derive(Default)]
struct RegistrationErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(username: &str, errors: RegistrationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a href=(endpoints::LOG_IN) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", RegistrationErrors::default());
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create a new user and send the client to the log-in page.
///
/// Validation failures re-render the form with the message under the
/// offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let username = match Username::new(&user_data.username) {
        Ok(username) => username,
        Err(error) => {
            return registration_form(
                &user_data.username,
                RegistrationErrors {
                    username: Some(&error.to_string()),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let validated_password = match ValidatedPassword::new(&user_data.password, &[username.as_str()])
    {
        Ok(password) => password,
        Err(error) => {
            return registration_form(
                username.as_str(),
                RegistrationErrors {
                    password: Some(&error.to_string()),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return registration_form(
            username.as_str(),
            RegistrationErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PASSWORD_HASH_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    match create_user(username.clone(), password_hash, &connection) {
        Ok(user) => {
            tracing::info!("Registered user {} with ID {}", user.username, user.id);
            (
                HxRedirect(endpoints::LOG_IN.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateUsername) => registration_form(
            username.as_str(),
            RegistrationErrors {
                username: Some(&Error::DuplicateUsername.to_string()),
                ..Default::default()
            },
        )
        .into_response(),
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            get_internal_server_error_redirect()
        }
    }
}
