use axum::{
    Extension, Form,
    extract::State,
    http::{HeaderMap, StatusCode, header::HOST},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    app_state::DbState,
    auth::UserID,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, form_error},
    internal_server_error::get_internal_server_error_redirect,
    short_url::{ShortCode, TargetUrl, create_short_url},
};

#[derive(Debug, Deserialize)]
pub struct ShortenFormData {
    pub original_url: String,
}

/// The form for shortening a URL, keeping `original_url` and showing `error_message` if given.
pub fn shorten_form(original_url: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::SHORTEN)
            hx-swap="outerHTML"
            class="w-full space-y-4"
        {
            div
            {
                label for="original_url" class=(FORM_LABEL_STYLE) { "URL" }
                input
                    id="original_url"
                    type="url"
                    name="original_url"
                    placeholder="https://example.com/a/very/long/link"
                    required
                    value=(original_url)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (form_error(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Shorten" }
        }
    }
}

/// Create a short link for the submitted URL.
///
/// Links to internal addresses or back to this site are rejected in the form.
pub async fn shorten_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    headers: HeaderMap,
    Form(form): Form<ShortenFormData>,
) -> Response {
    let own_host = headers.get(HOST).and_then(|host| host.to_str().ok());

    let target = match TargetUrl::new(&form.original_url, own_host) {
        Ok(target) => target,
        Err(error) => {
            return shorten_form(&form.original_url, Some(&error.to_string())).into_response();
        }
    };

    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire the database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    match create_short_url(
        user_id,
        &target,
        OffsetDateTime::now_utc(),
        ShortCode::random,
        &connection,
    ) {
        Ok(short_url) => {
            tracing::debug!(
                "Created short code {} for user {user_id}",
                short_url.short_code
            );
            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::ShortCodeExhausted) => shorten_form(
            &form.original_url,
            Some("Could not create a short link, please try again."),
        )
        .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while shortening a URL: {error}");
            get_internal_server_error_redirect()
        }
    }
}
