use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error,
    app_state::DbState,
    short_url::{ShortCode, get_short_url_by_code},
};

/// Send the client to the URL stored under `code` with a 307 redirect.
///
/// Unknown or malformed codes get the 404 page.
pub async fn redirect_short_code(
    State(state): State<DbState>,
    Path(code): Path<String>,
) -> Response {
    let Some(short_code) = ShortCode::parse(&code) else {
        return Error::NotFound.into_response();
    };

    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_short_url_by_code(&short_code, &connection) {
        Ok(short_url) => Redirect::temporary(&short_url.original_url).into_response(),
        Err(error) => error.into_response(),
    }
}
