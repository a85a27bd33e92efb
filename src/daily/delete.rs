use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    app_state::DbState,
    auth::UserID,
    daily::{DailyRecordId, delete_daily_record},
    endpoints,
};

/// Delete one of the caller's daily records and go back to the list.
///
/// Deleting a record that does not exist or belongs to someone else does nothing.
pub async fn delete_daily_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<DailyRecordId>,
) -> Response {
    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_daily_record(user_id, record_id, &connection) {
        Ok(0) => tracing::debug!("User {user_id} tried to delete missing daily record {record_id}"),
        Ok(_) => tracing::debug!("Deleted daily record {record_id} for user {user_id}"),
        Err(error) => {
            tracing::error!("Could not delete daily record {record_id}: {error}");
            return error.into_response();
        }
    }

    Redirect::to(endpoints::DAILY_RECORDS_VIEW).into_response()
}
