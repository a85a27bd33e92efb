//! JSON endpoints for the aggregated expense totals.

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    app_state::DbState,
    auth::UserID,
    expense::{Expense, get_expenses},
    summary::{ChartSeries, category_totals, monthly_totals},
};

fn series_response(
    state: &DbState,
    user_id: UserID,
    aggregate: fn(&[Expense]) -> ChartSeries,
) -> Response {
    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match get_expenses(user_id, &connection) {
        Ok(expenses) => Json(aggregate(&expenses)).into_response(),
        Err(error) => {
            tracing::error!("Could not get expenses for user {user_id}: {error}");
            error.into_response()
        }
    }
}

/// The caller's expense totals per month as `{labels, values}`.
pub async fn get_monthly_data(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    series_response(&state, user_id, monthly_totals)
}

/// The caller's expense totals per category as `{labels, values}`.
pub async fn get_category_data(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    series_response(&state, user_id, category_totals)
}
