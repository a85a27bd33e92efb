//! Expense deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    app_state::DbState,
    auth::UserID,
    endpoints,
    expense::{ExpenseId, delete_expense},
};

/// Delete one of the caller's expenses and redirect to the dashboard.
///
/// Deleting an expense that does not exist or belongs to another user does nothing.
pub async fn delete_expense_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_expense(user_id, expense_id, &connection) {
        Ok(0) => {
            tracing::warn!(
                "User {user_id} tried to delete missing or foreign expense {expense_id}"
            );
            Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
        }
        Ok(_) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting expense {expense_id}: {error}"
            );
            error.into_response()
        }
    }
}
