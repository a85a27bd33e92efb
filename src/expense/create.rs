//! The quick-add expense form and endpoint.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    app_state::DbState,
    auth::UserID,
    endpoints,
    expense::{NewExpense, create_expense},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, form_error},
    internal_server_error::get_internal_server_error_redirect,
    timezone::local_now,
};

/// The raw fields of the quick-add form.
///
/// The amount is kept as text so that a bad value can be reported back to the user.
#[derive(Debug, Deserialize)]
pub struct ExpenseFormData {
    pub description: String,
    pub category: Option<String>,
    pub amount: String,
}

/// The quick-add form, prefilled with `form` and showing `error_message` if given.
pub fn expense_form(form: Option<&ExpenseFormData>, error_message: Option<&str>) -> Markup {
    let description = form.map(|form| form.description.as_str()).unwrap_or_default();
    let category = form
        .and_then(|form| form.category.as_deref())
        .unwrap_or_default();
    let amount = form.map(|form| form.amount.as_str()).unwrap_or_default();

    html! {
        form
            hx-post=(endpoints::ADD_EXPENSE)
            hx-swap="outerHTML"
            class="w-full space-y-4"
        {
            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="Coffee"
                    required
                    value=(description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    id="category"
                    type="text"
                    name="category"
                    placeholder="Other"
                    value=(category)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount"
                    type="text"
                    inputmode="decimal"
                    name="amount"
                    placeholder="0.00"
                    required
                    value=(amount)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (form_error(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

/// Save a new expense dated today in the local timezone.
///
/// Invalid input re-renders the form with the error, otherwise the client is
/// redirected to the dashboard.
pub async fn add_expense_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let new_expense = match NewExpense::new(
        &form.description,
        form.category.as_deref(),
        &form.amount,
    ) {
        Ok(new_expense) => new_expense,
        Err(error) => {
            return expense_form(Some(&form), Some(&error.to_string())).into_response();
        }
    };

    let Some(now) = local_now(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return get_internal_server_error_redirect();
    };

    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire the database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    match create_expense(user_id, new_expense, now.date(), &connection) {
        Ok(expense) => {
            tracing::debug!("Created expense {} for user {user_id}", expense.id);
            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");
            get_internal_server_error_redirect()
        }
    }
}
