use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    app_state::DbState,
    auth::UserID,
    daily::{NewDailyRecord, create_daily_record, entry::daily_form},
    endpoints,
    internal_server_error::get_internal_server_error_redirect,
    timezone::local_now,
};

/// The fields submitted by the daily entry form.
#[derive(Debug, Deserialize)]
pub struct DailyFormData {
    /// A JSON array of `{name, amount}` objects.
    pub items: String,
    /// The total shown to the user, checked against the items.
    pub total: Option<String>,
}

/// Save a daily record stamped with the current local time.
pub async fn save_daily_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<DailyFormData>,
) -> Response {
    let new_record = match NewDailyRecord::new(&form.items, form.total.as_deref()) {
        Ok(new_record) => new_record,
        Err(error) => return daily_form(&form.items, Some(&error.to_string())).into_response(),
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

    match create_daily_record(user_id, new_record, now, &connection) {
        Ok(record) => {
            tracing::debug!("Created daily record {} for user {user_id}", record.id);
            (
                HxRedirect(endpoints::DAILY_RECORDS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while saving a daily record: {error}");
            get_internal_server_error_redirect()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Form, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        app_state::DbState,
        daily::get_daily_records,
        endpoints,
        test_utils::{
            assert_hx_redirect, assert_valid_html, create_test_user, form_error_message,
            must_get_form, parse_html_fragment,
        },
    };

    use super::{DailyFormData, save_daily_endpoint};

    fn form(items: &str, total: Option<&str>) -> Form<DailyFormData> {
        Form(DailyFormData {
            items: items.to_owned(),
            total: total.map(str::to_owned),
        })
    }

    #[tokio::test]
    async fn saves_record_and_redirects() {
        let state = DbState::in_memory();
        let user_id = create_test_user(&state.lock().unwrap(), "alice");

        let response = save_daily_endpoint(
            State(state.clone()),
            Extension(user_id),
            form(
                r#"[{"name": "Bus", "amount": "2.50"}, {"name": "Lunch", "amount": "12"}]"#,
                Some("14.50"),
            ),
        )
        .await;

        assert_hx_redirect(&response, endpoints::DAILY_RECORDS_VIEW);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let records = get_daily_records(user_id, None, &state.lock().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].items.len(), 2);
        assert_eq!(records[0].total_amount, 14.5);
    }

    #[tokio::test]
    async fn rejects_empty_items() {
        let state = DbState::in_memory();
        let user_id = create_test_user(&state.lock().unwrap(), "alice");

        let response =
            save_daily_endpoint(State(state.clone()), Extension(user_id), form("[]", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let error = form_error_message(&must_get_form(&html));
        assert!(error.contains("add at least one item"), "got {error:?}");
        let records = get_daily_records(user_id, None, &state.lock().unwrap()).unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn rejects_mismatched_total() {
        let state = DbState::in_memory();
        let user_id = create_test_user(&state.lock().unwrap(), "alice");

        let response = save_daily_endpoint(
            State(state.clone()),
            Extension(user_id),
            form(r#"[{"name": "Bus", "amount": 2}]"#, Some("5.00")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let records = get_daily_records(user_id, None, &state.lock().unwrap()).unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn rejected_form_keeps_entered_items() {
        let state = DbState::in_memory();
        let user_id = create_test_user(&state.lock().unwrap(), "alice");

        let response = save_daily_endpoint(
            State(state),
            Extension(user_id),
            form(
                r#"[{"name": "Bus", "amount": "2.50"}, {"name": "", "amount": 4}]"#,
                Some("6.50"),
            ),
        )
        .await;

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_eq!(
            form_error_message(&form),
            "invalid daily items: item 2 needs a name"
        );

        let values = |selector: &str| -> Vec<String> {
            form.select(&Selector::parse(selector).unwrap())
                .map(|input| input.value().attr("value").unwrap_or_default().to_owned())
                .collect()
        };
        assert_eq!(values("input[data-item-name]"), ["Bus", ""]);
        assert_eq!(values("input[data-item-amount]"), ["2.50", "4"]);
        assert_eq!(values("input[name=total]"), ["6.50"]);

        let items_json = values("input[name=items]").remove(0);
        let items: serde_json::Value = serde_json::from_str(&items_json).unwrap();
        assert_eq!(
            items,
            serde_json::json!([{"name": "Bus", "amount": "2.50"}, {"name": "", "amount": 4}])
        );
    }
}
