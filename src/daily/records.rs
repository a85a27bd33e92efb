//! The page listing the user's daily records with an optional date filter.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    app_state::DbState,
    auth::UserID,
    daily::{DailyRecord, DateRange, entry::format_record_date, get_daily_records},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, form_error, link,
    },
    navigation::NavBar,
};

#[derive(Debug, Default, Deserialize)]
pub struct DateFilterQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn date_filter_form(query: &DateFilterQuery, error_message: Option<&str>) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DAILY_RECORDS_VIEW)
            class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start_date"
                    type="date"
                    name="start_date"
                    value=(query.start_date.as_deref().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end_date"
                    type="date"
                    name="end_date"
                    value=(query.end_date.as_deref().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }

            (form_error(error_message))
        }
    }
}

fn records_table(records: &[DailyRecord]) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Items" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @if records.is_empty() {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td colspan="4" class=(TABLE_CELL_STYLE) { "No records yet." }
                    }
                }

                @for record in records {
                    tr class=(TABLE_ROW_STYLE) data-record-id=(record.id)
                    {
                        td class=(TABLE_CELL_STYLE) { (format_record_date(record.date)) }
                        td class=(TABLE_CELL_STYLE) { (record.items.len()) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(record.total_amount)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            div class="flex gap-4"
                            {
                                (link(&format_endpoint(endpoints::VIEW_DAILY, record.id), "View"))

                                a
                                    href=(format_endpoint(endpoints::DELETE_DAILY, record.id))
                                    onclick="return confirm('Delete this record?')"
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Render the caller's daily records, newest first.
///
/// When both `start_date` and `end_date` are given only records inside that
/// inclusive range are listed. A malformed date is reported on the page and
/// the unfiltered list is shown instead.
pub async fn get_daily_records_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateFilterQuery>,
) -> Response {
    let (range, error_message) =
        match DateRange::from_query(query.start_date.as_deref(), query.end_date.as_deref()) {
            Ok(range) => (range, None),
            Err(error) => (None, Some(error.to_string())),
        };

    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    let records = match get_daily_records(user_id, range, &connection) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("Could not get daily records for user {user_id}: {error}");
            return error.into_response();
        }
    };

    let nav_bar = NavBar::new(endpoints::DAILY_RECORDS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Daily Records" }
            (date_filter_form(&query, error_message.as_deref()))
            (records_table(&records))
        }
    };

    base("Daily Records", &[], &content).into_response()
}
