//! The itemized entry page and the read-only view of a saved record.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{PrimitiveDateTime, macros::format_description};

use crate::{
    app_state::DbState,
    auth::UserID,
    daily::{DailyItem, DailyRecordId, get_daily_record},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, form_error, link,
    },
    navigation::NavBar,
};

/// Keeps the hidden `items` and `total` inputs in sync with the item rows.
const DAILY_FORM_SCRIPT: &str = r#"
function dailyFormRows(form) {
    return Array.from(form.querySelectorAll("[data-item-row]"));
}

function syncDailyForm(form) {
    const items = dailyFormRows(form).map((row) => ({
        name: row.querySelector("[data-item-name]").value,
        amount: row.querySelector("[data-item-amount]").value,
    }));
    const total = items
        .map((item) => parseFloat(item.amount))
        .filter((amount) => Number.isFinite(amount))
        .reduce((sum, amount) => sum + amount, 0);

    form.querySelector("input[name=items]").value = JSON.stringify(items);
    form.querySelector("input[name=total]").value = total.toFixed(2);
    form.querySelector("[data-total]").textContent = "$" + total.toFixed(2);
}

function addDailyItem(button) {
    const form = button.closest("form");
    const rows = dailyFormRows(form);
    const row = rows[rows.length - 1].cloneNode(true);
    row.querySelectorAll("input").forEach((input) => (input.value = ""));
    rows[rows.length - 1].after(row);
    syncDailyForm(form);
}

function removeDailyItem(button) {
    const form = button.closest("form");
    if (dailyFormRows(form).length > 1) {
        button.closest("[data-item-row]").remove();
    }
    syncDailyForm(form);
}
"#;

/// An item as the user typed it, kept so a rejected form can be shown again.
#[derive(Debug, Default, Deserialize, Serialize)]
struct DraftItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    amount: Value,
}

impl DraftItem {
    fn amount_text(&self) -> String {
        match &self.amount {
            Value::Null => String::new(),
            Value::String(amount) => amount.clone(),
            amount => amount.to_string(),
        }
    }
}

/// Read back the submitted items, ignoring JSON that cannot be read.
fn draft_items(items_json: &str) -> Vec<DraftItem> {
    serde_json::from_str(items_json).unwrap_or_default()
}

fn item_row(item: &DraftItem) -> Markup {
    html! {
        div data-item-row class="flex gap-2"
        {
            input
                type="text"
                data-item-name
                placeholder="Item"
                aria-label="Item name"
                oninput="syncDailyForm(this.form)"
                class=(FORM_TEXT_INPUT_STYLE)
                value=(item.name);

            input
                type="text"
                inputmode="decimal"
                data-item-amount
                placeholder="0.00"
                aria-label="Item amount"
                oninput="syncDailyForm(this.form)"
                class=(FORM_TEXT_INPUT_STYLE)
                value=(item.amount_text());

            button
                type="button"
                onclick="removeDailyItem(this)"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Remove"
            }
        }
    }
}

/// The daily entry form with one row per item in `items_json`, showing
/// `error_message` if given.
///
/// The item inputs have no `name`, so only the JSON `items` and the `total`
/// are submitted.
pub(super) fn daily_form(items_json: &str, error_message: Option<&str>) -> Markup {
    let mut items = draft_items(items_json);
    let items_json = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_owned());
    if items.is_empty() {
        items.push(DraftItem::default());
    }

    let total: f64 = items
        .iter()
        .filter_map(|item| item.amount_text().trim().parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
        .sum();

    html! {
        form
            id="daily-form"
            hx-post=(endpoints::SAVE_DAILY)
            hx-swap="outerHTML"
            class="w-full space-y-4"
        {
            input type="hidden" name="items" value=(items_json);
            input type="hidden" name="total" value=(format!("{total:.2}"));

            @for item in &items {
                (item_row(item))
            }

            button type="button" onclick="addDailyItem(this)" class=(BUTTON_SECONDARY_STYLE)
            {
                "Add item"
            }

            p class="text-lg font-semibold"
            {
                "Total: "
                span data-total { (format_currency(total)) }
            }

            (form_error(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}

/// Render the daily entry page.
pub async fn get_daily_page() -> Response {
    let nav_bar = NavBar::new(endpoints::DAILY_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Daily Expenses" }
            (daily_form("[]", None))
        }
    };

    base(
        "Daily Expenses",
        &[HeadElement::ScriptSource(PreEscaped(
            DAILY_FORM_SCRIPT.to_owned(),
        ))],
        &content,
    )
    .into_response()
}

pub(super) fn format_record_date(date: PrimitiveDateTime) -> String {
    date.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

fn items_table(items: &[DailyItem], total_amount: f64) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Item" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                }
            }

            tbody
            {
                @for item in items {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (item.name) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(item.amount)) }
                    }
                }
            }

            tfoot
            {
                tr class="font-semibold text-gray-900 dark:text-white"
                {
                    th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                    td class=(TABLE_CELL_STYLE) data-total { (format_currency(total_amount)) }
                }
            }
        }
    }
}

/// Render one of the caller's daily records without any inputs.
///
/// Records that do not exist or belong to someone else get the 404 page.
pub async fn get_view_daily_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<DailyRecordId>,
) -> Response {
    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    let record = match get_daily_record(user_id, record_id, &connection) {
        Ok(record) => record,
        Err(error) => return error.into_response(),
    };

    let nav_bar = NavBar::new(endpoints::VIEW_DAILY).into_html();
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4"
            {
                "Daily Expenses for " (format_record_date(record.date))
            }

            (items_table(&record.items, record.total_amount))

            p class="my-4" { (link(endpoints::DAILY_RECORDS_VIEW, "Back to records")) }
        }
    };

    base("Daily Record", &[], &content).into_response()
}

#[cfg(test)]
mod daily_page_tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::get_daily_page;

    #[tokio::test]
    async fn renders_entry_form() {
        let response = get_daily_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::SAVE_DAILY, "hx-post");
        for name in ["items", "total"] {
            let selector = Selector::parse(&format!("input[type=hidden][name={name}]")).unwrap();
            assert_eq!(form.select(&selector).count(), 1, "want hidden {name} input");
        }
        let rows = form.select(&Selector::parse("[data-item-row]").unwrap()).count();
        assert_eq!(rows, 1);
    }
}

#[cfg(test)]
mod view_daily_page_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use time::macros::datetime;

    use crate::{
        app_state::DbState,
        daily::{NewDailyRecord, create_daily_record},
        test_utils::{assert_valid_html, create_test_user, parse_html_document},
    };

    use super::get_view_daily_page;

    #[tokio::test]
    async fn shows_items_and_total() {
        let state = DbState::in_memory();
        let connection = state.lock().unwrap();
        let user_id = create_test_user(&connection, "alice");
        let record = create_daily_record(
            user_id,
            NewDailyRecord::new(
                r#"[{"name": "Bus", "amount": 2}, {"name": "Coffee", "amount": 4}]"#,
                None,
            )
            .unwrap(),
            datetime!(2025-10-05 08:30:00),
            &connection,
        )
        .unwrap();
        drop(connection);

        let response =
            get_view_daily_page(State(state), Extension(user_id), Path(record.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(html.select(&Selector::parse("input").unwrap()).count(), 0);
        let rows = html
            .select(&Selector::parse("tbody tr").unwrap())
            .map(|row| row.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Bus"));
        assert!(rows[1].contains("Coffee"));
        let title = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(title.contains("2025-10-05 08:30:00"), "got title {title:?}");
    }

    #[tokio::test]
    async fn foreign_record_is_not_found() {
        let state = DbState::in_memory();
        let connection = state.lock().unwrap();
        let owner = create_test_user(&connection, "alice");
        let intruder = create_test_user(&connection, "mallory");
        let record = create_daily_record(
            owner,
            NewDailyRecord::new(r#"[{"name": "Bus", "amount": 2}]"#, None).unwrap(),
            datetime!(2025-10-05 08:30:00),
            &connection,
        )
        .unwrap();
        drop(connection);

        let response =
            get_view_daily_page(State(state), Extension(intruder), Path(record.id)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
