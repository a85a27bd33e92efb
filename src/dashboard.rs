//! The landing page for logged in users.
//!
//! Lists the user's expenses and short links next to the quick-add forms,
//! the top five expenses and the summary charts.

use axum::{
    Extension,
    extract::State,
    http::{HeaderMap, header::HOST},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    app_state::DbState,
    auth::{UserID, get_user_by_id},
    endpoints::{self, format_endpoint},
    expense::{Expense, expense_form, get_expenses, get_top_expenses, get_total_expenses},
    html::{
        BUTTON_DELETE_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    short_url::{ShortUrl, get_short_urls, shorten_form},
    summary::{
        SummaryChart, category_chart, category_totals, charts_script, charts_view, monthly_chart,
        monthly_totals,
    },
};

/// How many of the largest expenses are listed.
const TOP_EXPENSES_LIMIT: u32 = 5;

const SECTION_STYLE: &str = "w-full mb-8";
const SECTION_HEADER_STYLE: &str = "text-xl font-semibold mb-4";

struct DashboardData {
    username: String,
    total_expenses: f64,
    expenses: Vec<Expense>,
    top_expenses: Vec<Expense>,
    short_urls: Vec<ShortUrl>,
}

fn load_dashboard_data(user_id: UserID, connection: &Connection) -> Result<DashboardData, Error> {
    Ok(DashboardData {
        username: get_user_by_id(user_id, connection)?.username.to_string(),
        total_expenses: get_total_expenses(user_id, connection)?,
        expenses: get_expenses(user_id, connection)?,
        top_expenses: get_top_expenses(user_id, TOP_EXPENSES_LIMIT, connection)?,
        short_urls: get_short_urls(user_id, connection)?,
    })
}

/// Render the dashboard for the logged in user.
pub async fn get_dashboard_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    headers: HeaderMap,
) -> Response {
    let data = {
        let connection = match state.lock() {
            Ok(connection) => connection,
            Err(error) => return error.into_response(),
        };

        match load_dashboard_data(user_id, &connection) {
            Ok(data) => data,
            Err(error) => {
                tracing::error!("Could not load the dashboard for user {user_id}: {error}");
                return error.into_response();
            }
        }
    };

    let host = headers.get(HOST).and_then(|host| host.to_str().ok());

    dashboard_view(&data, host).into_response()
}

fn dashboard_view(data: &DashboardData, host: Option<&str>) -> Markup {
    let monthly = monthly_totals(&data.expenses);
    let charts = if monthly.is_empty() {
        Vec::new()
    } else {
        vec![
            SummaryChart {
                id: "monthly-chart",
                options: monthly_chart(&monthly).to_string(),
            },
            SummaryChart {
                id: "category-chart",
                options: category_chart(&category_totals(&data.expenses)).to_string(),
            },
        ]
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl"
            {
                h1 class="text-2xl font-bold my-4" { "Welcome, " (data.username) }

                p id="total-expenses" class="text-lg mb-8"
                {
                    "Total spent: "
                    span class="font-semibold" { (format_currency(data.total_expenses)) }
                }

                @if charts.is_empty() {
                    p class="mb-8 text-gray-600 dark:text-gray-400"
                    {
                        "Add an expense to see your spending charts."
                    }
                } @else {
                    (charts_view(&charts))
                }

                div class="grid grid-cols-1 lg:grid-cols-2 gap-8"
                {
                    section class=(SECTION_STYLE)
                    {
                        h2 class=(SECTION_HEADER_STYLE) { "Add Expense" }
                        (expense_form(None, None))
                    }

                    section class=(SECTION_STYLE)
                    {
                        h2 class=(SECTION_HEADER_STYLE) { "Shorten a Link" }
                        (shorten_form("", None))
                    }
                }

                section id="top-expenses" class=(SECTION_STYLE)
                {
                    h2 class=(SECTION_HEADER_STYLE) { "Top Expenses" }
                    (expenses_table(&data.top_expenses, false))
                }

                section id="expenses" class=(SECTION_STYLE)
                {
                    h2 class=(SECTION_HEADER_STYLE) { "All Expenses" }
                    (expenses_table(&data.expenses, true))
                }

                section id="short-urls" class=(SECTION_STYLE)
                {
                    h2 class=(SECTION_HEADER_STYLE) { "Short Links" }
                    (short_urls_table(&data.short_urls, host))
                }
            }
        }
    };

    let scripts = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&charts),
        ]
    };

    base("Dashboard", &scripts, &content)
}

fn expenses_table(expenses: &[Expense], with_delete: bool) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        @if with_delete {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }
                }

                tbody
                {
                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan=(if with_delete { 5 } else { 4 }) class=(TABLE_CELL_STYLE)
                            {
                                "No expenses yet."
                            }
                        }
                    }

                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (expense.date) }
                            td class=(TABLE_CELL_STYLE) { (expense.description) }
                            td class=(TABLE_CELL_STYLE) { (expense.category) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                            @if with_delete {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    a
                                        href=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                                        onclick="return confirm('Delete this expense?')"
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
}

fn short_urls_table(short_urls: &[ShortUrl], host: Option<&str>) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Short Link" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Original URL" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if short_urls.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="3" class=(TABLE_CELL_STYLE) { "No short links yet." }
                        }
                    }

                    @for short_url in short_urls {
                        @let path = format_endpoint(endpoints::SHORT_CODE, &short_url.short_code);
                        tr class=(TABLE_ROW_STYLE) data-short-url-id=(short_url.id)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                a href=(path) class=(LINK_STYLE)
                                {
                                    (host.unwrap_or_default()) (path)
                                }
                            }
                            td class={(TABLE_CELL_STYLE) " break-all"} { (short_url.original_url) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                a
                                    href=(format_endpoint(endpoints::DELETE_URL, short_url.id))
                                    onclick="return confirm('Delete this link?')"
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
