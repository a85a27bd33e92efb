//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_api, auth_guard_hx, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    daily::{
        delete_daily_endpoint, get_daily_page, get_daily_records_page, get_view_daily_page,
        save_daily_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    expense::{add_expense_endpoint, delete_expense_endpoint},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    short_url::{delete_url_endpoint, redirect_short_code, shorten_endpoint},
    summary::{get_category_data, get_monthly_data},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER, get(get_register_page).post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::SHORT_CODE, get(redirect_short_code));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DELETE_EXPENSE, get(delete_expense_endpoint))
        .route(endpoints::DELETE_URL, get(delete_url_endpoint))
        .route(endpoints::DAILY_VIEW, get(get_daily_page))
        .route(endpoints::DAILY_RECORDS_VIEW, get(get_daily_records_page))
        .route(endpoints::VIEW_DAILY, get(get_view_daily_page))
        .route(endpoints::DELETE_DAILY, get(delete_daily_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // HTMX submits these forms, so anonymous requests need an HX-Redirect to log in.
    let hx_routes = Router::new()
        .route(endpoints::ADD_EXPENSE, post(add_expense_endpoint))
        .route(endpoints::SHORTEN, post(shorten_endpoint))
        .route(endpoints::SAVE_DAILY, post(save_daily_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    let api_routes = Router::new()
        .route(endpoints::MONTHLY_DATA, get(get_monthly_data))
        .route(endpoints::CATEGORY_DATA, get(get_category_data))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_api));

    protected_routes
        .merge(hx_routes)
        .merge(api_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
