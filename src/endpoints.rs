//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete_expense/{expense_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for the registration page and registration requests.
pub const REGISTER: &str = "/register";
/// The route for the log in page and log in requests.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for quickly adding a single expense.
pub const ADD_EXPENSE: &str = "/add_expense";
/// The route to delete a single expense.
pub const DELETE_EXPENSE: &str = "/delete_expense/{expense_id}";
/// The route for creating a short URL.
pub const SHORTEN: &str = "/shorten";
/// The route to delete a short URL.
pub const DELETE_URL: &str = "/delete_url/{url_id}";
/// The public route that resolves a short code to its target.
pub const SHORT_CODE: &str = "/{code}";
/// The route for the monthly expense totals as JSON.
pub const MONTHLY_DATA: &str = "/api/monthly_data";
/// The route for the per-category expense totals as JSON.
pub const CATEGORY_DATA: &str = "/api/category_data";
/// The page for entering an itemized daily expense record.
pub const DAILY_VIEW: &str = "/daily";
/// The route for saving a daily expense record.
pub const SAVE_DAILY: &str = "/save_daily";
/// The page listing daily expense records.
pub const DAILY_RECORDS_VIEW: &str = "/daily_records";
/// The read-only page for a single daily expense record.
pub const VIEW_DAILY: &str = "/view_daily/{record_id}";
/// The route to delete a daily expense record.
pub const DELETE_DAILY: &str = "/delete_daily/{record_id}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/view_daily/{record_id}', '{record_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENSE);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_EXPENSE, 1));
        assert_endpoint_is_valid_uri(endpoints::SHORTEN);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_URL, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::SHORT_CODE, "aB3dE9"));
        assert_endpoint_is_valid_uri(endpoints::MONTHLY_DATA);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY_DATA);
        assert_endpoint_is_valid_uri(endpoints::DAILY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SAVE_DAILY);
        assert_endpoint_is_valid_uri(endpoints::DAILY_RECORDS_VIEW);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::VIEW_DAILY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_DAILY, 1));
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::VIEW_DAILY, 42),
            "/view_daily/42".to_owned()
        );
    }

    #[test]
    fn format_endpoint_replaces_parameter_at_start() {
        assert_eq!(format_endpoint("/{code}", "abc123"), "/abc123".to_owned());
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::DASHBOARD_VIEW, 1),
            endpoints::DASHBOARD_VIEW.to_owned()
        );
    }
}
