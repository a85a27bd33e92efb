//! Helpers for the URL to return to after logging in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN && path != endpoints::LOG_OUT
}

/// Reduce `raw_url` to a local path and query, or `None` if it points
/// anywhere else.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in page URL with the requested page as the `redirect_url` query parameter.
///
/// Falls back to the plain log-in page if the requested page is not a safe target.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    request
        .uri()
        .path_and_query()
        .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
        .and_then(|target| build_log_in_redirect_url_from_target(&target))
        .unwrap_or_else(|| endpoints::LOG_IN.to_owned())
}

fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN, param)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn keeps_local_path_and_query() {
        assert_eq!(
            normalize_redirect_url("/daily_records?start_date=2025-01-01"),
            Some("/daily_records?start_date=2025-01-01".to_owned())
        );
    }

    #[test]
    fn rejects_external_urls() {
        assert_eq!(normalize_redirect_url("https://example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("//example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("dashboard"), None);
    }

    #[test]
    fn rejects_log_in_page() {
        assert_eq!(normalize_redirect_url(endpoints::LOG_IN), None);
        assert_eq!(normalize_redirect_url("/login?redirect_url=%2Fdaily"), None);
    }

    #[test]
    fn builds_log_in_url_from_request() {
        let request = Request::builder()
            .uri("/daily_records?start_date=2025-01-01&end_date=2025-01-31")
            .body(Body::empty())
            .unwrap();

        let got = build_log_in_redirect_url(&request);

        let want_query = serde_urlencoded::to_string([(
            "redirect_url",
            "/daily_records?start_date=2025-01-01&end_date=2025-01-31",
        )])
        .unwrap();
        assert_eq!(got, format!("{}?{}", endpoints::LOG_IN, want_query));
    }
}
