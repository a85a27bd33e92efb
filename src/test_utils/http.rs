use axum::{body::Body, response::Response};

#[track_caller]
fn header_value<'a>(response: &'a Response<Body>, header_name: &str) -> &'a str {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("response has no {header_name} header"))
        .to_str()
        .unwrap_or_else(|_| panic!("{header_name} header is not valid ASCII"))
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    assert_eq!(header_value(response, "content-type"), content_type);
}

/// Assert that a plain redirect sends the browser to `location`.
#[track_caller]
pub(crate) fn assert_location(response: &Response<Body>, location: &str) {
    assert_eq!(header_value(response, "location"), location);
}

/// Assert that an HTMX response navigates the browser to `endpoint`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(header_value(response, "hx-redirect"), endpoint);
}
