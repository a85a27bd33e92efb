//! Authentication middleware that validates cookies, extends sessions, and
//! rejects anonymous requests.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::build_log_in_redirect_url,
    },
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How far each authenticated request pushes out the cookie expiry.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Inserts the user ID from a valid auth cookie into the request extensions
/// and runs the request, otherwise answers with `reject(&request)`.
///
/// The cookie expiry on the response is extended by the state's cookie duration.
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    reject: impl FnOnce(&Request) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::<Key>::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}");
            return reject(&Request::from_parts(parts, body));
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(_) => return reject(&Request::from_parts(parts, body)),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, value) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, value.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware for HTML pages.
///
/// Anonymous requests are redirected to the log-in page with the requested
/// page as the `redirect_url` query parameter.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |request| {
        Redirect::to(&build_log_in_redirect_url(request)).into_response()
    })
    .await
}

/// Middleware for routes that HTMX submits forms to.
///
/// Anonymous requests get an `HX-Redirect` to the log-in page so that the
/// browser navigates instead of swapping the log-in page into the form.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |request| {
        (
            HxRedirect(build_log_in_redirect_url(request)),
            StatusCode::SEE_OTHER,
        )
            .into_response()
    })
    .await
}

/// Middleware for the JSON API.
///
/// Anonymous requests get a 401 with a JSON error body.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard_api(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |_| {
        Error::NotAuthenticated.into_response()
    })
    .await
}

#[cfg(test)]
impl AuthState {
    /// Auth state with the default sliding session window.
    pub fn new(cookie_key: Key) -> Self {
        Self {
            cookie_key,
            cookie_duration: crate::auth::DEFAULT_COOKIE_DURATION,
        }
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        http::StatusCode,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::{COOKIE_TOKEN, UserID, auth_guard, auth_guard_api, auth_guard_hx, set_auth_cookie},
        endpoints,
    };

    use super::AuthState;

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        format!("Hello, user {user_id}!")
    }

    async fn stub_log_in_route(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(1), state.cookie_duration)
    }

    async fn stub_stale_log_in_route(jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(1), Duration::seconds(5))
    }

    const TEST_LOG_IN_ROUTE: &str = "/stub_log_in";
    const TEST_STALE_LOG_IN_ROUTE: &str = "/stub_stale_log_in";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";
    const TEST_HX_ROUTE: &str = "/hx/protected";

    fn get_test_server() -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = AuthState::new(Key::from(&hash));

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .merge(
                Router::new()
                    .route(TEST_API_ROUTE, get(test_handler))
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        auth_guard_api,
                    )),
            )
            .merge(
                Router::new()
                    .route(TEST_HX_ROUTE, post(test_handler))
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        auth_guard_hx,
                    )),
            )
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .route(TEST_STALE_LOG_IN_ROUTE, post(stub_stale_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(2),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[tokio::test]
    async fn protected_route_receives_user_id() {
        let server = get_test_server();
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("Hello, user 1!");
    }

    #[tokio::test]
    async fn guard_extends_short_lived_cookie() {
        let server = get_test_server();
        let token_cookie = server
            .post(TEST_STALE_LOG_IN_ROUTE)
            .await
            .cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        let auth_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            auth_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
        assert_eq!(auth_cookie.secure(), Some(true));
        assert_eq!(auth_cookie.http_only(), Some(true));
        assert_eq!(auth_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_log_in() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        let expected_query =
            serde_urlencoded::to_string([("redirect_url", TEST_PROTECTED_ROUTE)]).unwrap();
        assert_eq!(
            response.header("location"),
            format!("{}?{}", endpoints::LOG_IN, expected_query)
        );
    }

    #[tokio::test]
    async fn invalid_cookie_redirects_to_log_in() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::new(COOKIE_TOKEN, "FOOBAR"))
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn api_route_without_cookie_is_unauthorized() {
        let server = get_test_server();

        let response = server.get(TEST_API_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert!(body.get("error").is_some(), "want JSON error body, got {body}");
    }

    #[tokio::test]
    async fn api_route_with_cookie_succeeds() {
        let server = get_test_server();
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        server
            .get(TEST_API_ROUTE)
            .add_cookie(token_cookie)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn hx_route_without_cookie_gets_hx_redirect() {
        let server = get_test_server();

        let response = server.post(TEST_HX_ROUTE).await;

        response.assert_status_see_other();
        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN),
            "want HX-Redirect to the log-in page"
        );
    }
}
