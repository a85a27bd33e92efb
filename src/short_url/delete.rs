use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    app_state::DbState,
    auth::UserID,
    endpoints,
    short_url::{ShortUrlId, delete_short_url},
};

/// Delete one of the caller's short URLs and go back to the dashboard.
pub async fn delete_url_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(url_id): Path<ShortUrlId>,
) -> Response {
    let connection = match state.lock() {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_short_url(user_id, url_id, &connection) {
        Ok(0) => tracing::debug!("User {user_id} tried to delete missing short URL {url_id}"),
        Ok(_) => tracing::debug!("Deleted short URL {url_id} for user {user_id}"),
        Err(error) => {
            tracing::error!("Could not delete short URL {url_id}: {error}");
            return error.into_response();
        }
    }

    Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::OffsetDateTime;

    use crate::{
        app_state::DbState,
        endpoints,
        short_url::{ShortCode, TargetUrl, create_short_url, get_short_urls},
        test_utils::{create_test_user, assert_location},
    };

    use super::delete_url_endpoint;

    #[tokio::test]
    async fn only_owner_can_delete() {
        let state = DbState::in_memory();
        let connection = state.lock().unwrap();
        let owner = create_test_user(&connection, "alice");
        let intruder = create_test_user(&connection, "mallory");
        let short_url = create_short_url(
            owner,
            &TargetUrl::new("https://example.com", None).unwrap(),
            OffsetDateTime::now_utc(),
            ShortCode::random,
            &connection,
        )
        .unwrap();
        drop(connection);

        let response =
            delete_url_endpoint(State(state.clone()), Extension(intruder), Path(short_url.id))
                .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_short_urls(owner, &state.lock().unwrap()).unwrap().len(), 1);

        let response =
            delete_url_endpoint(State(state.clone()), Extension(owner), Path(short_url.id)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_location(&response, endpoints::DASHBOARD_VIEW);
        assert!(get_short_urls(owner, &state.lock().unwrap()).unwrap().is_empty());
    }
}
