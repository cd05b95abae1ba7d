//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
    home::{get_home_page, get_metrics_api, post_dates},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::HOME_VIEW, get(get_home_page))
        .route(endpoints::HOME_DATES_API, post(post_dates))
        .route(endpoints::METRICS_API, get(get_metrics_api))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the home page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::HOME_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde::Serialize;

    use crate::{AppState, endpoints, metrics::Metrics};

    use super::build_router;

    const SEVEN_DAY_QUERY: &str =
        "dates%5Bstart%5D=2024-01-01T00%3A00%3A00.000Z&dates%5Bend%5D=2024-01-08T00%3A00%3A00.000Z";

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn, "Etc/UTC", "Acme").unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[derive(Serialize)]
    struct DatesFormData {
        start: &'static str,
        end: &'static str,
        preset: &'static str,
    }

    #[tokio::test]
    async fn home_without_query_redirects_to_default_range() {
        let server = get_test_server();

        let response = server.get(endpoints::HOME_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header(LOCATION);
        let location = location.to_str().unwrap();
        assert!(location.starts_with("/home?dates%5Bstart%5D="), "{location}");
    }

    #[tokio::test]
    async fn home_with_range_renders_page() {
        let server = get_test_server();

        let response = server
            .get(endpoints::HOME_VIEW)
            .add_raw_query_param(SEVEN_DAY_QUERY)
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Hello, Acme"));
    }

    #[tokio::test]
    async fn date_form_redirects_to_selected_range() {
        let server = get_test_server();

        let response = server
            .post(endpoints::HOME_DATES_API)
            .form(&DatesFormData {
                start: "2024-02-01",
                end: "2024-02-15",
                preset: "custom",
            })
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header(LOCATION);
        assert_eq!(
            location.to_str().unwrap(),
            "/home?dates%5Bstart%5D=2024-02-01T00%3A00%3A00.000Z\
                &dates%5Bend%5D=2024-02-15T23%3A59%3A59.999Z"
        );
    }

    #[tokio::test]
    async fn metrics_api_returns_json() {
        let server = get_test_server();

        let response = server
            .get(endpoints::METRICS_API)
            .add_raw_query_param(SEVEN_DAY_QUERY)
            .await;

        response.assert_status_ok();
        let metrics = response.json::<Metrics>();
        assert_eq!(metrics.total_transactions, 0);
        assert!(metrics.card_brands.is_empty());
        assert_eq!(metrics.volume_by_weekday.len(), 7);
    }

    #[tokio::test]
    async fn metrics_api_without_range_is_bad_request() {
        let server = get_test_server();

        let response = server.get(endpoints::METRICS_API).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/balance").await;

        response.assert_status_not_found();
    }
}
