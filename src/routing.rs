//! Application router configuration for the HTML pages, htmx form endpoints and JSON API.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    api::{
        get_balances_json, get_leave_json, get_person_json, grant_leave_json, list_leave,
        list_people,
    },
    dashboard::get_dashboard_page,
    endpoints,
    error_page::{get_404_not_found, get_internal_server_error_page},
    leave::{
        create_leave_endpoint, delete_leave_endpoint, get_edit_leave_page, get_leave_list_page,
        get_leave_page, get_new_leave_page, update_leave_endpoint,
    },
    person::{
        create_person_endpoint, delete_person_endpoint, get_edit_person_page, get_new_person_page,
        get_people_page, get_person_page, update_person_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PEOPLE_VIEW, get(get_people_page))
        .route(endpoints::NEW_PERSON_VIEW, get(get_new_person_page))
        .route(endpoints::PERSON_VIEW, get(get_person_page))
        .route(endpoints::EDIT_PERSON_VIEW, get(get_edit_person_page))
        .route(endpoints::LEAVE_VIEW, get(get_leave_list_page))
        .route(endpoints::NEW_LEAVE_VIEW, get(get_new_leave_page))
        .route(endpoints::LEAVE_RECORD_VIEW, get(get_leave_page))
        .route(endpoints::EDIT_LEAVE_VIEW, get(get_edit_leave_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes answer htmx requests with HX-Redirect headers or alert fragments.
    let form_endpoints = Router::new()
        .route(endpoints::POST_PERSON, post(create_person_endpoint))
        .route(
            endpoints::PUT_PERSON,
            put(update_person_endpoint).delete(delete_person_endpoint),
        )
        .route(endpoints::POST_LEAVE, post(create_leave_endpoint))
        .route(
            endpoints::PUT_LEAVE,
            put(update_leave_endpoint).delete(delete_leave_endpoint),
        );

    let api = Router::new()
        .route(endpoints::API_PEOPLE, get(list_people))
        .route(endpoints::API_PERSON, get(get_person_json))
        .route(endpoints::API_PERSON_BALANCES, get(get_balances_json))
        .route(endpoints::API_LEAVE, get(list_leave).post(grant_leave_json))
        .route(endpoints::API_LEAVE_RECORD, get(get_leave_json));

    pages
        .merge(form_endpoints)
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, build_router, endpoints};

    fn get_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC")
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server")
    }

    #[tokio::test]
    async fn pages_are_routed() {
        let server = get_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::PEOPLE_VIEW,
            endpoints::NEW_PERSON_VIEW,
            endpoints::LEAVE_VIEW,
            endpoints::NEW_LEAVE_VIEW,
        ] {
            let response = server.get(page).await;

            assert_eq!(response.status_code(), StatusCode::OK, "GET {page}");
        }
    }

    #[tokio::test]
    async fn create_person_then_request_leave() {
        let server = get_server();

        server
            .post(endpoints::POST_PERSON)
            .form(&[
                ("first_name", "Alice"),
                ("last_name", "Smith"),
                ("age", "30"),
                ("email", "alice@example.com"),
                ("paid_days", "5"),
                ("non_paid_days", "10"),
            ])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post(endpoints::POST_LEAVE)
            .form(&[
                ("person_id", "1"),
                ("label", "Holiday"),
                ("from_date", "2024-07-01"),
                ("to_date", "2024-07-10"),
                ("days", "8"),
                ("request_id", "form-1"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("hx-redirect"),
            endpoints::format_endpoint(endpoints::LEAVE_RECORD_VIEW, 1)
        );

        let person_page = server
            .get(&endpoints::format_endpoint(endpoints::PERSON_VIEW, 1))
            .await;
        person_page.assert_status_ok();
        person_page.assert_text_contains("5 / 3");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_server();

        server.get("/nope").await.assert_status_not_found();
    }
}
