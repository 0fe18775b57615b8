//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    card::{
        create_card_endpoint, delete_card_endpoint, get_card_page, get_cards_page,
        get_edit_card_page, get_new_card_page, reset_card_endpoint, update_card_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    endpoints,
    entry::{
        create_entry_endpoint, delete_entry_endpoint, get_edit_entry_page, get_entries_page,
        get_new_entry_page, update_entry_endpoint,
    },
    home::get_home_page,
    internal_server_error::get_internal_server_error_page,
    jar::{
        create_jar_endpoint, delete_jar_endpoint, get_edit_jar_page, get_jar_transfer_page,
        get_jars_page, get_new_jar_page, jar_transfer_endpoint, update_jar_endpoint,
    },
    not_found::get_404_not_found,
    report::{get_cash_flow_report_page, get_dre_report_page},
    supplier::{
        create_supplier_endpoint, delete_supplier_endpoint, get_edit_supplier_page,
        get_new_supplier_page, get_suppliers_page, update_supplier_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::HOME_VIEW, get(get_home_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::ENTRIES_VIEW, get(get_entries_page))
        .route(endpoints::NEW_ENTRY_VIEW, get(get_new_entry_page))
        .route(endpoints::EDIT_ENTRY_VIEW, get(get_edit_entry_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::SUPPLIERS_VIEW, get(get_suppliers_page))
        .route(endpoints::NEW_SUPPLIER_VIEW, get(get_new_supplier_page))
        .route(endpoints::EDIT_SUPPLIER_VIEW, get(get_edit_supplier_page))
        .route(endpoints::JARS_VIEW, get(get_jars_page))
        .route(endpoints::NEW_JAR_VIEW, get(get_new_jar_page))
        .route(endpoints::EDIT_JAR_VIEW, get(get_edit_jar_page))
        .route(endpoints::JAR_TRANSFER_VIEW, get(get_jar_transfer_page))
        .route(endpoints::CARDS_VIEW, get(get_cards_page))
        .route(endpoints::NEW_CARD_VIEW, get(get_new_card_page))
        .route(endpoints::CARD_VIEW, get(get_card_page))
        .route(endpoints::EDIT_CARD_VIEW, get(get_edit_card_page))
        .route(
            endpoints::CASH_FLOW_REPORT_VIEW,
            get(get_cash_flow_report_page),
        )
        .route(endpoints::DRE_REPORT_VIEW, get(get_dre_report_page));

    // HTMX form endpoints, these respond with alerts or an HX-Redirect header.
    let api_routes = Router::new()
        .route(endpoints::POST_ENTRY, post(create_entry_endpoint))
        .route(
            endpoints::PUT_ENTRY,
            put(update_entry_endpoint).delete(delete_entry_endpoint),
        )
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(
            endpoints::PUT_CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::POST_SUPPLIER, post(create_supplier_endpoint))
        .route(
            endpoints::PUT_SUPPLIER,
            put(update_supplier_endpoint).delete(delete_supplier_endpoint),
        )
        .route(endpoints::POST_JAR, post(create_jar_endpoint))
        .route(
            endpoints::PUT_JAR,
            put(update_jar_endpoint).delete(delete_jar_endpoint),
        )
        .route(endpoints::POST_JAR_TRANSFER, post(jar_transfer_endpoint))
        .route(endpoints::POST_CARD, post(create_card_endpoint))
        .route(
            endpoints::PUT_CARD,
            put(update_card_endpoint).delete(delete_card_endpoint),
        )
        .route(endpoints::RESET_CARD, post(reset_card_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the home page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::HOME_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_home() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::HOME_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, period::CutoffDay, routing::build_router};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(connection, "America/Sao_Paulo", CutoffDay::default())
            .expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_every_page() {
        let server = get_test_server();

        for endpoint in [
            endpoints::HOME_VIEW,
            endpoints::ENTRIES_VIEW,
            endpoints::NEW_ENTRY_VIEW,
            endpoints::CATEGORIES_VIEW,
            endpoints::NEW_CATEGORY_VIEW,
            endpoints::SUPPLIERS_VIEW,
            endpoints::NEW_SUPPLIER_VIEW,
            endpoints::JARS_VIEW,
            endpoints::NEW_JAR_VIEW,
            endpoints::JAR_TRANSFER_VIEW,
            endpoints::CARDS_VIEW,
            endpoints::NEW_CARD_VIEW,
            endpoints::CASH_FLOW_REPORT_VIEW,
            endpoints::DRE_REPORT_VIEW,
        ] {
            server.get(endpoint).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn report_accepts_date_filters() {
        let server = get_test_server();

        server
            .get(endpoints::CASH_FLOW_REPORT_VIEW)
            .add_query_param("start", "2024-08-11")
            .add_query_param("end", "2024-09-10")
            .add_query_param("payment_method", "")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn created_category_is_listed() {
        let server = get_test_server();

        server
            .post(endpoints::POST_CATEGORY)
            .form(&[("name", "Ingredients"), ("statement_line", "cost-of-sales")])
            .await
            .assert_status_see_other();

        let page = server.get(endpoints::CATEGORIES_VIEW).await.text();
        assert!(page.contains("Ingredients"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_card_page_is_not_found() {
        let server = get_test_server();

        server
            .get(&endpoints::format_endpoint(endpoints::CARD_VIEW, 42))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
