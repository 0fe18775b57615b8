//! Supplier creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
    supplier::{NewSupplier, SupplierFormData, create_supplier, form::supplier_form_fields},
};

/// The state needed for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplierState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSupplierState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the supplier creation page.
pub async fn get_new_supplier_page() -> Response {
    new_supplier_view().into_response()
}

/// Handle supplier creation form submission.
pub async fn create_supplier_endpoint(
    State(state): State<CreateSupplierState>,
    Form(form): Form<SupplierFormData>,
) -> Response {
    let supplier = match NewSupplier::try_from(form) {
        Ok(supplier) => supplier,
        Err(error) => {
            tracing::warn!("Rejected invalid supplier: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_supplier(supplier, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SUPPLIERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::DuplicateTaxId(_)) => {
            tracing::warn!("Could not create supplier: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a supplier: {error}");
            error.into_alert_response()
        }
    }
}

fn new_supplier_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_SUPPLIER_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_SUPPLIER)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (supplier_form_fields(None))

                (submit_button("Create Supplier"))
            }
        }
    };

    base("Create Supplier", &[], &content)
}

#[cfg(test)]
mod create_supplier_tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;

    use crate::{
        endpoints,
        supplier::{
            SupplierFormData, create::CreateSupplierState, create_supplier_endpoint,
            get_new_supplier_page, get_supplier,
        },
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, get_test_connection_mutex, must_get_form,
            parse_html_document,
        },
    };

    fn get_state() -> CreateSupplierState {
        CreateSupplierState {
            db_connection: get_test_connection_mutex(),
        }
    }

    fn form(name: &str, tax_id: &str) -> SupplierFormData {
        SupplierFormData {
            name: name.to_owned(),
            tax_id: Some(tax_id.to_owned()),
            contact: "(11) 5555-0000".to_owned(),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_new_supplier_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_SUPPLIER, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button_with_text(&form, "Create Supplier");
    }

    #[tokio::test]
    async fn can_create_supplier() {
        let state = get_state();

        let response =
            create_supplier_endpoint(State(state.clone()), Form(form("Atacadão", "12345678000199")))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SUPPLIERS_VIEW);
        let got = get_supplier(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.name.as_ref(), "Atacadão");
        assert_eq!(got.contact, "(11) 5555-0000");
    }

    #[tokio::test]
    async fn rejects_invalid_tax_id() {
        let response = create_supplier_endpoint(State(get_state()), Form(form("Feira", "12-34")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_duplicate_tax_id() {
        let state = get_state();
        create_supplier_endpoint(State(state.clone()), Form(form("Feira", "1234"))).await;

        let response = create_supplier_endpoint(State(state), Form(form("Mercado", "1234")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
