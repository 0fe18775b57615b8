//! Supplier editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::SupplierId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
    supplier::{
        NewSupplier, Supplier, SupplierFormData, form::supplier_form_fields, get_supplier,
        update_supplier,
    },
};

/// The state needed for editing a supplier.
#[derive(Debug, Clone)]
pub struct EditSupplierState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditSupplierState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the supplier editing page.
pub async fn get_edit_supplier_page(
    Path(supplier_id): Path<SupplierId>,
    State(state): State<EditSupplierState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_supplier(supplier_id, &connection) {
        Ok(supplier) => Ok(edit_supplier_view(supplier_id, Some(&supplier)).into_response()),
        Err(Error::NotFound) => Ok(edit_supplier_view(supplier_id, None).into_response()),
        Err(error) => {
            tracing::error!("Failed to retrieve supplier {supplier_id}: {error}");
            Err(error)
        }
    }
}

/// Handle supplier update form submission.
pub async fn update_supplier_endpoint(
    Path(supplier_id): Path<SupplierId>,
    State(state): State<EditSupplierState>,
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

    match update_supplier(supplier_id, supplier, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SUPPLIERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingSupplier | Error::DuplicateTaxId(_))) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating supplier {supplier_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_supplier_view(supplier_id: SupplierId, supplier: Option<&Supplier>) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_SUPPLIER_VIEW, supplier_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_SUPPLIER, supplier_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                @if supplier.is_none() {
                    p class="text-red-600 dark:text-red-400" { "Supplier not found" }
                }

                (supplier_form_fields(supplier))

                (submit_button("Update Supplier"))
            }
        }
    };

    base("Edit Supplier", &[], &content)
}

#[cfg(test)]
mod edit_supplier_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;

    use crate::{
        name::Name,
        supplier::{
            NewSupplier, SupplierFormData, TaxId, create_supplier, edit::EditSupplierState,
            get_edit_supplier_page, get_supplier, update_supplier_endpoint,
        },
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_valid_html,
            get_test_connection_mutex, must_get_form, parse_html_document,
        },
    };

    fn get_state() -> EditSupplierState {
        EditSupplierState {
            db_connection: get_test_connection_mutex(),
        }
    }

    fn insert_supplier(state: &EditSupplierState, name: &str, tax_id: Option<&str>) -> i64 {
        create_supplier(
            NewSupplier {
                name: Name::new_unchecked(name),
                tax_id: tax_id.map(TaxId::new_unchecked),
                contact: String::new(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn get_edit_supplier_page_prefills_form() {
        let state = get_state();
        let supplier_id = insert_supplier(&state, "Feira", None);

        let response = get_edit_supplier_page(Path(supplier_id), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_form_input_with_value(&must_get_form(&html), "name", "text", "Feira");
    }

    #[tokio::test]
    async fn get_edit_supplier_page_with_invalid_id_shows_error() {
        let response = get_edit_supplier_page(Path(999), State(get_state()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_form_error_message(&must_get_form(&html), "Supplier not found");
    }

    #[tokio::test]
    async fn update_supplier_endpoint_succeeds() {
        let state = get_state();
        let supplier_id = insert_supplier(&state, "Feira", None);
        let form = SupplierFormData {
            name: "Feira Livre".to_owned(),
            tax_id: None,
            contact: "Seu Zé".to_owned(),
        };

        let response =
            update_supplier_endpoint(Path(supplier_id), State(state.clone()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let got = get_supplier(supplier_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.contact, "Seu Zé");
    }

    #[tokio::test]
    async fn update_supplier_endpoint_rejects_taken_tax_id() {
        let state = get_state();
        insert_supplier(&state, "Atacadão", Some("111"));
        let supplier_id = insert_supplier(&state, "Feira", None);
        let form = SupplierFormData {
            name: "Feira".to_owned(),
            tax_id: Some("111".to_owned()),
            contact: String::new(),
        };

        let response = update_supplier_endpoint(Path(supplier_id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
