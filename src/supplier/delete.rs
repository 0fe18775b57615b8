//! Supplier deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, database_id::SupplierId, supplier::delete_supplier};

/// The state needed for deleting a supplier.
#[derive(Debug, Clone)]
pub struct DeleteSupplierState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteSupplierState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle supplier deletion. Returns success alert or error.
pub async fn delete_supplier_endpoint(
    Path(supplier_id): Path<SupplierId>,
    State(state): State<DeleteSupplierState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_supplier(supplier_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Supplier deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingSupplier) => Error::DeleteMissingSupplier.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting supplier {supplier_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
