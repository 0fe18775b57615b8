//! Savings jar deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, database_id::JarId, jar::delete_jar};

/// The state needed for deleting a savings jar.
#[derive(Debug, Clone)]
pub struct DeleteJarState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteJarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle savings jar deletion. Transfer entries are kept without a jar.
pub async fn delete_jar_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<DeleteJarState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_jar(jar_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Savings jar deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingJar) => Error::DeleteMissingJar.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting savings jar {jar_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_jar_endpoint_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        entry::{EntryKind, NewEntry, PaymentMethod, create_entry, get_all_entries},
        jar::{NewJar, create_jar, delete_jar_endpoint, transfer_to_jar},
        name::Name,
        test_utils::get_test_connection_mutex,
    };

    use super::DeleteJarState;

    #[tokio::test]
    async fn delete_jar_keeps_transfer_entries() {
        let state = DeleteJarState {
            db_connection: get_test_connection_mutex(),
        };
        let jar_id = {
            let mut connection = state.db_connection.lock().unwrap();
            create_entry(
                &NewEntry::new("Sales", EntryKind::Inflow, dec!(100), date!(2024 - 09 - 01))
                    .payment_method(PaymentMethod::Cash),
                &connection,
            )
            .unwrap();
            let jar = create_jar(
                NewJar {
                    name: Name::new_unchecked("Reserve"),
                    purpose: String::new(),
                    target: dec!(0),
                },
                &connection,
            )
            .unwrap();
            transfer_to_jar(jar.id, dec!(40), date!(2024 - 09 - 02), &mut connection).unwrap();
            jar.id
        };

        let response = delete_jar_endpoint(Path(jar_id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let entries = get_all_entries(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.destination_jar_id.is_none()));
        let transfers: Vec<_> = entries.iter().filter(|entry| entry.is_transfer).collect();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, dec!(40));

        let response = delete_jar_endpoint(Path(jar_id), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
