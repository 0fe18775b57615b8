//! Endpoint for restoring a card's limit once its statement has been paid.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, database_id::CardId, endpoints, entry::reset_statement};

/// The state needed for resetting a card's statement.
#[derive(Debug, Clone)]
pub struct ResetCardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ResetCardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Restore the card's available limit to its total limit and reload the card page.
pub async fn reset_card_endpoint(
    Path(card_id): Path<CardId>,
    State(state): State<ResetCardState>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match reset_statement(card_id, &mut connection) {
        Ok(card) => {
            tracing::info!("Statement of card {} paid, limit restored to {}", card.id, card.total_limit);

            (
                HxRedirect(endpoints::format_endpoint(endpoints::CARD_VIEW, card_id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::UpdateMissingCard) => Error::UpdateMissingCard.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while resetting card {card_id}: {error}");
            error.into_alert_response()
        }
    }
}
