//! Entry creation page and endpoint.

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
    entry::{
        EntryFormData, NewEntry, apply_entry_create,
        form::{EntryFormDefaults, EntryFormOptions, entry_form_fields},
    },
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, submit_button},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for creating an entry.
#[derive(Debug, Clone)]
pub struct CreateEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the entry creation page, dated today.
pub async fn get_new_entry_page(State(state): State<CreateEntryState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = EntryFormOptions::load(None, &connection)
        .inspect_err(|error| tracing::error!("Failed to load entry form options: {error}"))?;

    Ok(new_entry_view(&EntryFormDefaults::new(today), &options).into_response())
}

/// Handle entry creation form submission.
///
/// Outflows paid by credit card are taken out of the card's available limit
/// in the same transaction as the insert.
pub async fn create_entry_endpoint(
    State(state): State<CreateEntryState>,
    Form(form): Form<EntryFormData>,
) -> Response {
    let entry = match NewEntry::try_from(form) {
        Ok(entry) => entry,
        Err(error) => {
            tracing::warn!("Rejected invalid entry: {error}");
            return error.into_alert_response();
        }
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match apply_entry_create(&entry, &mut connection) {
        Ok(_) => (
            HxRedirect(endpoints::ENTRIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::InsufficientLimit { .. }
            | Error::InconsistentPaymentMethod
            | Error::InvalidAmount(_)
            | Error::InvalidReference),
        ) => {
            tracing::warn!("Could not create entry: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an entry: {error}");
            error.into_alert_response()
        }
    }
}

fn new_entry_view(defaults: &EntryFormDefaults<'_>, options: &EntryFormOptions) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ENTRY_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_ENTRY)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (entry_form_fields(defaults, options))

                (submit_button("Record Entry"))
            }
        }
    };

    base("Record Entry", &[currency_input_styles()], &content)
}
