//! Entry editing page and endpoint.

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
    database_id::EntryId,
    endpoints,
    entry::{
        EntryFormData, NewEntry, apply_entry_update,
        form::{EntryFormDefaults, EntryFormOptions, entry_form_fields},
        get_entry,
    },
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, submit_button},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for editing an entry.
#[derive(Debug, Clone)]
pub struct EditEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for EditEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the entry editing page.
pub async fn get_edit_entry_page(
    Path(entry_id): Path<EntryId>,
    State(state): State<EditEntryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = match get_entry(entry_id, &connection) {
        Ok(entry) => Some(entry),
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!("Failed to retrieve entry {entry_id}: {error}");
            return Err(error);
        }
    };

    let options = EntryFormOptions::load(entry.as_ref().and_then(|entry| entry.card_id), &connection)
        .inspect_err(|error| tracing::error!("Failed to load entry form options: {error}"))?;

    let defaults = match &entry {
        Some(entry) => EntryFormDefaults::from_entry(entry),
        None => EntryFormDefaults::new(local_today(&state.local_timezone)?),
    };

    Ok(edit_entry_view(entry_id, entry.is_some(), &defaults, &options).into_response())
}

/// Handle entry update form submission.
///
/// The old charge is given back to its card before the new one is taken, all
/// in one transaction.
pub async fn update_entry_endpoint(
    Path(entry_id): Path<EntryId>,
    State(state): State<EditEntryState>,
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

    match apply_entry_update(entry_id, &entry, &mut connection) {
        Ok(_) => (
            HxRedirect(endpoints::ENTRIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::InsufficientLimit { .. }
            | Error::InconsistentPaymentMethod
            | Error::InvalidAmount(_)
            | Error::InvalidReference
            | Error::UpdateMissingEntry),
        ) => {
            tracing::warn!("Could not update entry {entry_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating entry {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_entry_view(
    entry_id: EntryId,
    entry_exists: bool,
    defaults: &EntryFormDefaults<'_>,
    options: &EntryFormOptions,
) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ENTRY_VIEW, entry_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ENTRY, entry_id);
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
                @if !entry_exists {
                    p class="text-red-600 dark:text-red-400" { "Entry not found" }
                }

                (entry_form_fields(defaults, options))

                (submit_button("Update Entry"))
            }
        }
    };

    base("Edit Entry", &[currency_input_styles()], &content)
}
