//! Savings jar editing page and endpoint.

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
    database_id::JarId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, submit_button},
    jar::{JarFormData, NewJar, SavingsJar, form::jar_form_fields, get_jar, update_jar},
    navigation::NavBar,
};

/// The state needed for editing a savings jar.
#[derive(Debug, Clone)]
pub struct EditJarState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditJarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the savings jar editing page.
pub async fn get_edit_jar_page(
    Path(jar_id): Path<JarId>,
    State(state): State<EditJarState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_jar(jar_id, &connection) {
        Ok(jar) => Ok(edit_jar_view(jar_id, Some(&jar)).into_response()),
        Err(Error::NotFound) => Ok(edit_jar_view(jar_id, None).into_response()),
        Err(error) => {
            tracing::error!("Failed to retrieve savings jar {jar_id}: {error}");
            Err(error)
        }
    }
}

/// Handle savings jar update form submission. The balance cannot be edited.
pub async fn update_jar_endpoint(
    Path(jar_id): Path<JarId>,
    State(state): State<EditJarState>,
    Form(form): Form<JarFormData>,
) -> Response {
    let jar = match NewJar::try_from(form) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::warn!("Rejected invalid savings jar: {error}");
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

    match update_jar(jar_id, jar, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::JARS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingJar) => Error::UpdateMissingJar.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating savings jar {jar_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_jar_view(jar_id: JarId, jar: Option<&SavingsJar>) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_JAR_VIEW, jar_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_JAR, jar_id);
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
                @if jar.is_none() {
                    p class="text-red-600 dark:text-red-400" { "Savings jar not found" }
                }

                (jar_form_fields(jar))

                (submit_button("Update Jar"))
            }
        }
    };

    base("Edit Savings Jar", &[currency_input_styles()], &content)
}
