//! Savings jar creation page and endpoint.

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
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, submit_button},
    jar::{JarFormData, NewJar, create_jar, form::jar_form_fields},
    navigation::NavBar,
};

/// The state needed for creating a savings jar.
#[derive(Debug, Clone)]
pub struct CreateJarState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateJarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the savings jar creation page.
pub async fn get_new_jar_page() -> Response {
    new_jar_view().into_response()
}

/// Handle savings jar creation form submission.
pub async fn create_jar_endpoint(
    State(state): State<CreateJarState>,
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

    match create_jar(jar, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::JARS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a savings jar: {error}");
            error.into_alert_response()
        }
    }
}

fn new_jar_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_JAR_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_JAR)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (jar_form_fields(None))

                (submit_button("Create Jar"))
            }
        }
    };

    base("Create Savings Jar", &[currency_input_styles()], &content)
}
