//! Page and endpoint for moving cash into a savings jar.

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
use rust_decimal::Decimal;

use crate::{
    AppState, Error, endpoints,
    html::{
        FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        currency_input_styles, format_currency, submit_button,
    },
    jar::{SavingsJar, TransferFormData, current_cash_balance, get_all_jars, transfer_to_jar},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for transferring cash into a savings jar.
#[derive(Debug, Clone)]
pub struct JarTransferState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for JarTransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the transfer page with the current cash balance.
pub async fn get_jar_transfer_page(
    State(state): State<JarTransferState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let jars = get_all_jars(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve savings jars: {error}"))?;
    let cash_balance = current_cash_balance(&connection)
        .inspect_err(|error| tracing::error!("Failed to calculate the cash balance: {error}"))?;

    Ok(jar_transfer_view(&jars, cash_balance).into_response())
}

/// Handle the transfer form submission, dating the transfer today.
pub async fn jar_transfer_endpoint(
    State(state): State<JarTransferState>,
    Form(form): Form<TransferFormData>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match transfer_to_jar(form.jar_id, form.amount, today, &mut connection) {
        Ok(_) => (
            HxRedirect(endpoints::JARS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::InsufficientBalance { .. }
            | Error::InvalidAmount(_)
            | Error::InvalidReference),
        ) => {
            tracing::warn!("Could not transfer to savings jar {}: {error}", form.jar_id);
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while transferring to a savings jar: {error}");
            error.into_alert_response()
        }
    }
}

fn jar_transfer_view(jars: &[SavingsJar], cash_balance: Decimal) -> Markup {
    let nav_bar = NavBar::new(endpoints::JAR_TRANSFER_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_JAR_TRANSFER)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                p id="cash-balance" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Cash balance: " (format_currency(cash_balance))
                }

                @if jars.is_empty() {
                    p class="text-red-600 dark:text-red-400"
                    {
                        "Create a savings jar before transferring money. "
                        a href=(endpoints::NEW_JAR_VIEW) class=(LINK_STYLE) { "Create Jar" }
                    }
                }

                div
                {
                    label for="jar_id" class=(FORM_LABEL_STYLE) { "Savings jar" }

                    select id="jar_id" name="jar_id" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for jar in jars {
                            option value=(jar.id) { (jar.name) }
                        }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    div class="input-wrapper w-full"
                    {
                        input
                            id="amount"
                            type="number"
                            name="amount"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                (submit_button("Transfer"))
            }
        }
    };

    base("Transfer to Savings Jar", &[currency_input_styles()], &content)
}
