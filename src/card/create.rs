//! Card creation page and endpoint.

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
    AppState, Error,
    card::{CardFormData, NewCard, create_card, form::card_form_fields},
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, submit_button},
    navigation::NavBar,
};

/// The state needed for creating a card.
#[derive(Debug, Clone)]
pub struct CreateCardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the card creation page.
pub async fn get_new_card_page() -> Response {
    new_card_view().into_response()
}

/// Handle card creation form submission.
pub async fn create_card_endpoint(
    State(state): State<CreateCardState>,
    Form(form): Form<CardFormData>,
) -> Response {
    let card = match NewCard::try_from(form) {
        Ok(card) => card,
        Err(error) => {
            tracing::warn!("Rejected invalid card: {error}");
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

    match create_card(card, &connection) {
        Ok(card) => {
            tracing::debug!(
                "Registered card {} with a limit of {}",
                card.id,
                card.total_limit
            );
            (
                HxRedirect(endpoints::CARDS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a card: {error}");
            error.into_alert_response()
        }
    }
}

fn new_card_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_CARD)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (card_form_fields(None))

                (submit_button("Register Card"))
            }
        }
    };

    base("Register Card", &[currency_input_styles()], &content)
}

#[cfg(test)]
mod create_card_tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rust_decimal_macros::dec;

    use crate::{
        card::{
            CardFormData, create::CreateCardState, create_card_endpoint, get_card,
            get_new_card_page,
        },
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, get_test_connection_mutex, must_get_form,
            parse_html_document,
        },
    };

    fn get_state() -> CreateCardState {
        CreateCardState {
            db_connection: get_test_connection_mutex(),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_new_card_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CARD, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "total_limit", "number");
        assert_form_input(&form, "closing_day", "number");
        assert_form_input(&form, "due_day", "number");
        assert_form_submit_button_with_text(&form, "Register Card");
    }

    #[tokio::test]
    async fn can_create_card() {
        let state = get_state();
        let form = CardFormData {
            name: "Company Visa".to_owned(),
            total_limit: dec!(2500),
            closing_day: 3,
            due_day: 10,
            is_active: true,
            notes: String::new(),
        };

        let response = create_card_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CARDS_VIEW);
        let card = get_card(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(card.available_limit, dec!(2500));
    }

    #[tokio::test]
    async fn rejects_invalid_due_day() {
        let form = CardFormData {
            name: "Company Visa".to_owned(),
            total_limit: dec!(2500),
            closing_day: 3,
            due_day: 0,
            is_active: true,
            notes: String::new(),
        };

        let response = create_card_endpoint(State(get_state()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
