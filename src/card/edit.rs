//! Card editing page and endpoint.

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
    card::{CardFormData, CreditCard, NewCard, form::card_form_fields, get_card, update_card},
    database_id::CardId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, submit_button},
    navigation::NavBar,
};

/// The state needed for editing a card.
#[derive(Debug, Clone)]
pub struct EditCardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the card editing page.
pub async fn get_edit_card_page(
    Path(card_id): Path<CardId>,
    State(state): State<EditCardState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_card(card_id, &connection) {
        Ok(card) => Ok(edit_card_view(card_id, Some(&card)).into_response()),
        Err(Error::NotFound) => Ok(edit_card_view(card_id, None).into_response()),
        Err(error) => {
            tracing::error!("Failed to retrieve card {card_id}: {error}");
            Err(error)
        }
    }
}

/// Handle card update form submission.
pub async fn update_card_endpoint(
    Path(card_id): Path<CardId>,
    State(state): State<EditCardState>,
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

    match update_card(card_id, card, &connection) {
        Ok(card) => {
            tracing::debug!(
                "Card {card_id} now has {} available of {}",
                card.available_limit,
                card.total_limit
            );
            (
                HxRedirect(endpoints::CARDS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::UpdateMissingCard) => Error::UpdateMissingCard.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating card {card_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_card_view(card_id: CardId, card: Option<&CreditCard>) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CARD_VIEW, card_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CARD, card_id);
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
                @if card.is_none() {
                    p class="text-red-600 dark:text-red-400" { "Card not found" }
                }

                (card_form_fields(card))

                (submit_button("Update Card"))
            }
        }
    };

    base("Edit Card", &[currency_input_styles()], &content)
}

#[cfg(test)]
mod edit_card_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rust_decimal_macros::dec;

    use crate::{
        card::{
            CardFormData, NewCard, create_card, edit::EditCardState, get_card,
            get_edit_card_page, update_card_endpoint,
        },
        name::Name,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_valid_html,
            get_test_connection_mutex, must_get_form, parse_html_document,
        },
    };

    fn get_state() -> EditCardState {
        EditCardState {
            db_connection: get_test_connection_mutex(),
        }
    }

    fn insert_card(state: &EditCardState) -> i64 {
        create_card(
            NewCard {
                name: Name::new_unchecked("Company Visa"),
                total_limit: dec!(1000),
                closing_day: 5,
                due_day: 12,
                is_active: true,
                notes: String::new(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn get_edit_card_page_prefills_form() {
        let state = get_state();
        let card_id = insert_card(&state);

        let response = get_edit_card_page(Path(card_id), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "name", "text", "Company Visa");
        assert_form_input_with_value(&form, "total_limit", "number", "1000.00");
        assert_form_input_with_value(&form, "closing_day", "number", "5");
    }

    #[tokio::test]
    async fn get_edit_card_page_with_invalid_id_shows_error() {
        let response = get_edit_card_page(Path(999), State(get_state()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_form_error_message(&must_get_form(&html), "Card not found");
    }

    #[tokio::test]
    async fn update_card_endpoint_keeps_used_amount() {
        let state = get_state();
        let card_id = insert_card(&state);
        {
            let connection = state.db_connection.lock().unwrap();
            let mut card = get_card(card_id, &connection).unwrap();
            card.consume(dec!(250)).unwrap();
            crate::card::db::save_available_limit(&card, &connection).unwrap();
        }
        let form = CardFormData {
            name: "Company Visa".to_owned(),
            total_limit: dec!(1500),
            closing_day: 5,
            due_day: 12,
            is_active: true,
            notes: String::new(),
        };

        let response = update_card_endpoint(Path(card_id), State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let card = get_card(card_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(card.total_limit, dec!(1500));
        assert_eq!(card.available_limit, dec!(1250));
    }

    #[tokio::test]
    async fn update_missing_card_returns_not_found() {
        let form = CardFormData {
            name: "Ghost".to_owned(),
            total_limit: dec!(1),
            closing_day: 1,
            due_day: 1,
            is_active: false,
            notes: String::new(),
        };

        let response = update_card_endpoint(Path(7), State(get_state()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
