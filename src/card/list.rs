//! Cards listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::{CreditCard, get_all_cards, total_available_limit},
    endpoints,
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency, format_percent,
    },
    navigation::NavBar,
};

/// The state needed for the cards listing page.
#[derive(Debug, Clone)]
pub struct CardsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CardsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the cards listing page.
pub async fn get_cards_page(State(state): State<CardsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let cards = get_all_cards(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve cards: {error}"))?;

    Ok(cards_view(&cards).into_response())
}

fn cards_view(cards: &[CreditCard]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CARDS_VIEW).into_html();
    let total_available = total_available_limit(cards);

    let table_row = |card: &CreditCard| {
        let detail_url = endpoints::format_endpoint(endpoints::CARD_VIEW, card.id);
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CARD_VIEW, card.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CARD, card.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its entries will be kept without a card.",
            card.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(detail_url) class=(LINK_STYLE) { (card.name) }

                    @if !card.is_active {
                        " "
                        span class=(BADGE_STYLE) { "Inactive" }
                    }
                }
                td class="px-6 py-4 text-right tabular-nums" { (format_currency(card.total_limit)) }
                td class="px-6 py-4 text-right tabular-nums" { (format_currency(card.available_limit)) }
                td class="px-6 py-4 text-right tabular-nums" { (format_percent(card.usage_percent())) }
                td class=(TABLE_CELL_STYLE) { (card.closing_day) }
                td class=(TABLE_CELL_STYLE) { (card.due_day) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Credit Cards" }
                        p id="total-available" class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            "Available on active cards: " (format_currency(total_available))
                        }
                    }

                    a href=(endpoints::NEW_CARD_VIEW) class=(LINK_STYLE) { "Register Card" }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class="px-6 py-4 text-right" { "Total limit" }
                                th scope="col" class="px-6 py-4 text-right" { "Available" }
                                th scope="col" class="px-6 py-4 text-right" { "Used" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Closes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Due" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for card in cards {
                                (table_row(card))
                            }

                            @if cards.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No cards registered yet. "
                                        a href=(endpoints::NEW_CARD_VIEW) class=(LINK_STYLE)
                                        {
                                            "Register your first card"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Credit Cards", &[], &content)
}
