//! Card detail page: limits, usage and the purchases of the current statement cycle.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::{CreditCard, get_card},
    database_id::CardId,
    endpoints,
    entry::{LedgerEntry, get_card_entries},
    html::{
        BADGE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, format_date, format_percent,
    },
    money::sum,
    navigation::NavBar,
    period::{AccountingPeriod, CutoffDay, resolve_period},
    timezone::local_today,
};

/// The state needed for the card detail page.
#[derive(Debug, Clone)]
pub struct CardDetailState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CardDetailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render a card with the statement cycle that today falls in.
///
/// The cycle starts on the card's closing day.
pub async fn get_card_page(
    Path(card_id): Path<CardId>,
    State(state): State<CardDetailState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let card = get_card(card_id, &connection)?;
    let cycle = resolve_period(today, CutoffDay::new(card.closing_day)?);
    let entries = get_card_entries(card_id, cycle, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve entries for card {card_id}: {error}"))?;

    Ok(card_view(&card, cycle, &entries).into_response())
}

fn card_view(card: &CreditCard, cycle: AccountingPeriod, entries: &[LedgerEntry]) -> Markup {
    let card_url = endpoints::format_endpoint(endpoints::CARD_VIEW, card.id);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CARD_VIEW, card.id);
    let reset_url = endpoints::format_endpoint(endpoints::RESET_CARD, card.id);
    let nav_bar = NavBar::new(&card_url).into_html();
    let cycle_total = sum(entries.iter().map(|entry| entry.amount));

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold"
                        {
                            (card.name)

                            @if !card.is_active {
                                " "
                                span class=(BADGE_STYLE) { "Inactive" }
                            }
                        }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            "Closes on day " (card.closing_day) ", due on day " (card.due_day)
                        }
                    }

                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                        a href=(endpoints::CARDS_VIEW) class=(LINK_STYLE) { "All cards" }
                    }
                }

                dl class="grid grid-cols-2 md:grid-cols-4 gap-4"
                {
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Total limit" }
                        dd id="total-limit" class="font-semibold tabular-nums" { (format_currency(card.total_limit)) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Available" }
                        dd id="available-limit" class="font-semibold tabular-nums" { (format_currency(card.available_limit)) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Used" }
                        dd id="used-limit" class="font-semibold tabular-nums" { (format_currency(card.used_limit())) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Usage" }
                        dd id="usage-percent" class="font-semibold tabular-nums" { (format_percent(card.usage_percent())) }
                    }
                }

                div class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "Current statement" }
                    p id="statement-cycle" class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (format_date(cycle.start)) " to " (format_date(cycle.end))
                        ": " (format_currency(cycle_total))
                    }

                    div class="overflow-x-auto dark:bg-gray-800"
                    {
                        table id="statement-entries" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                }
                            }

                            tbody
                            {
                                @for entry in entries {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        td class=(TABLE_CELL_STYLE) { (format_date(entry.date)) }
                                        td class=(TABLE_CELL_STYLE) { (entry.description) }
                                        td class="px-6 py-4 text-right tabular-nums" { (format_currency(entry.amount)) }
                                    }
                                }

                                @if entries.is_empty() {
                                    tr
                                    {
                                        td colspan="3" class="px-6 py-4 text-center"
                                        {
                                            "No purchases in this statement yet."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                button
                    hx-post=(reset_url)
                    hx-confirm="Mark the statement as paid and restore the full limit?"
                    hx-target-error="#alert-container"
                    class="px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded"
                {
                    "Statement paid: restore limit"
                }
            }
        }
    );

    base(&card.name.to_string(), &[], &content)
}
