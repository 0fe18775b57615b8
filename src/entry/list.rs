//! Entries listing page with totals for the chosen date range.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::get_all_cards,
    category::get_all_categories,
    endpoints,
    entry::{EntryKind, LedgerEntry},
    html::{
        BADGE_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
        format_date,
    },
    navigation::NavBar,
    period::{CutoffDay, resolve_period},
    report::{ReportQuery, ReportWindow, Totals, filter_form, load_window_entries, totals},
    supplier::get_all_suppliers,
    timezone::local_today,
};

/// The state needed for the entries listing page.
#[derive(Debug, Clone)]
pub struct EntriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
    pub cutoff_day: CutoffDay,
}

impl FromRef<AppState> for EntriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            cutoff_day: state.cutoff_day,
        }
    }
}

/// The names shown next to an entry instead of its foreign keys.
#[derive(Default)]
struct Names {
    categories: HashMap<i64, String>,
    suppliers: HashMap<i64, String>,
    cards: HashMap<i64, String>,
}

/// Render the entries in the chosen date range, newest first.
///
/// Without `start` and `end` the current accounting period is shown.
pub async fn get_entries_page(
    State(state): State<EntriesPageState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let window = query.window(resolve_period(today, state.cutoff_day));

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = load_window_entries(&window, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve entries: {error}"))?;

    let names = Names {
        categories: get_all_categories(&connection)?
            .into_iter()
            .map(|category| (category.id, category.name.to_string()))
            .collect(),
        suppliers: get_all_suppliers(&connection)?
            .into_iter()
            .map(|supplier| (supplier.id, supplier.name.to_string()))
            .collect(),
        cards: get_all_cards(&connection)?
            .into_iter()
            .map(|card| (card.id, card.name.to_string()))
            .collect(),
    };

    Ok(entries_view(&window, &entries, &totals(&entries), &names).into_response())
}

fn entries_view(
    window: &ReportWindow,
    entries: &[LedgerEntry],
    totals: &Totals,
    names: &Names,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ENTRIES_VIEW).into_html();

    let table_row = |entry: &LedgerEntry| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_ENTRY_VIEW, entry.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_ENTRY, entry.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Card charges will be given back to the card.",
            entry.description
        );
        let lookup = |names: &HashMap<i64, String>, id: Option<i64>| {
            id.and_then(|id| names.get(&id).cloned()).unwrap_or_default()
        };
        let amount_style = match entry.kind {
            EntryKind::Inflow => "px-6 py-4 text-right tabular-nums text-green-700 dark:text-green-400",
            EntryKind::Outflow => "px-6 py-4 text-right tabular-nums",
        };
        let signed_amount = match entry.kind {
            EntryKind::Inflow => entry.amount,
            EntryKind::Outflow => -entry.amount,
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (format_date(entry.date)) }
                td class=(TABLE_CELL_STYLE)
                {
                    (entry.description)

                    @if entry.is_transfer {
                        " "
                        span class=(BADGE_STYLE) { "Jar transfer" }
                    }
                }
                td class=(amount_style) { (format_currency(signed_amount)) }
                td class=(TABLE_CELL_STYLE) { (lookup(&names.categories, entry.category_id)) }
                td class=(TABLE_CELL_STYLE) { (lookup(&names.suppliers, entry.supplier_id)) }
                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(method) = entry.payment_method {
                        span class=(BADGE_STYLE) { (method.label()) }
                    }

                    @if entry.card_id.is_some() {
                        " " (lookup(&names.cards, entry.card_id))
                    }
                }
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
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Entries" }
                        p id="entries-window" class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (window.describe())
                        }
                    }

                    a href=(endpoints::NEW_ENTRY_VIEW) class=(LINK_STYLE) { "Record Entry" }
                }

                (filter_form(endpoints::ENTRIES_VIEW, window, true))

                dl class="grid grid-cols-2 md:grid-cols-5 gap-4"
                {
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Inflows" }
                        dd id="total-inflows" class="font-semibold tabular-nums" { (format_currency(totals.inflows)) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Outflows" }
                        dd id="total-outflows" class="font-semibold tabular-nums" { (format_currency(totals.outflows)) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Cash outflows" }
                        dd id="cash-outflows" class="font-semibold tabular-nums" { (format_currency(totals.cash_outflows)) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Card spend" }
                        dd id="card-outflows" class="font-semibold tabular-nums" { (format_currency(totals.card_outflows)) }
                    }
                    div class=(CARD_STYLE)
                    {
                        dt class="text-sm text-gray-600 dark:text-gray-400" { "Cash balance" }
                        dd id="cash-balance" class="font-semibold tabular-nums" { (format_currency(totals.cash_balance())) }
                    }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table id="entries" class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Supplier" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for entry in entries {
                                (table_row(entry))
                            }

                            @if entries.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No entries in this range. "
                                        a href=(endpoints::NEW_ENTRY_VIEW) class=(LINK_STYLE)
                                        {
                                            "Record an entry"
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

    base("Entries", &[], &content)
}
