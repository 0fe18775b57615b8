//! The home page: all-time totals, the current accounting period, recent
//! entries and savings jars at a glance.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    AppState, Error, endpoints,
    entry::{EntryKind, LedgerEntry, get_all_entries, get_recent_entries},
    html::{
        CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, format_date,
    },
    jar::{SavingsJar, get_all_jars, progress_bar},
    navigation::NavBar,
    period::{AccountingPeriod, CutoffDay, resolve_period},
    report::{MethodSummary, Totals, payment_method_summary, totals},
    timezone::local_today,
};

/// How many of the latest entries the home page lists.
const RECENT_ENTRY_COUNT: u32 = 5;

/// The state needed for the home page.
#[derive(Debug, Clone)]
pub struct HomeState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
    pub cutoff_day: CutoffDay,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            cutoff_day: state.cutoff_day,
        }
    }
}

struct HomeData {
    period: AccountingPeriod,
    totals: Totals,
    recent_entries: Vec<LedgerEntry>,
    jars: Vec<SavingsJar>,
    methods: Vec<MethodSummary>,
}

/// Display the home page.
pub async fn get_home_page(State(state): State<HomeState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_all_entries(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve entries: {error}"))?;
    let recent_entries = get_recent_entries(RECENT_ENTRY_COUNT, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve recent entries: {error}"))?;
    let jars = get_all_jars(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve savings jars: {error}"))?;

    let data = HomeData {
        period: resolve_period(today, state.cutoff_day),
        totals: totals(&entries),
        recent_entries,
        jars,
        methods: payment_method_summary(&entries),
    };

    Ok(home_view(&data).into_response())
}

fn total_card(id: &str, label: &str, amount: Decimal) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p id=(id) class="text-lg font-semibold tabular-nums" { (format_currency(amount)) }
        }
    }
}

fn recent_entries_table(entries: &[LedgerEntry]) -> Markup {
    html! {
        table id="recent-entries" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
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
                        td class="px-6 py-4 text-right tabular-nums"
                        {
                            @match entry.kind {
                                EntryKind::Inflow => { (format_currency(entry.amount)) }
                                EntryKind::Outflow => { (format_currency(-entry.amount)) }
                            }
                        }
                    }
                }

                @if entries.is_empty() {
                    tr
                    {
                        td colspan="3" class="px-6 py-4 text-center"
                        {
                            "Nothing recorded yet. "
                            a href=(endpoints::NEW_ENTRY_VIEW) class=(LINK_STYLE) { "Record an entry" }
                        }
                    }
                }
            }
        }
    }
}

fn home_view(data: &HomeData) -> Markup {
    let nav_bar = NavBar::new(endpoints::HOME_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Home" }
                    p id="current-period" class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Current period: "
                        (format_date(data.period.start)) " to " (format_date(data.period.end))
                    }
                }

                div class="grid grid-cols-2 md:grid-cols-4 gap-4"
                {
                    (total_card("total-inflows", "Inflows", data.totals.inflows))
                    (total_card("total-outflows", "Outflows", data.totals.outflows))
                    (total_card("card-outflows", "Card spend", data.totals.card_outflows))
                    (total_card("cash-balance", "Cash balance", data.totals.cash_balance()))
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    div class="flex justify-between items-end mb-2"
                    {
                        h2 class="text-lg font-semibold" { "Recent entries" }
                        a href=(endpoints::ENTRIES_VIEW) class=(LINK_STYLE) { "See all" }
                    }

                    (recent_entries_table(&data.recent_entries))
                }

                div class="grid grid-cols-1 lg:grid-cols-2 gap-6"
                {
                    div
                    {
                        div class="flex justify-between items-end mb-2"
                        {
                            h2 class="text-lg font-semibold" { "Savings jars" }
                            a href=(endpoints::JARS_VIEW) class=(LINK_STYLE) { "Manage" }
                        }

                        ul id="jars" class="space-y-2"
                        {
                            @for jar in &data.jars {
                                li class=(CARD_STYLE)
                                {
                                    div class="flex justify-between"
                                    {
                                        span { (jar.name) }
                                        span class="tabular-nums" { (format_currency(jar.balance)) }
                                    }
                                    (progress_bar(jar))
                                }
                            }

                            @if data.jars.is_empty() {
                                li class="text-gray-500 dark:text-gray-400" { "No savings jars yet." }
                            }
                        }
                    }

                    div
                    {
                        h2 class="text-lg font-semibold mb-2" { "By payment method" }

                        table id="method-summary" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Method" }
                                    th scope="col" class="px-6 py-4 text-right" { "Inflows" }
                                    th scope="col" class="px-6 py-4 text-right" { "Outflows" }
                                }
                            }

                            tbody
                            {
                                @for summary in &data.methods {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        td class=(TABLE_CELL_STYLE) { (summary.label()) }
                                        td class="px-6 py-4 text-right tabular-nums" { (format_currency(summary.inflows)) }
                                        td class="px-6 py-4 text-right tabular-nums" { (format_currency(summary.outflows)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Home", &[], &content)
}
