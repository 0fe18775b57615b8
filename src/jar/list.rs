//! Savings jars listing page.

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
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency, format_percent,
    },
    jar::{SavingsJar, get_all_jars},
    money::sum,
    navigation::NavBar,
};

/// The state needed for the savings jars listing page.
#[derive(Debug, Clone)]
pub struct JarsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for JarsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the savings jars listing page.
pub async fn get_jars_page(State(state): State<JarsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let jars = get_all_jars(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve savings jars: {error}"))?;

    Ok(jars_view(&jars).into_response())
}

/// A progress bar for a jar, capped at full width once the target is reached.
pub(crate) fn progress_bar(jar: &SavingsJar) -> Markup {
    let width = jar.progress_percent().min(Decimal::ONE_HUNDRED).round_dp(0);

    html! {
        div class="flex items-center gap-2"
        {
            div class="w-24 h-2 rounded bg-gray-200 dark:bg-gray-700"
            {
                div class="h-2 rounded bg-green-500" style=(format!("width: {width}%")) {}
            }
            span class="tabular-nums" { (format_percent(jar.progress_percent())) }
        }
    }
}

fn jars_view(jars: &[SavingsJar]) -> Markup {
    let nav_bar = NavBar::new(endpoints::JARS_VIEW).into_html();
    let total_saved = sum(jars.iter().map(|jar| jar.balance));

    let table_row = |jar: &SavingsJar| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_JAR_VIEW, jar.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_JAR, jar.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its transfers will be kept as entries.",
            jar.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (jar.name) }
                td class=(TABLE_CELL_STYLE) { (jar.purpose) }
                td class="px-6 py-4 text-right tabular-nums" { (format_currency(jar.balance)) }
                td class="px-6 py-4 text-right tabular-nums"
                {
                    @if jar.target.is_zero() {
                        "-"
                    } @else {
                        (format_currency(jar.target))
                    }
                }
                td class=(TABLE_CELL_STYLE) { (progress_bar(jar)) }
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
                        h1 class="text-xl font-bold" { "Savings Jars" }
                        p id="total-saved" class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            "Total saved: " (format_currency(total_saved))
                        }
                    }

                    div class="flex gap-4"
                    {
                        a href=(endpoints::JAR_TRANSFER_VIEW) class=(LINK_STYLE) { "Transfer to Jar" }
                        a href=(endpoints::NEW_JAR_VIEW) class=(LINK_STYLE) { "Create Jar" }
                    }
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Purpose" }
                                th scope="col" class="px-6 py-4 text-right" { "Balance" }
                                th scope="col" class="px-6 py-4 text-right" { "Target" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Progress" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for jar in jars {
                                (table_row(jar))
                            }

                            @if jars.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No savings jars yet. "
                                        a href=(endpoints::NEW_JAR_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create your first jar"
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

    base("Savings Jars", &[], &content)
}
