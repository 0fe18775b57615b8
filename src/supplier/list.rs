//! Suppliers listing page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    AppState, Error,
    database_id::SupplierId,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    money::decimal_column,
    navigation::NavBar,
    supplier::{Supplier, get_all_suppliers},
};

/// The state needed for the suppliers listing page.
#[derive(Debug, Clone)]
pub struct SuppliersPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SuppliersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the suppliers listing page with the total spent at each supplier.
pub async fn get_suppliers_page(
    State(state): State<SuppliersPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let suppliers = get_all_suppliers(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve suppliers: {error}"))?;

    let spent = total_spent_per_supplier(&connection)
        .inspect_err(|error| tracing::error!("Could not total outflows per supplier: {error}"))?;

    Ok(suppliers_view(&suppliers, &spent).into_response())
}

fn total_spent_per_supplier(
    connection: &Connection,
) -> Result<HashMap<SupplierId, Decimal>, Error> {
    let mut totals = HashMap::new();

    let rows = connection
        .prepare(
            "SELECT supplier_id, amount FROM ledger_entry
             WHERE kind = 'outflow' AND supplier_id IS NOT NULL",
        )?
        .query_map([], |row| Ok((row.get::<_, SupplierId>(0)?, decimal_column(row, 1)?)))?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    for (supplier_id, amount) in rows {
        *totals.entry(supplier_id).or_insert(Decimal::ZERO) += amount;
    }

    Ok(totals)
}

fn suppliers_view(suppliers: &[Supplier], spent: &HashMap<SupplierId, Decimal>) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUPPLIERS_VIEW).into_html();

    let table_row = |supplier: &Supplier| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_SUPPLIER_VIEW, supplier.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_SUPPLIER, supplier.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its entries will be kept without a supplier.",
            supplier.name
        );
        let total = spent.get(&supplier.id).copied().unwrap_or_default();

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (supplier.name) }
                td class="px-6 py-4 tabular-nums"
                {
                    @match &supplier.tax_id {
                        Some(tax_id) => { (tax_id) }
                        None => { "-" }
                    }
                }
                td class=(TABLE_CELL_STYLE) { (supplier.contact) }
                td class="px-6 py-4 text-right tabular-nums" { (format_currency(total)) }
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
                    h1 class="text-xl font-bold" { "Suppliers" }

                    a href=(endpoints::NEW_SUPPLIER_VIEW) class=(LINK_STYLE)
                    {
                        "Register Supplier"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Tax ID" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Contact" }
                                th scope="col" class="px-6 py-4 text-right" { "Total spent" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for supplier in suppliers {
                                (table_row(supplier))
                            }

                            @if suppliers.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No suppliers registered yet. "
                                        a href=(endpoints::NEW_SUPPLIER_VIEW) class=(LINK_STYLE)
                                        {
                                            "Register your first supplier"
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

    base("Suppliers", &[], &content)
}
