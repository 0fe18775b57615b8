//! The income statement (DRE) for a date range.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    Error,
    category::get_all_categories,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, base, format_currency},
    navigation::NavBar,
    report::{
        ReportQuery, ReportState, ReportWindow,
        aggregation::{IncomeStatement, income_statement},
        filter::{filter_form, load_window_entries},
    },
};

/// Render the income statement.
///
/// Without `start` and `end` the statement covers the current accounting period.
/// The payment method filter does not apply to the statement.
pub async fn get_dre_report_page(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let window = ReportQuery {
        payment_method: None,
        ..query
    }
    .window(state.current_period()?);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = load_window_entries(&window, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve entries: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let statement = income_statement(&entries, &categories);

    Ok(dre_view(&window, &statement).into_response())
}

enum Row {
    Line(&'static str, &'static str, Decimal),
    Subtotal(&'static str, &'static str, Decimal),
}

fn statement_rows(statement: &IncomeStatement) -> [Row; 9] {
    [
        Row::Line("revenue", "Revenue", statement.revenue),
        Row::Line("cost-of-sales", "(−) Cost of sales", -statement.cost_of_sales),
        Row::Subtotal("gross-margin", "Gross margin", statement.gross_margin()),
        Row::Line(
            "operating-expenses",
            "(−) Operating expenses",
            -statement.operating_expenses,
        ),
        Row::Line(
            "administrative-expenses",
            "(−) Administrative expenses",
            -statement.administrative_expenses,
        ),
        Row::Subtotal("ebitda", "EBITDA", statement.ebitda()),
        Row::Line(
            "financial-expenses",
            "(−) Financial expenses",
            -statement.financial_expenses,
        ),
        Row::Line(
            "unclassified-expenses",
            "(−) Unclassified expenses",
            -statement.unclassified_expenses,
        ),
        Row::Subtotal("net-result", "Net result", statement.net_result()),
    ]
}

fn dre_view(window: &ReportWindow, statement: &IncomeStatement) -> Markup {
    let nav_bar = NavBar::new(endpoints::DRE_REPORT_VIEW).into_html();
    let amount_style = |amount: Decimal| {
        if amount < Decimal::ZERO {
            "px-6 py-4 text-right tabular-nums text-red-600 dark:text-red-400"
        } else {
            "px-6 py-4 text-right tabular-nums"
        }
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-3xl"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Income Statement (DRE)" }
                    p id="report-window" class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (window.describe())
                    }
                }

                (filter_form(endpoints::DRE_REPORT_VIEW, window, false))

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table id="income-statement" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        tbody
                        {
                            @for row in statement_rows(statement) {
                                @match row {
                                    Row::Line(id, label, amount) => {
                                        tr class=(TABLE_ROW_STYLE)
                                        {
                                            td class=(TABLE_CELL_STYLE) { (label) }
                                            td id=(id) class=(amount_style(amount)) { (format_currency(amount)) }
                                        }
                                    }
                                    Row::Subtotal(id, label, amount) => {
                                        tr class="bg-gray-50 border-b font-semibold text-gray-900 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                                        {
                                            td class=(TABLE_CELL_STYLE) { (label) }
                                            td id=(id) class=(amount_style(amount)) { (format_currency(amount)) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Entries are reported under the statement line of their category or its parent. "
                    "Transfers into savings jars are left out."
                }
            }
        }
    );

    base("Income Statement", &[], &content)
}

#[cfg(test)]
mod dre_report_tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Query;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        category::{NewCategory, StatementLine, create_category},
        entry::{EntryKind, NewEntry, create_entry},
        name::Name,
        period::CutoffDay,
        report::{ReportQuery, ReportState, get_dre_report_page},
        test_utils::{assert_valid_html, get_test_connection_mutex, must_get_text, parse_html_document},
    };

    #[tokio::test]
    async fn shows_statement_lines_and_results() {
        let state = ReportState {
            db_connection: get_test_connection_mutex(),
            local_timezone: "America/Sao_Paulo".to_owned(),
            cutoff_day: CutoffDay::default(),
        };
        {
            let connection = state.db_connection.lock().unwrap();
            let category = |name: &str, line: StatementLine| {
                create_category(
                    NewCategory {
                        name: Name::new_unchecked(name),
                        description: String::new(),
                        parent_id: None,
                        statement_line: Some(line),
                    },
                    &connection,
                )
                .unwrap()
                .id
            };
            let sales = category("Sales", StatementLine::Revenue);
            let ingredients = category("Ingredients", StatementLine::CostOfSales);
            let bank = category("Bank fees", StatementLine::FinancialExpense);

            for (description, kind, amount, category_id) in [
                ("Weekend sales", EntryKind::Inflow, dec!(1000), Some(sales)),
                ("Flour", EntryKind::Outflow, dec!(300), Some(ingredients)),
                ("Card fee", EntryKind::Outflow, dec!(20), Some(bank)),
                ("Stickers", EntryKind::Outflow, dec!(5), None),
            ] {
                create_entry(
                    &NewEntry {
                        category_id,
                        ..NewEntry::new(description, kind, amount, date!(2024 - 09 - 05))
                    },
                    &connection,
                )
                .unwrap();
            }
        }
        let query = ReportQuery {
            start: Some(date!(2024 - 09 - 01)),
            end: Some(date!(2024 - 09 - 30)),
            payment_method: None,
        };

        let response = get_dre_report_page(State(state), Query(query))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(must_get_text(&html, "#revenue"), "R$1,000.00");
        assert_eq!(must_get_text(&html, "#cost-of-sales"), "-R$300.00");
        assert_eq!(must_get_text(&html, "#gross-margin"), "R$700.00");
        assert_eq!(must_get_text(&html, "#ebitda"), "R$700.00");
        assert_eq!(must_get_text(&html, "#unclassified-expenses"), "-R$5.00");
        assert_eq!(must_get_text(&html, "#net-result"), "R$675.00");
    }
}
