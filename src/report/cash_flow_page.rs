//! The cash-flow report: totals, breakdowns and weekly flow for a date range.

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
    html::{
        CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    report::{
        ReportQuery, ReportState, ReportWindow,
        aggregation::{
            CategorySpend, MethodSummary, SupplierSpend, Totals, WeeklyBucket, category_breakdown,
            payment_method_summary, supplier_breakdown, totals, weekly_buckets,
        },
        charts::{ECHARTS_SCRIPT, ReportChart, charts_script, charts_view, weekly_cash_flow_chart},
        filter::{filter_form, load_window_entries},
    },
    supplier::get_all_suppliers,
};

struct CashFlowReport {
    window: ReportWindow,
    totals: Totals,
    suppliers: Vec<SupplierSpend>,
    categories: Vec<CategorySpend>,
    methods: Vec<MethodSummary>,
    weeks: Vec<WeeklyBucket>,
}

/// Render the cash-flow report.
///
/// Without `start` and `end` the report covers the current accounting period.
pub async fn get_cash_flow_report_page(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let window = query.window(state.current_period()?);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = load_window_entries(&window, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve entries: {error}"))?;
    let all_suppliers = get_all_suppliers(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve suppliers: {error}"))?;
    let all_categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let report = CashFlowReport {
        window,
        totals: totals(&entries),
        suppliers: supplier_breakdown(&entries, &all_suppliers),
        categories: category_breakdown(&entries, &all_categories),
        methods: payment_method_summary(&entries),
        weeks: weekly_buckets(&entries, window.start, window.end),
    };

    Ok(cash_flow_view(&report).into_response())
}

fn summary_card(id: &str, label: &str, amount: Decimal) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p id=(id) class="text-lg font-semibold tabular-nums" { (format_currency(amount)) }
        }
    }
}

fn amount_table(id: &str, heading: &str, rows: &[(String, Decimal)]) -> Markup {
    html! {
        div class="overflow-x-auto dark:bg-gray-800"
        {
            h2 class="text-lg font-semibold mb-2" { (heading) }

            table id=(id) class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class="px-6 py-4 text-right" { "Spent" }
                    }
                }

                tbody
                {
                    @for (name, total) in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (name) }
                            td class="px-6 py-4 text-right tabular-nums" { (format_currency(*total)) }
                        }
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td colspan="2" class="px-6 py-4 text-center" { "No outflows in this range." }
                        }
                    }
                }
            }
        }
    }
}

fn cash_flow_view(report: &CashFlowReport) -> Markup {
    let nav_bar = NavBar::new(endpoints::CASH_FLOW_REPORT_VIEW).into_html();
    let charts = if report.weeks.is_empty() {
        Vec::new()
    } else {
        vec![ReportChart {
            id: "weekly-cash-flow-chart",
            options: weekly_cash_flow_chart(&report.weeks).to_string(),
        }]
    };
    let supplier_rows: Vec<(String, Decimal)> = report
        .suppliers
        .iter()
        .map(|spend| (spend.name.clone(), spend.total))
        .collect();
    let category_rows: Vec<(String, Decimal)> = report
        .categories
        .iter()
        .map(|spend| (spend.name.clone(), spend.total))
        .collect();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Cash Flow" }
                    p id="report-window" class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (report.window.describe())
                    }
                }

                (filter_form(endpoints::CASH_FLOW_REPORT_VIEW, &report.window, true))

                div class="grid grid-cols-2 md:grid-cols-5 gap-4"
                {
                    (summary_card("total-inflows", "Inflows", report.totals.inflows))
                    (summary_card("total-outflows", "Outflows", report.totals.outflows))
                    (summary_card("cash-outflows", "Cash outflows", report.totals.cash_outflows))
                    (summary_card("card-outflows", "Card spend", report.totals.card_outflows))
                    (summary_card("cash-balance", "Cash balance", report.totals.cash_balance()))
                }

                (charts_view(&charts))

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    h2 class="text-lg font-semibold mb-2" { "Weekly flow" }

                    table id="weekly-flow" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Week" }
                                th scope="col" class="px-6 py-4 text-right" { "Inflows" }
                                th scope="col" class="px-6 py-4 text-right" { "Outflows" }
                                th scope="col" class="px-6 py-4 text-right" { "Balance" }
                            }
                        }

                        tbody
                        {
                            @for week in &report.weeks {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (week.label()) }
                                    td class="px-6 py-4 text-right tabular-nums" { (format_currency(week.inflows)) }
                                    td class="px-6 py-4 text-right tabular-nums" { (format_currency(week.outflows)) }
                                    td class="px-6 py-4 text-right tabular-nums" { (format_currency(week.balance())) }
                                }
                            }

                            @if report.weeks.is_empty() {
                                tr
                                {
                                    td colspan="4" class="px-6 py-4 text-center"
                                    {
                                        "Choose a start and end date to see the weekly flow."
                                    }
                                }
                            }
                        }
                    }
                }

                div class="grid grid-cols-1 lg:grid-cols-2 gap-6"
                {
                    (amount_table("supplier-breakdown", "Spending by supplier", &supplier_rows))
                    (amount_table("category-breakdown", "Spending by category", &category_rows))
                }

                div class="overflow-x-auto dark:bg-gray-800"
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
                            @for summary in &report.methods {
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
    );

    let mut head_elements = Vec::new();
    if !charts.is_empty() {
        head_elements.push(HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()));
        head_elements.push(charts_script(&charts));
    }

    base("Cash Flow", &head_elements, &content)
}

#[cfg(test)]
mod cash_flow_report_tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Query;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        card::{NewCard, create_card},
        entry::{EntryKind, NewEntry, PaymentMethod, apply_entry_create},
        name::Name,
        period::CutoffDay,
        report::{ReportQuery, ReportState, get_cash_flow_report_page},
        supplier::{NewSupplier, create_supplier},
        test_utils::{
            assert_valid_html, count_elements, get_test_connection_mutex, must_get_text,
            parse_html_document,
        },
    };

    fn get_state() -> ReportState {
        ReportState {
            db_connection: get_test_connection_mutex(),
            local_timezone: "America/Sao_Paulo".to_owned(),
            cutoff_day: CutoffDay::default(),
        }
    }

    fn september() -> ReportQuery {
        ReportQuery {
            start: Some(date!(2024 - 09 - 01)),
            end: Some(date!(2024 - 09 - 30)),
            payment_method: None,
        }
    }

    fn seed(state: &ReportState) {
        let mut connection = state.db_connection.lock().unwrap();
        let card = create_card(
            NewCard {
                name: Name::new_unchecked("Company Visa"),
                total_limit: dec!(1000),
                closing_day: 5,
                due_day: 12,
                is_active: true,
                notes: String::new(),
            },
            &connection,
        )
        .unwrap();
        let supplier = create_supplier(
            NewSupplier {
                name: Name::new_unchecked("Flour Mill"),
                tax_id: None,
                contact: String::new(),
            },
            &connection,
        )
        .unwrap();

        let entries = [
            NewEntry::new("Sales", EntryKind::Inflow, dec!(100), date!(2024 - 09 - 02))
                .payment_method(PaymentMethod::Cash),
            NewEntry {
                supplier_id: Some(supplier.id),
                ..NewEntry::new("Flour", EntryKind::Outflow, dec!(30), date!(2024 - 09 - 03))
                    .payment_method(PaymentMethod::Cash)
            },
            NewEntry::new("Oven parts", EntryKind::Outflow, dec!(50), date!(2024 - 09 - 10))
                .card(card.id),
            NewEntry::new("Old sale", EntryKind::Inflow, dec!(999), date!(2024 - 08 - 20)),
        ];
        for entry in &entries {
            apply_entry_create(entry, &mut connection).unwrap();
        }
    }

    #[tokio::test]
    async fn shows_totals_for_range() {
        let state = get_state();
        seed(&state);

        let response = get_cash_flow_report_page(State(state), Query(september()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(must_get_text(&html, "#report-window"), "01/09/2024 to 30/09/2024");
        assert_eq!(must_get_text(&html, "#total-inflows"), "R$100.00");
        assert_eq!(must_get_text(&html, "#total-outflows"), "R$80.00");
        assert_eq!(must_get_text(&html, "#cash-outflows"), "R$30.00");
        assert_eq!(must_get_text(&html, "#card-outflows"), "R$50.00");
        assert_eq!(must_get_text(&html, "#cash-balance"), "R$70.00");
    }

    #[tokio::test]
    async fn shows_breakdowns_and_weekly_chart() {
        let state = get_state();
        seed(&state);

        let response = get_cash_flow_report_page(State(state), Query(september()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(count_elements(&html, "#weekly-flow tbody tr"), 2);
        assert_eq!(count_elements(&html, "#supplier-breakdown tbody tr"), 1);
        assert_eq!(must_get_text(&html, "#supplier-breakdown td"), "Flour Mill");
        assert_eq!(count_elements(&html, "#weekly-cash-flow-chart"), 1);
    }

    #[tokio::test]
    async fn filters_by_payment_method() {
        let state = get_state();
        seed(&state);
        let query = ReportQuery {
            payment_method: Some(PaymentMethod::CreditCard),
            ..september()
        };

        let response = get_cash_flow_report_page(State(state), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(must_get_text(&html, "#total-inflows"), "R$0.00");
        assert_eq!(must_get_text(&html, "#card-outflows"), "R$50.00");
    }

    #[tokio::test]
    async fn open_ended_range_has_no_weekly_chart() {
        let state = get_state();
        seed(&state);
        let query = ReportQuery {
            start: Some(date!(2024 - 01 - 01)),
            end: None,
            payment_method: None,
        };

        let response = get_cash_flow_report_page(State(state), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(must_get_text(&html, "#total-inflows"), "R$1,099.00");
        assert_eq!(count_elements(&html, "#weekly-cash-flow-chart"), 0);
    }
}
