//! The date range and payment method filters shared by the entry list and reports.

use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    entry::{LedgerEntry, PaymentMethod, get_entries_between},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, format_date},
    period::AccountingPeriod,
};

/// The query string of a filtered page, e.g. `?start=2024-08-11&end=2024-09-10`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub payment_method: Option<PaymentMethod>,
}

/// The resolved window a page reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub payment_method: Option<PaymentMethod>,
}

impl ReportQuery {
    /// Resolve the query, falling back to `current_period` when neither date is given.
    pub fn window(self, current_period: AccountingPeriod) -> ReportWindow {
        let (start, end) = match (self.start, self.end) {
            (None, None) => (Some(current_period.start), Some(current_period.end)),
            bounds => bounds,
        };

        ReportWindow {
            start,
            end,
            payment_method: self.payment_method,
        }
    }
}

impl ReportWindow {
    /// A short description such as "11/08/2024 to 10/09/2024" or "since 11/08/2024".
    pub fn describe(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!("{} to {}", format_date(start), format_date(end)),
            (Some(start), None) => format!("Since {}", format_date(start)),
            (None, Some(end)) => format!("Until {}", format_date(end)),
            (None, None) => "All time".to_owned(),
        }
    }
}

/// Load the entries inside `window`, newest first.
pub fn load_window_entries(
    window: &ReportWindow,
    connection: &Connection,
) -> Result<Vec<LedgerEntry>, Error> {
    let entries = get_entries_between(window.start, window.end, connection)?;

    Ok(match window.payment_method {
        Some(method) => entries
            .into_iter()
            .filter(|entry| entry.payment_method == Some(method))
            .collect(),
        None => entries,
    })
}

/// A GET form that reloads `action` with the chosen filters.
pub fn filter_form(action: &str, window: &ReportWindow, show_payment_method: bool) -> Markup {
    html! {
        form
            method="get"
            action=(action)
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start"
                    type="date"
                    name="start"
                    value=[window.start]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end"
                    type="date"
                    name="end"
                    value=[window.end]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if show_payment_method {
                div
                {
                    label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment method" }
                    select id="payment_method" name="payment_method" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "All" }

                        @for method in PaymentMethod::ALL {
                            option
                                value=(method.as_str())
                                selected[Some(method) == window.payment_method]
                            {
                                (method.label())
                            }
                        }
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded"
            {
                "Filter"
            }

            a href=(action) class=(LINK_STYLE) { "Current period" }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        entry::{EntryKind, NewEntry, PaymentMethod, create_entry},
        period::AccountingPeriod,
        test_utils::get_test_connection,
    };

    use super::{ReportQuery, load_window_entries};

    const PERIOD: AccountingPeriod = AccountingPeriod {
        start: date!(2024 - 08 - 11),
        end: date!(2024 - 09 - 10),
    };

    #[test]
    fn empty_query_uses_current_period() {
        let window = ReportQuery::default().window(PERIOD);

        assert_eq!(window.start, Some(PERIOD.start));
        assert_eq!(window.end, Some(PERIOD.end));
        assert_eq!(window.describe(), "11/08/2024 to 10/09/2024");
    }

    #[test]
    fn single_bound_stays_open_ended() {
        let window = ReportQuery {
            start: Some(date!(2024 - 01 - 01)),
            ..Default::default()
        }
        .window(PERIOD);

        assert_eq!(window.end, None);
        assert_eq!(window.describe(), "Since 01/01/2024");
    }

    #[test]
    fn query_parses_empty_fields_as_none() {
        let query: ReportQuery =
            serde_html_form::from_str("start=&end=2024-09-10&payment_method=").unwrap();

        assert_eq!(query.start, None);
        assert_eq!(query.end, Some(date!(2024 - 09 - 10)));
        assert_eq!(query.payment_method, None);
    }

    #[test]
    fn filters_by_payment_method() {
        let connection = get_test_connection();
        for method in [PaymentMethod::Cash, PaymentMethod::Tab, PaymentMethod::Cash] {
            create_entry(
                &NewEntry::new("Sale", EntryKind::Inflow, dec!(10), date!(2024 - 09 - 01))
                    .payment_method(method),
                &connection,
            )
            .unwrap();
        }
        let window = ReportQuery {
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        }
        .window(PERIOD);

        let got = load_window_entries(&window, &connection).unwrap();

        assert_eq!(got.len(), 2);
    }
}
