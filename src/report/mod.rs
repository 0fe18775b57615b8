//! Cash-flow and income statement (DRE) reports over a date range.

mod aggregation;
mod cash_flow_page;
mod charts;
mod dre_page;
mod filter;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    period::{AccountingPeriod, CutoffDay, resolve_period},
    timezone::local_today,
};

pub use aggregation::{MethodSummary, Totals, cash_balance, payment_method_summary, totals};
pub use cash_flow_page::get_cash_flow_report_page;
pub use dre_page::get_dre_report_page;
pub use filter::{ReportQuery, ReportWindow, filter_form, load_window_entries};

/// The state needed for the report pages.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
    pub cutoff_day: CutoffDay,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            cutoff_day: state.cutoff_day,
        }
    }
}

impl ReportState {
    /// The accounting period that today falls in.
    pub fn current_period(&self) -> Result<AccountingPeriod, Error> {
        let today = local_today(&self.local_timezone)?;

        Ok(resolve_period(today, self.cutoff_day))
    }
}
