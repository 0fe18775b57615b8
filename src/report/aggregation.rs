//! Pure aggregations over the ledger entries of a reporting window.
//!
//! Every function here takes the entries that have already been filtered to
//! the window, so they can be tested without a database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, Duration};

use crate::{
    category::{Category, StatementLine, effective_statement_line},
    database_id::{CategoryId, SupplierId},
    entry::{EntryKind, LedgerEntry, PaymentMethod},
    html::format_date,
    money::sum,
    supplier::Supplier,
};

/// The money that came in and went out during a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub inflows: Decimal,
    /// Every outflow, including those paid by credit card.
    pub outflows: Decimal,
    /// Outflows that left the cash balance, i.e. not paid by credit card.
    pub cash_outflows: Decimal,
    /// Outflows paid by credit card, which will be settled with the card's statement.
    pub card_outflows: Decimal,
}

impl Totals {
    /// Inflows minus cash outflows.
    pub fn cash_balance(&self) -> Decimal {
        self.inflows - self.cash_outflows
    }
}

pub fn totals(entries: &[LedgerEntry]) -> Totals {
    let amounts_where = |predicate: fn(&LedgerEntry) -> bool| {
        sum(entries
            .iter()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.amount))
    };

    Totals {
        inflows: amounts_where(|entry| entry.kind == EntryKind::Inflow),
        outflows: amounts_where(|entry| entry.kind == EntryKind::Outflow),
        cash_outflows: amounts_where(LedgerEntry::is_cash_outflow),
        card_outflows: amounts_where(LedgerEntry::is_card_outflow),
    }
}

/// Inflows minus the outflows that were not paid by credit card.
pub fn cash_balance(entries: &[LedgerEntry]) -> Decimal {
    totals(entries).cash_balance()
}

/// The total spent at one supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierSpend {
    pub supplier_id: SupplierId,
    pub name: String,
    pub total: Decimal,
}

/// Outflows per supplier, largest first. Entries without a supplier are left out.
pub fn supplier_breakdown(entries: &[LedgerEntry], suppliers: &[Supplier]) -> Vec<SupplierSpend> {
    let mut totals: HashMap<SupplierId, Decimal> = HashMap::new();

    for entry in entries.iter().filter(|entry| entry.kind == EntryKind::Outflow) {
        if let Some(supplier_id) = entry.supplier_id {
            *totals.entry(supplier_id).or_default() += entry.amount;
        }
    }

    let mut breakdown: Vec<SupplierSpend> = totals
        .into_iter()
        .map(|(supplier_id, total)| SupplierSpend {
            supplier_id,
            name: suppliers
                .iter()
                .find(|supplier| supplier.id == supplier_id)
                .map(|supplier| supplier.name.to_string())
                .unwrap_or_else(|| format!("Supplier #{supplier_id}")),
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    breakdown
}

/// The outflows of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    /// `None` for entries without a category.
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub total: Decimal,
}

/// Outflows per category, largest first.
pub fn category_breakdown(entries: &[LedgerEntry], categories: &[Category]) -> Vec<CategorySpend> {
    let mut totals: HashMap<Option<CategoryId>, Decimal> = HashMap::new();

    for entry in entries.iter().filter(|entry| entry.kind == EntryKind::Outflow) {
        *totals.entry(entry.category_id).or_default() += entry.amount;
    }

    let mut breakdown: Vec<CategorySpend> = totals
        .into_iter()
        .map(|(category_id, total)| {
            let name = match category_id {
                Some(category_id) => categories
                    .iter()
                    .find(|category| category.id == category_id)
                    .map(|category| category.name.to_string())
                    .unwrap_or_else(|| format!("Category #{category_id}")),
                None => "Uncategorized".to_owned(),
            };

            CategorySpend {
                category_id,
                name,
                total,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    breakdown
}

/// Inflows and outflows for one payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSummary {
    /// `None` for entries recorded without a payment method, e.g. jar transfers.
    pub payment_method: Option<PaymentMethod>,
    pub inflows: Decimal,
    pub outflows: Decimal,
}

impl MethodSummary {
    pub fn label(&self) -> &'static str {
        self.payment_method
            .map_or("Not specified", PaymentMethod::label)
    }
}

/// Inflows and outflows per payment method, in the order of
/// [PaymentMethod::ALL] with entries without a method last. Methods without
/// entries are left out.
pub fn payment_method_summary(entries: &[LedgerEntry]) -> Vec<MethodSummary> {
    let mut summaries: Vec<MethodSummary> = Vec::new();

    for entry in entries {
        let index = match summaries
            .iter()
            .position(|summary| summary.payment_method == entry.payment_method)
        {
            Some(index) => index,
            None => {
                summaries.push(MethodSummary {
                    payment_method: entry.payment_method,
                    inflows: Decimal::ZERO,
                    outflows: Decimal::ZERO,
                });
                summaries.len() - 1
            }
        };

        match entry.kind {
            EntryKind::Inflow => summaries[index].inflows += entry.amount,
            EntryKind::Outflow => summaries[index].outflows += entry.amount,
        }
    }

    summaries.sort_by_key(|summary| (summary.payment_method.is_none(), summary.payment_method));

    summaries
}

/// The entries of one ISO week, Monday to Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyBucket {
    /// The Monday the week starts on.
    pub week_start: Date,
    pub inflows: Decimal,
    pub outflows: Decimal,
}

impl WeeklyBucket {
    /// The Sunday the week ends on.
    pub fn week_end(&self) -> Date {
        self.week_start + Duration::days(6)
    }

    /// Inflows minus outflows.
    pub fn balance(&self) -> Decimal {
        self.inflows - self.outflows
    }

    /// The week as "dd/mm – dd/mm".
    pub fn label(&self) -> String {
        format!(
            "{} – {}",
            day_and_month(self.week_start),
            day_and_month(self.week_end())
        )
    }
}

fn day_and_month(date: Date) -> String {
    format_date(date)[..5].to_owned()
}

/// The Monday of the week that `date` falls in.
pub fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Inflows and outflows per week, oldest week first.
///
/// Weeks are only produced when the window has both a start and an end.
/// Weeks without entries are left out.
pub fn weekly_buckets(
    entries: &[LedgerEntry],
    start: Option<Date>,
    end: Option<Date>,
) -> Vec<WeeklyBucket> {
    if start.is_none() || end.is_none() {
        return Vec::new();
    }

    let mut buckets: HashMap<Date, WeeklyBucket> = HashMap::new();

    for entry in entries {
        let monday = week_start(entry.date);
        let bucket = buckets.entry(monday).or_insert_with(|| WeeklyBucket {
            week_start: monday,
            inflows: Decimal::ZERO,
            outflows: Decimal::ZERO,
        });

        match entry.kind {
            EntryKind::Inflow => bucket.inflows += entry.amount,
            EntryKind::Outflow => bucket.outflows += entry.amount,
        }
    }

    let mut buckets: Vec<WeeklyBucket> = buckets.into_values().collect();
    buckets.sort_by_key(|bucket| bucket.week_start);

    buckets
}

/// A category-grouped income statement (DRE).
///
/// Expense lines hold positive amounts that are subtracted from revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncomeStatement {
    pub revenue: Decimal,
    pub cost_of_sales: Decimal,
    pub operating_expenses: Decimal,
    pub administrative_expenses: Decimal,
    pub financial_expenses: Decimal,
    /// Outflows whose category has no statement line, or no category at all.
    pub unclassified_expenses: Decimal,
}

impl IncomeStatement {
    /// Revenue minus cost of sales.
    pub fn gross_margin(&self) -> Decimal {
        self.revenue - self.cost_of_sales
    }

    /// Gross margin minus operating and administrative expenses.
    pub fn ebitda(&self) -> Decimal {
        self.gross_margin() - self.operating_expenses - self.administrative_expenses
    }

    /// EBITDA minus financial and unclassified expenses.
    pub fn net_result(&self) -> Decimal {
        self.ebitda() - self.financial_expenses - self.unclassified_expenses
    }

    fn line_mut(&mut self, line: StatementLine) -> &mut Decimal {
        match line {
            StatementLine::Revenue => &mut self.revenue,
            StatementLine::CostOfSales => &mut self.cost_of_sales,
            StatementLine::OperatingExpense => &mut self.operating_expenses,
            StatementLine::AdministrativeExpense => &mut self.administrative_expenses,
            StatementLine::FinancialExpense => &mut self.financial_expenses,
        }
    }
}

/// Build the income statement for `entries`.
///
/// Each entry is reported under the statement line of its category, or of the
/// category's parent. An outflow on the revenue line reduces revenue and an
/// inflow on an expense line reduces that expense, e.g. a refund. Entries
/// without a line count as revenue if they are inflows and as unclassified
/// expenses if they are outflows. Transfers into savings jars move money
/// within the organization and are left out.
pub fn income_statement(entries: &[LedgerEntry], categories: &[Category]) -> IncomeStatement {
    let mut statement = IncomeStatement::default();

    for entry in entries
        .iter()
        .filter(|entry| !entry.is_transfer)
    {
        let line = entry
            .category_id
            .and_then(|category_id| categories.iter().find(|category| category.id == category_id))
            .and_then(|category| effective_statement_line(category, categories));

        match (line, entry.kind) {
            (Some(StatementLine::Revenue), EntryKind::Inflow) | (None, EntryKind::Inflow) => {
                statement.revenue += entry.amount
            }
            (Some(StatementLine::Revenue), EntryKind::Outflow) => statement.revenue -= entry.amount,
            (Some(line), EntryKind::Outflow) => *statement.line_mut(line) += entry.amount,
            (Some(line), EntryKind::Inflow) => *statement.line_mut(line) -= entry.amount,
            (None, EntryKind::Outflow) => statement.unclassified_expenses += entry.amount,
        }
    }

    statement
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, macros::date};

    use crate::{
        category::{Category, StatementLine},
        entry::{EntryKind, LedgerEntry, PaymentMethod},
        money::MAX_AMOUNT,
        name::Name,
        supplier::Supplier,
    };

    use super::{
        IncomeStatement, cash_balance, category_breakdown, income_statement,
        payment_method_summary, supplier_breakdown, totals, week_start, weekly_buckets,
    };

    fn entry(kind: EntryKind, amount: Decimal, payment_method: Option<PaymentMethod>) -> LedgerEntry {
        LedgerEntry {
            id: 0,
            description: "Entry".to_owned(),
            kind,
            amount,
            date: date!(2024 - 09 - 12),
            category_id: None,
            supplier_id: None,
            payment_method,
            destination_jar_id: None,
            card_id: payment_method
                .filter(|method| *method == PaymentMethod::CreditCard)
                .map(|_| 1),
            notes: String::new(),
            is_transfer: false,
        }
    }

    fn dated(date: Date, kind: EntryKind, amount: Decimal) -> LedgerEntry {
        LedgerEntry {
            date,
            ..entry(kind, amount, Some(PaymentMethod::Cash))
        }
    }

    fn category(id: i64, parent_id: Option<i64>, line: Option<StatementLine>) -> Category {
        Category {
            id,
            name: Name::new_unchecked(&format!("Category {id}")),
            description: String::new(),
            parent_id,
            statement_line: line,
        }
    }

    #[test]
    fn cash_balance_excludes_card_outflows() {
        let entries = [
            entry(EntryKind::Inflow, dec!(100), Some(PaymentMethod::Cash)),
            entry(EntryKind::Outflow, dec!(30), Some(PaymentMethod::Cash)),
            entry(EntryKind::Outflow, dec!(50), Some(PaymentMethod::CreditCard)),
        ];

        let got = totals(&entries);

        assert_eq!(cash_balance(&entries), dec!(70));
        assert_eq!(got.outflows, dec!(80));
        assert_eq!(got.cash_outflows, dec!(30));
        assert_eq!(got.card_outflows, dec!(50));
    }

    #[test]
    fn totals_of_many_largest_amounts_do_not_overflow() {
        let entries = vec![entry(EntryKind::Inflow, MAX_AMOUNT, Some(PaymentMethod::Cash)); 10_000];

        let got = totals(&entries);

        assert_eq!(got.inflows, MAX_AMOUNT * dec!(10000));
        assert_eq!(payment_method_summary(&entries)[0].inflows, got.inflows);
    }

    #[test]
    fn totals_of_no_entries_are_zero() {
        assert_eq!(cash_balance(&[]), dec!(0));
        assert_eq!(totals(&[]).inflows, dec!(0));
    }

    #[test]
    fn supplier_breakdown_is_largest_first() {
        let suppliers = [1, 2].map(|id| Supplier {
            id,
            name: Name::new_unchecked(&format!("Supplier {id}")),
            tax_id: None,
            contact: String::new(),
        });
        let with_supplier = |supplier_id: Option<i64>, kind, amount| LedgerEntry {
            supplier_id,
            ..entry(kind, amount, Some(PaymentMethod::Cash))
        };
        let entries = [
            with_supplier(Some(1), EntryKind::Outflow, dec!(10)),
            with_supplier(Some(2), EntryKind::Outflow, dec!(25)),
            with_supplier(Some(1), EntryKind::Outflow, dec!(5)),
            with_supplier(Some(1), EntryKind::Inflow, dec!(100)),
            with_supplier(None, EntryKind::Outflow, dec!(1000)),
        ];

        let got = supplier_breakdown(&entries, &suppliers);

        let got: Vec<_> = got.iter().map(|spend| (spend.name.as_str(), spend.total)).collect();
        assert_eq!(got, [("Supplier 2", dec!(25)), ("Supplier 1", dec!(15))]);
    }

    #[test]
    fn category_breakdown_groups_uncategorized() {
        let categories = [category(1, None, None)];
        let entries = [
            LedgerEntry {
                category_id: Some(1),
                ..entry(EntryKind::Outflow, dec!(10), None)
            },
            entry(EntryKind::Outflow, dec!(40), None),
            entry(EntryKind::Outflow, dec!(2), None),
        ];

        let got = category_breakdown(&entries, &categories);

        let got: Vec<_> = got.iter().map(|spend| (spend.name.as_str(), spend.total)).collect();
        assert_eq!(got, [("Uncategorized", dec!(42)), ("Category 1", dec!(10))]);
    }

    #[test]
    fn payment_methods_follow_declaration_order_with_none_last() {
        let entries = [
            entry(EntryKind::Outflow, dec!(5), None),
            entry(EntryKind::Outflow, dec!(20), Some(PaymentMethod::Tab)),
            entry(EntryKind::Inflow, dec!(100), Some(PaymentMethod::Cash)),
            entry(EntryKind::Outflow, dec!(8), Some(PaymentMethod::Cash)),
        ];

        let got = payment_method_summary(&entries);

        let got: Vec<_> = got
            .iter()
            .map(|summary| (summary.label(), summary.inflows, summary.outflows))
            .collect();
        assert_eq!(
            got,
            [
                ("Cash", dec!(100), dec!(8)),
                ("Tab", dec!(0), dec!(20)),
                ("Not specified", dec!(0), dec!(5)),
            ]
        );
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-09-12 is a Thursday.
        assert_eq!(week_start(date!(2024 - 09 - 12)), date!(2024 - 09 - 09));
        assert_eq!(week_start(date!(2024 - 09 - 09)), date!(2024 - 09 - 09));
        assert_eq!(week_start(date!(2024 - 09 - 15)), date!(2024 - 09 - 09));
    }

    #[test]
    fn weekly_buckets_are_ordered_and_labelled() {
        let entries = [
            dated(date!(2024 - 09 - 17), EntryKind::Outflow, dec!(30)),
            dated(date!(2024 - 09 - 12), EntryKind::Inflow, dec!(100)),
            dated(date!(2024 - 09 - 15), EntryKind::Outflow, dec!(40)),
            dated(date!(2024 - 12 - 31), EntryKind::Inflow, dec!(1)),
        ];

        let got = weekly_buckets(
            &entries,
            Some(date!(2024 - 09 - 01)),
            Some(date!(2024 - 12 - 31)),
        );

        assert_eq!(got.len(), 3);
        assert_eq!(got[0].label(), "09/09 – 15/09");
        assert_eq!(got[0].balance(), dec!(60));
        assert_eq!(got[1].label(), "16/09 – 22/09");
        assert_eq!(got[1].balance(), dec!(-30));
        assert_eq!(got[2].label(), "30/12 – 05/01");
    }

    #[test]
    fn weekly_buckets_need_both_bounds() {
        let entries = [dated(date!(2024 - 09 - 12), EntryKind::Inflow, dec!(100))];

        assert!(weekly_buckets(&entries, Some(date!(2024 - 09 - 01)), None).is_empty());
        assert!(weekly_buckets(&entries, None, Some(date!(2024 - 09 - 30))).is_empty());
    }

    #[test]
    fn income_statement_uses_statement_lines() {
        let categories = [
            category(1, None, Some(StatementLine::Revenue)),
            category(2, None, Some(StatementLine::CostOfSales)),
            category(3, None, Some(StatementLine::OperatingExpense)),
            category(4, None, Some(StatementLine::AdministrativeExpense)),
            category(5, None, Some(StatementLine::FinancialExpense)),
            // Inherits cost of sales from its parent.
            category(6, Some(2), None),
            category(7, None, None),
        ];
        let in_category = |category_id: i64, kind, amount| LedgerEntry {
            category_id: Some(category_id),
            ..entry(kind, amount, Some(PaymentMethod::Cash))
        };
        let entries = [
            in_category(1, EntryKind::Inflow, dec!(1000)),
            in_category(2, EntryKind::Outflow, dec!(200)),
            in_category(6, EntryKind::Outflow, dec!(100)),
            in_category(3, EntryKind::Outflow, dec!(150)),
            in_category(4, EntryKind::Outflow, dec!(120)),
            in_category(5, EntryKind::Outflow, dec!(30)),
            in_category(7, EntryKind::Outflow, dec!(20)),
            in_category(7, EntryKind::Inflow, dec!(50)),
            LedgerEntry {
                destination_jar_id: Some(1),
                is_transfer: true,
                ..entry(EntryKind::Outflow, dec!(500), None)
            },
            LedgerEntry {
                is_transfer: true,
                ..entry(EntryKind::Outflow, dec!(300), None)
            },
        ];

        let got = income_statement(&entries, &categories);

        assert_eq!(
            got,
            IncomeStatement {
                revenue: dec!(1050),
                cost_of_sales: dec!(300),
                operating_expenses: dec!(150),
                administrative_expenses: dec!(120),
                financial_expenses: dec!(30),
                unclassified_expenses: dec!(20),
            }
        );
        assert_eq!(got.gross_margin(), dec!(750));
        assert_eq!(got.ebitda(), dec!(480));
        assert_eq!(got.net_result(), dec!(430));
    }

    #[test]
    fn refund_reduces_expense_line() {
        let categories = [category(1, None, Some(StatementLine::OperatingExpense))];
        let in_category = |kind, amount| LedgerEntry {
            category_id: Some(1),
            ..entry(kind, amount, Some(PaymentMethod::Cash))
        };

        let got = income_statement(
            &[
                in_category(EntryKind::Outflow, dec!(80)),
                in_category(EntryKind::Inflow, dec!(15)),
            ],
            &categories,
        );

        assert_eq!(got.operating_expenses, dec!(65));
        assert_eq!(got.revenue, dec!(0));
    }
}
