//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId, name::Name};

/// The line of the income statement (DRE) that a category's entries are reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum StatementLine {
    /// Sales and other operating income.
    Revenue,
    /// The direct cost of what was sold, e.g. ingredients.
    CostOfSales,
    /// Day to day running costs, e.g. electricity and gas.
    OperatingExpense,
    /// Wages, accounting and other administrative costs.
    AdministrativeExpense,
    /// Bank fees, interest and card fees.
    FinancialExpense,
}

impl StatementLine {
    /// Every statement line in the order they appear on the income statement.
    pub const ALL: [StatementLine; 5] = [
        StatementLine::Revenue,
        StatementLine::CostOfSales,
        StatementLine::OperatingExpense,
        StatementLine::AdministrativeExpense,
        StatementLine::FinancialExpense,
    ];

    /// The value stored in the database and sent in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            StatementLine::Revenue => "revenue",
            StatementLine::CostOfSales => "cost-of-sales",
            StatementLine::OperatingExpense => "operating-expense",
            StatementLine::AdministrativeExpense => "administrative-expense",
            StatementLine::FinancialExpense => "financial-expense",
        }
    }

    /// The human readable name of the line.
    pub fn label(self) -> &'static str {
        match self {
            StatementLine::Revenue => "Revenue",
            StatementLine::CostOfSales => "Cost of sales",
            StatementLine::OperatingExpense => "Operating expenses",
            StatementLine::AdministrativeExpense => "Administrative expenses",
            StatementLine::FinancialExpense => "Financial expenses",
        }
    }
}

impl FromStr for StatementLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatementLine::ALL
            .into_iter()
            .find(|line| line.as_str() == s)
            .ok_or_else(|| format!("unknown statement line \"{s}\""))
    }
}

impl Display for StatementLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A category for grouping ledger entries, e.g. "Ingredients" or "Sales".
///
/// Categories form a shallow hierarchy through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: Name,
    pub description: String,
    pub parent_id: Option<CategoryId>,
    pub statement_line: Option<StatementLine>,
}

/// The validated fields for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// A unique name.
    pub name: Name,
    /// Free text.
    pub description: String,
    /// The category this one is nested under.
    pub parent_id: Option<CategoryId>,
    /// The income statement line, inherited from the parent when `None`.
    pub statement_line: Option<StatementLine>,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub statement_line: Option<StatementLine>,
}

impl TryFrom<CategoryFormData> for NewCategory {
    type Error = Error;

    fn try_from(form: CategoryFormData) -> Result<Self, Self::Error> {
        Ok(NewCategory {
            name: Name::new(&form.name)?,
            description: form.description.trim().to_owned(),
            parent_id: form.parent_id,
            statement_line: form.statement_line,
        })
    }
}

/// The statement line a category is reported under.
///
/// A category without its own line inherits the line of its parent.
pub fn effective_statement_line(
    category: &Category,
    categories: &[Category],
) -> Option<StatementLine> {
    category.statement_line.or_else(|| {
        let parent_id = category.parent_id?;

        categories
            .iter()
            .find(|candidate| candidate.id == parent_id)
            .and_then(|parent| parent.statement_line)
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{
        category::{Category, StatementLine, domain::effective_statement_line},
        name::Name,
    };

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
    fn statement_line_round_trips_through_str() {
        for line in StatementLine::ALL {
            assert_eq!(StatementLine::from_str(line.as_str()), Ok(line));
        }
    }

    #[test]
    fn unknown_statement_line_is_an_error() {
        assert!(StatementLine::from_str("assets").is_err());
    }

    #[test]
    fn subcategory_inherits_parent_line() {
        let parent = category(1, None, Some(StatementLine::CostOfSales));
        let child = category(2, Some(1), None);
        let categories = vec![parent, child.clone()];

        assert_eq!(
            effective_statement_line(&child, &categories),
            Some(StatementLine::CostOfSales)
        );
    }

    #[test]
    fn own_line_overrides_parent_line() {
        let parent = category(1, None, Some(StatementLine::CostOfSales));
        let child = category(2, Some(1), Some(StatementLine::FinancialExpense));
        let categories = vec![parent, child.clone()];

        assert_eq!(
            effective_statement_line(&child, &categories),
            Some(StatementLine::FinancialExpense)
        );
    }

    #[test]
    fn unclassified_without_parent() {
        let child = category(2, None, None);

        assert_eq!(effective_statement_line(&child, &[child.clone()]), None);
    }
}
