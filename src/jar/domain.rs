//! Savings jars: money set aside from the cash balance for a purpose.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::JarId,
    money::validate_non_negative_amount,
    name::Name,
};

/// An earmarked sub-balance, e.g. "Emergency fund" or "New oven".
///
/// The balance only grows through transfers from the cash balance, see
/// [crate::jar::transfer_to_jar].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsJar {
    pub id: JarId,
    pub name: Name,
    pub purpose: String,
    pub balance: Decimal,
    /// The amount the organization wants to save, zero for no target.
    pub target: Decimal,
}

impl SavingsJar {
    /// How far the balance is towards the target, as a percentage.
    ///
    /// Jars without a target report 0.
    pub fn progress_percent(&self) -> Decimal {
        if self.target.is_zero() {
            return Decimal::ZERO;
        }

        self.balance / self.target * Decimal::ONE_HUNDRED
    }
}

/// The validated fields for creating or updating a savings jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJar {
    /// The name of the jar, e.g. "Emergency reserve".
    pub name: Name,
    /// What the money is being saved for.
    pub purpose: String,
    /// The amount to save, zero if there is no target.
    pub target: Decimal,
}

/// Form data for savings jar creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct JarFormData {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub target: Option<Decimal>,
}

impl TryFrom<JarFormData> for NewJar {
    type Error = Error;

    fn try_from(form: JarFormData) -> Result<Self, Self::Error> {
        Ok(NewJar {
            name: Name::new(&form.name)?,
            purpose: form.purpose.trim().to_owned(),
            target: validate_non_negative_amount(form.target.unwrap_or_default())?,
        })
    }
}

/// Form data for moving cash into a savings jar.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferFormData {
    pub jar_id: JarId,
    pub amount: Decimal,
}
