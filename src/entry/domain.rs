//! Ledger entries: the recorded inflows and outflows of money.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CardId, CategoryId, EntryId, JarId, SupplierId},
    money::validate_amount,
};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money received, e.g. sales.
    Inflow,
    /// Money spent.
    Outflow,
}

impl EntryKind {
    /// The value stored in the database and sent by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Inflow => "inflow",
            EntryKind::Outflow => "outflow",
        }
    }

    /// The name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Inflow => "Inflow",
            EntryKind::Outflow => "Outflow",
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inflow" => Ok(EntryKind::Inflow),
            "outflow" => Ok(EntryKind::Outflow),
            other => Err(format!("unknown entry kind \"{other}\"")),
        }
    }
}

/// How an entry was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Notes and coins.
    Cash,
    /// An instant bank transfer (PIX).
    InstantTransfer,
    /// Charged to one of the organization's credit cards.
    CreditCard,
    /// Paid straight from the bank account by debit card.
    DebitCard,
    /// Written down on the tab, to be settled later.
    Tab,
}

impl PaymentMethod {
    /// Every payment method, in the order they are offered in forms.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::InstantTransfer,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Tab,
    ];

    /// The value stored in the database and sent by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::InstantTransfer => "instant-transfer",
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::DebitCard => "debit-card",
            PaymentMethod::Tab => "tab",
        }
    }

    /// The name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::InstantTransfer => "Instant transfer",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Tab => "Tab",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("unknown payment method \"{s}\""))
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single inflow or outflow of money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub description: String,
    pub kind: EntryKind,
    /// Always positive, `kind` carries the direction.
    pub amount: Decimal,
    pub date: Date,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    /// `None` for internal movements such as transfers into a savings jar.
    pub payment_method: Option<PaymentMethod>,
    /// Set on the outflow recorded for a transfer into a savings jar.
    pub destination_jar_id: Option<JarId>,
    /// Set if and only if the entry was paid by credit card, unless the card
    /// has since been deleted.
    pub card_id: Option<CardId>,
    pub notes: String,
    /// Whether the entry records a transfer into a savings jar. Stays set after
    /// the jar is deleted.
    pub is_transfer: bool,
}

impl LedgerEntry {
    /// The card and amount this entry holds against a card's limit, if any.
    pub fn card_charge(&self) -> Option<(CardId, Decimal)> {
        card_charge(
            self.kind,
            self.payment_method,
            self.card_id,
            self.amount,
        )
    }

    /// Whether the entry is an outflow that left the cash balance, i.e. any
    /// outflow not paid by credit card.
    pub fn is_cash_outflow(&self) -> bool {
        self.kind == EntryKind::Outflow && self.payment_method != Some(PaymentMethod::CreditCard)
    }

    /// Whether the entry is an outflow paid by credit card.
    pub fn is_card_outflow(&self) -> bool {
        self.kind == EntryKind::Outflow && self.payment_method == Some(PaymentMethod::CreditCard)
    }
}

/// The fields for creating or updating a ledger entry.
///
/// Call [NewEntry::validate] before writing it to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// What the money was for.
    pub description: String,
    /// Whether the money came in or went out.
    pub kind: EntryKind,
    /// A positive amount with at most two decimal places.
    pub amount: Decimal,
    /// The day the money moved.
    pub date: Date,
    /// The category the entry is reported under.
    pub category_id: Option<CategoryId>,
    /// Who was paid.
    pub supplier_id: Option<SupplierId>,
    /// How the entry was paid.
    pub payment_method: Option<PaymentMethod>,
    /// The savings jar the money was moved into.
    pub destination_jar_id: Option<JarId>,
    /// The card charged, required for credit card payments.
    pub card_id: Option<CardId>,
    /// Free text.
    pub notes: String,
}

impl NewEntry {
    /// An entry without a category, supplier or payment method.
    pub fn new(description: &str, kind: EntryKind, amount: Decimal, date: Date) -> Self {
        Self {
            description: description.to_owned(),
            kind,
            amount,
            date,
            category_id: None,
            supplier_id: None,
            payment_method: None,
            destination_jar_id: None,
            card_id: None,
            notes: String::new(),
        }
    }

    /// Set the payment method. Use [NewEntry::card] for credit card payments.
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    /// Pay the entry with the credit card `card_id`.
    pub fn card(mut self, card_id: CardId) -> Self {
        self.payment_method = Some(PaymentMethod::CreditCard);
        self.card_id = Some(card_id);
        self
    }

    /// Put the entry in the category `category_id`.
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Attribute the entry to the supplier `supplier_id`.
    pub fn supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Check the amount and that a card is given if and only if the entry is
    /// paid by credit card.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] or [Error::InconsistentPaymentMethod].
    pub fn validate(&self) -> Result<(), Error> {
        validate_amount(self.amount)?;

        let paid_by_card = self.payment_method == Some(PaymentMethod::CreditCard);

        if paid_by_card != self.card_id.is_some() {
            return Err(Error::InconsistentPaymentMethod);
        }

        Ok(())
    }

    /// The card and amount this entry will hold against a card's limit, if any.
    pub fn card_charge(&self) -> Option<(CardId, Decimal)> {
        card_charge(
            self.kind,
            self.payment_method,
            self.card_id,
            self.amount,
        )
    }
}

fn card_charge(
    kind: EntryKind,
    payment_method: Option<PaymentMethod>,
    card_id: Option<CardId>,
    amount: Decimal,
) -> Option<(CardId, Decimal)> {
    match (kind, payment_method, card_id) {
        (EntryKind::Outflow, Some(PaymentMethod::CreditCard), Some(card_id)) => {
            Some((card_id, amount))
        }
        _ => None,
    }
}

/// Form data for entry creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryFormData {
    pub description: String,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub date: Date,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub payment_method: Option<PaymentMethod>,
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<EntryFormData> for NewEntry {
    type Error = Error;

    fn try_from(form: EntryFormData) -> Result<Self, Self::Error> {
        let entry = NewEntry {
            description: form.description.trim().to_owned(),
            kind: form.kind,
            amount: form.amount,
            date: form.date,
            category_id: form.category_id,
            supplier_id: form.supplier_id,
            payment_method: form.payment_method,
            destination_jar_id: None,
            card_id: form.card_id,
            notes: form.notes.trim().to_owned(),
        };

        entry.validate()?;

        Ok(entry)
    }
}
