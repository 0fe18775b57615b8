//! Credit cards and the bookkeeping of their available limit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::CardId,
    money::validate_non_negative_amount,
    name::Name,
    period::CutoffDay,
};

/// A credit card with a spending limit.
///
/// `available_limit` always stays within `0..=total_limit`. It is only changed
/// through [CreditCard::consume], [CreditCard::release],
/// [CreditCard::reset_statement] and [CreditCard::change_total_limit].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CardId,
    pub name: Name,
    pub total_limit: Decimal,
    pub available_limit: Decimal,
    /// The day of the month the statement closes.
    pub closing_day: u8,
    /// The day of the month the statement must be paid.
    pub due_day: u8,
    /// Inactive cards are kept for history but cannot be picked for new entries.
    pub is_active: bool,
    pub notes: String,
}

impl CreditCard {
    /// Take `amount` out of the available limit.
    ///
    /// # Errors
    ///
    /// Returns [Error::InsufficientLimit] if `amount` is larger than the
    /// available limit, in which case the card is left unchanged.
    pub fn consume(&mut self, amount: Decimal) -> Result<(), Error> {
        if amount > self.available_limit {
            return Err(Error::InsufficientLimit {
                requested: amount,
                available: self.available_limit,
            });
        }

        self.available_limit -= amount;

        Ok(())
    }

    /// Give `amount` back to the available limit, never going past the total limit.
    pub fn release(&mut self, amount: Decimal) {
        self.available_limit = (self.available_limit + amount).min(self.total_limit);
    }

    /// Restore the full limit, e.g. after the statement has been paid.
    pub fn reset_statement(&mut self) {
        self.available_limit = self.total_limit;
    }

    /// Set a new total limit while keeping the amount already used.
    ///
    /// The available limit moves by the same amount as the total limit and is
    /// clamped to `0..=new_total_limit`.
    pub fn change_total_limit(&mut self, new_total_limit: Decimal) {
        let delta = new_total_limit - self.total_limit;

        self.total_limit = new_total_limit;
        self.available_limit = (self.available_limit + delta).clamp(Decimal::ZERO, new_total_limit);
    }

    /// The part of the limit that has been spent.
    pub fn used_limit(&self) -> Decimal {
        self.total_limit - self.available_limit
    }

    /// The percentage of the total limit that has been spent, 0 for a card without a limit.
    pub fn usage_percent(&self) -> Decimal {
        if self.total_limit.is_zero() {
            return Decimal::ZERO;
        }

        self.used_limit() / self.total_limit * Decimal::ONE_HUNDRED
    }
}

/// The validated fields for creating or updating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    /// The name shown in forms and reports, e.g. "Company Visa".
    pub name: Name,
    /// The most that can be owed on the card at once.
    pub total_limit: Decimal,
    /// The day of the month the statement closes, which starts a new cycle.
    pub closing_day: u8,
    /// The day of the month the statement must be paid.
    pub due_day: u8,
    /// Inactive cards are not offered for new entries.
    pub is_active: bool,
    /// Free text.
    pub notes: String,
}

/// Form data for card creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CardFormData {
    pub name: String,
    pub total_limit: Decimal,
    pub closing_day: u8,
    pub due_day: u8,
    /// Checkboxes are only sent when checked.
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<CardFormData> for NewCard {
    type Error = Error;

    fn try_from(form: CardFormData) -> Result<Self, Self::Error> {
        Ok(NewCard {
            name: Name::new(&form.name)?,
            total_limit: validate_non_negative_amount(form.total_limit)?,
            closing_day: CutoffDay::new(form.closing_day)?.day(),
            due_day: CutoffDay::new(form.due_day)?.day(),
            is_active: form.is_active,
            notes: form.notes.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod credit_card_tests {
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        card::{CardFormData, CreditCard, NewCard},
        name::Name,
    };

    fn card(total_limit: rust_decimal::Decimal) -> CreditCard {
        CreditCard {
            id: 1,
            name: Name::new_unchecked("Company Visa"),
            total_limit,
            available_limit: total_limit,
            closing_day: 5,
            due_day: 15,
            is_active: true,
            notes: String::new(),
        }
    }

    #[test]
    fn consume_within_limit_reduces_available_limit() {
        let mut card = card(dec!(1000));

        card.consume(dec!(250.75)).unwrap();

        assert_eq!(card.available_limit, dec!(749.25));
        assert_eq!(card.used_limit(), dec!(250.75));
    }

    #[test]
    fn consume_whole_limit_succeeds() {
        let mut card = card(dec!(100));

        card.consume(dec!(100)).unwrap();

        assert_eq!(card.available_limit, dec!(0));
    }

    #[test]
    fn consume_over_limit_fails_and_leaves_card_unchanged() {
        let mut card = card(dec!(100));
        card.consume(dec!(60)).unwrap();

        let got = card.consume(dec!(40.01));

        assert_eq!(
            got,
            Err(Error::InsufficientLimit {
                requested: dec!(40.01),
                available: dec!(40),
            })
        );
        assert_eq!(card.available_limit, dec!(40));
    }

    #[test]
    fn release_restores_limit() {
        let mut card = card(dec!(100));
        card.consume(dec!(60)).unwrap();

        card.release(dec!(60));

        assert_eq!(card.available_limit, dec!(100));
    }

    #[test]
    fn release_clamps_at_total_limit() {
        let mut card = card(dec!(100));
        card.consume(dec!(10)).unwrap();

        card.release(dec!(50));

        assert_eq!(card.available_limit, dec!(100));
    }

    #[test]
    fn reset_statement_restores_full_limit() {
        let mut card = card(dec!(500));
        card.consume(dec!(499.99)).unwrap();

        card.reset_statement();

        assert_eq!(card.available_limit, dec!(500));
    }

    #[test]
    fn raising_total_limit_keeps_used_amount() {
        let mut card = card(dec!(1000));
        card.consume(dec!(300)).unwrap();

        card.change_total_limit(dec!(1500));

        assert_eq!(card.available_limit, dec!(1200));
        assert_eq!(card.used_limit(), dec!(300));
    }

    #[test]
    fn lowering_total_limit_below_used_amount_clamps_at_zero() {
        let mut card = card(dec!(1000));
        card.consume(dec!(800)).unwrap();

        card.change_total_limit(dec!(500));

        assert_eq!(card.available_limit, dec!(0));
        assert_eq!(card.total_limit, dec!(500));
    }

    #[test]
    fn usage_percent() {
        let mut visa = card(dec!(200));
        visa.consume(dec!(50)).unwrap();

        assert_eq!(visa.usage_percent(), dec!(25));
        assert_eq!(card(dec!(0)).usage_percent(), dec!(0));
    }

    #[test]
    fn form_rejects_invalid_closing_day() {
        let got = NewCard::try_from(CardFormData {
            name: "Company Visa".to_owned(),
            total_limit: dec!(1000),
            closing_day: 32,
            due_day: 10,
            is_active: true,
            notes: String::new(),
        });

        assert_eq!(got, Err(Error::InvalidCutoffDay(32)));
    }

    #[test]
    fn form_rejects_negative_limit() {
        let got = NewCard::try_from(CardFormData {
            name: "Company Visa".to_owned(),
            total_limit: dec!(-1),
            closing_day: 5,
            due_day: 10,
            is_active: true,
            notes: String::new(),
        });

        assert_eq!(got, Err(Error::InvalidAmount(dec!(-1))));
    }
}
