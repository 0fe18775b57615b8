//! Money amounts as exact decimals.
//!
//! Amounts are stored in SQLite as TEXT and summed in Rust so that no value
//! ever goes through a floating point conversion.

use std::str::FromStr;

use rusqlite::{Row, types::Type};
use rust_decimal::Decimal;

use crate::Error;

/// The number of decimal places allowed for amounts of money.
pub const MONEY_SCALE: u32 = 2;

/// The largest amount accepted for an entry, a transfer, a card limit or a jar target.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Check that `amount` is greater than zero, no larger than [MAX_AMOUNT] and
/// has at most two decimal places.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if the amount is zero, negative, above
/// [MAX_AMOUNT] or has more than two decimal places.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount <= Decimal::ZERO
        || amount > MAX_AMOUNT
        || amount.normalize().scale() > MONEY_SCALE
    {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(amount)
}

/// Like [validate_amount], but zero is also accepted.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if the amount is negative, above
/// [MAX_AMOUNT] or has more than two decimal places.
pub fn validate_non_negative_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }

    validate_amount(amount)
}

/// Read a decimal stored as TEXT from the column at `index`.
pub(crate) fn decimal_column(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Sum decimals exactly.
pub(crate) fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |total, amount| total + amount)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        money::{MAX_AMOUNT, decimal_column, sum, validate_amount, validate_non_negative_amount},
    };

    #[test]
    fn accepts_positive_amount_with_two_decimal_places() {
        assert_eq!(validate_amount(dec!(12.34)), Ok(dec!(12.34)));
    }

    #[test]
    fn accepts_trailing_zeros_past_two_decimal_places() {
        assert!(validate_amount(dec!(12.300)).is_ok());
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert_eq!(validate_amount(dec!(0)), Err(Error::InvalidAmount(dec!(0))));
        assert_eq!(
            validate_amount(dec!(-1.50)),
            Err(Error::InvalidAmount(dec!(-1.50)))
        );
    }

    #[test]
    fn rejects_fractions_of_a_cent() {
        assert_eq!(
            validate_amount(dec!(0.001)),
            Err(Error::InvalidAmount(dec!(0.001)))
        );
    }

    #[test]
    fn accepts_the_largest_amount() {
        assert_eq!(MAX_AMOUNT, dec!(99999999.99));
        assert_eq!(validate_amount(dec!(99999999.99)), Ok(dec!(99999999.99)));
    }

    #[test]
    fn rejects_amounts_above_the_largest_amount() {
        assert_eq!(
            validate_amount(dec!(100000000.00)),
            Err(Error::InvalidAmount(dec!(100000000.00)))
        );
        assert_eq!(
            validate_amount(Decimal::MAX),
            Err(Error::InvalidAmount(Decimal::MAX))
        );
        assert!(validate_non_negative_amount(Decimal::MAX).is_err());
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(validate_non_negative_amount(dec!(0.00)), Ok(Decimal::ZERO));
        assert!(validate_non_negative_amount(dec!(-0.01)).is_err());
    }

    #[test]
    fn reads_decimal_from_text_column() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection
            .query_row("SELECT '1234.56'", [], |row| decimal_column(row, 0))
            .unwrap();

        assert_eq!(got, dec!(1234.56));
    }

    #[test]
    fn invalid_text_is_a_conversion_error() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection.query_row("SELECT 'abc'", [], |row| decimal_column(row, 0));

        assert!(matches!(
            got,
            Err(rusqlite::Error::FromSqlConversionFailure(0, _, _))
        ));
    }

    #[test]
    fn sums_exactly() {
        let amounts = vec![dec!(0.10); 10];

        assert_eq!(sum(amounts), dec!(1.00));
    }
}
