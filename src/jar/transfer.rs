//! Moving cash into a savings jar.

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    database_id::JarId,
    entry::{EntryKind, LedgerEntry, NewEntry, create_entry, get_all_entries},
    jar::{SavingsJar, db::save_balance, get_jar},
    money::validate_amount,
    report::cash_balance,
};

/// The cash balance across all entries: inflows minus cash outflows.
pub fn current_cash_balance(connection: &Connection) -> Result<Decimal, Error> {
    Ok(cash_balance(&get_all_entries(connection)?))
}

/// Move `amount` from the cash balance into the jar `jar_id`.
///
/// The jar's balance grows by `amount` and an outflow without a payment method
/// is recorded against the jar on `date`, both in one transaction.
///
/// # Errors
///
/// - [Error::InvalidAmount] if `amount` is not a positive amount of money.
/// - [Error::InvalidReference] if the jar does not exist.
/// - [Error::InsufficientBalance] if `amount` is larger than the cash balance.
pub fn transfer_to_jar(
    jar_id: JarId,
    amount: Decimal,
    date: Date,
    connection: &mut Connection,
) -> Result<(SavingsJar, LedgerEntry), Error> {
    validate_amount(amount)?;

    let transaction = connection.transaction()?;

    let mut jar = match get_jar(jar_id, &transaction) {
        Ok(jar) => jar,
        Err(Error::NotFound) => return Err(Error::InvalidReference),
        Err(error) => return Err(error),
    };

    let available = current_cash_balance(&transaction)?;
    if amount > available {
        return Err(Error::InsufficientBalance {
            requested: amount,
            available,
        });
    }

    jar.balance += amount;
    save_balance(&jar, &transaction)?;

    let entry = create_entry(
        &NewEntry {
            destination_jar_id: Some(jar.id),
            notes: "Internal transfer.".to_owned(),
            ..NewEntry::new(
                &format!("Transfer to savings jar {}", jar.name),
                EntryKind::Outflow,
                amount,
                date,
            )
        },
        &transaction,
    )?;

    transaction.commit()?;

    tracing::debug!(
        "Moved {amount} into savings jar {}, balance is now {}",
        jar.id,
        jar.balance
    );

    Ok((jar, entry))
}
