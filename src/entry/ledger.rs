//! Keeps credit card limits in step with the entries charged to them.
//!
//! Every function here runs inside a single SQLite transaction. If any step
//! fails the transaction is dropped without committing, so neither the entry
//! nor the card is changed.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error,
    card::{CreditCard, get_card, save_available_limit},
    database_id::{CardId, EntryId},
    entry::{LedgerEntry, NewEntry, create_entry, delete_entry, get_entry, update_entry},
};

/// Validate and insert `entry`, taking its amount out of the card's available
/// limit if it is an outflow paid by credit card.
///
/// # Errors
///
/// - [Error::InvalidAmount] or [Error::InconsistentPaymentMethod] if the entry is invalid.
/// - [Error::InsufficientLimit] if the card does not have enough limit left.
/// - [Error::InvalidReference] if the card or any other referenced row does not exist.
pub fn apply_entry_create(
    entry: &NewEntry,
    connection: &mut Connection,
) -> Result<LedgerEntry, Error> {
    entry.validate()?;

    let transaction = connection.transaction()?;

    if let Some((card_id, amount)) = entry.card_charge() {
        consume_on_card(card_id, amount, &transaction)?;
    }

    let created = create_entry(entry, &transaction)?;

    transaction.commit()?;

    Ok(created)
}

/// Validate `entry` and overwrite the entry `entry_id` with it.
///
/// The old charge is released before the new one is taken, so an edit on the
/// same card is checked against the limit as if the old charge never happened.
///
/// # Errors
///
/// Returns [Error::UpdateMissingEntry] if the entry does not exist, otherwise
/// the same errors as [apply_entry_create].
pub fn apply_entry_update(
    entry_id: EntryId,
    entry: &NewEntry,
    connection: &mut Connection,
) -> Result<LedgerEntry, Error> {
    entry.validate()?;

    let transaction = connection.transaction()?;

    let old_entry = get_entry(entry_id, &transaction).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingEntry,
        error => error,
    })?;

    if let Some((card_id, amount)) = old_entry.card_charge() {
        release_on_card(card_id, amount, &transaction)?;
    }

    if let Some((card_id, amount)) = entry.card_charge() {
        consume_on_card(card_id, amount, &transaction)?;
    }

    update_entry(entry_id, entry, &transaction)?;
    let updated = get_entry(entry_id, &transaction)?;

    transaction.commit()?;

    Ok(updated)
}

/// Delete the entry `entry_id`, giving its amount back to the card it was charged to.
///
/// # Errors
///
/// Returns [Error::DeleteMissingEntry] if the entry does not exist.
pub fn apply_entry_delete(entry_id: EntryId, connection: &mut Connection) -> Result<(), Error> {
    let transaction = connection.transaction()?;

    let old_entry = get_entry(entry_id, &transaction).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingEntry,
        error => error,
    })?;

    if let Some((card_id, amount)) = old_entry.card_charge() {
        release_on_card(card_id, amount, &transaction)?;
    }

    delete_entry(entry_id, &transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Restore a card's full limit, e.g. once its statement has been paid.
///
/// # Errors
///
/// Returns [Error::UpdateMissingCard] if the card does not exist.
pub fn reset_statement(card_id: CardId, connection: &mut Connection) -> Result<CreditCard, Error> {
    let transaction = connection.transaction()?;

    let mut card = get_card(card_id, &transaction).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingCard,
        error => error,
    })?;

    card.reset_statement();
    save_available_limit(&card, &transaction)?;

    transaction.commit()?;

    tracing::debug!(
        "Reset the statement of card {card_id}, {} available",
        card.available_limit
    );

    Ok(card)
}

fn consume_on_card(
    card_id: CardId,
    amount: Decimal,
    connection: &Connection,
) -> Result<(), Error> {
    let mut card = get_card(card_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidReference,
        error => error,
    })?;

    card.consume(amount)?;
    save_available_limit(&card, connection)?;

    tracing::debug!(
        "Consumed {amount} on card {card_id}, {} available",
        card.available_limit
    );

    Ok(())
}

fn release_on_card(
    card_id: CardId,
    amount: Decimal,
    connection: &Connection,
) -> Result<(), Error> {
    let mut card = get_card(card_id, connection)?;

    card.release(amount);
    save_available_limit(&card, connection)?;

    tracing::debug!(
        "Released {amount} on card {card_id}, {} available",
        card.available_limit
    );

    Ok(())
}
