//! Database operations for credit cards.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    card::{CreditCard, NewCard},
    database_id::CardId,
    money::decimal_column,
    name::Name,
};

const CARD_COLUMNS: &str =
    "id, name, total_limit, available_limit, closing_day, due_day, is_active, notes";

/// Create a card with its whole limit available.
pub fn create_card(card: NewCard, connection: &Connection) -> Result<CreditCard, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO credit_card
                (name, total_limit, available_limit, closing_day, due_day, is_active, notes)
             VALUES (?1, ?2, ?2, ?3, ?4, ?5, ?6)
             RETURNING {CARD_COLUMNS}"
        ))?
        .query_row(
            (
                card.name.as_ref(),
                card.total_limit.to_string(),
                card.closing_day,
                card.due_day,
                card.is_active,
                &card.notes,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single card by ID.
pub fn get_card(card_id: CardId, connection: &Connection) -> Result<CreditCard, Error> {
    connection
        .prepare(&format!("SELECT {CARD_COLUMNS} FROM credit_card WHERE id = :id"))?
        .query_row(&[(":id", &card_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all cards, active cards first, then by name.
pub fn get_all_cards(connection: &Connection) -> Result<Vec<CreditCard>, Error> {
    connection
        .prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM credit_card ORDER BY is_active DESC, name ASC"
        ))?
        .query_map([], map_row)?
        .map(|maybe_card| maybe_card.map_err(|error| error.into()))
        .collect()
}

/// Update a card's details.
///
/// A change of the total limit moves the available limit by the same amount,
/// see [CreditCard::change_total_limit].
///
/// # Errors
/// Returns [Error::UpdateMissingCard] if the card does not exist.
pub fn update_card(
    card_id: CardId,
    update: NewCard,
    connection: &Connection,
) -> Result<CreditCard, Error> {
    let mut card = get_card(card_id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingCard,
        error => error,
    })?;

    card.change_total_limit(update.total_limit);
    card.name = update.name;
    card.closing_day = update.closing_day;
    card.due_day = update.due_day;
    card.is_active = update.is_active;
    card.notes = update.notes;

    let rows_affected = connection.execute(
        "UPDATE credit_card
         SET name = ?1, total_limit = ?2, available_limit = ?3, closing_day = ?4,
             due_day = ?5, is_active = ?6, notes = ?7
         WHERE id = ?8",
        (
            card.name.as_ref(),
            card.total_limit.to_string(),
            card.available_limit.to_string(),
            card.closing_day,
            card.due_day,
            card.is_active,
            &card.notes,
            card_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCard);
    }

    Ok(card)
}

/// Write a card's available limit back to the database.
pub(crate) fn save_available_limit(card: &CreditCard, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE credit_card SET available_limit = ?1 WHERE id = ?2",
        (card.available_limit.to_string(), card.id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCard);
    }

    Ok(())
}

/// Delete a card by ID. Entries charged to the card are kept without a card.
pub fn delete_card(card_id: CardId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM credit_card WHERE id = ?1", [card_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCard);
    }

    Ok(())
}

/// The sum of the limits that are still available on the active cards.
pub fn total_available_limit(cards: &[CreditCard]) -> Decimal {
    cards
        .iter()
        .filter(|card| card.is_active)
        .map(|card| card.available_limit)
        .sum()
}

/// Initialize the credit card table.
pub fn create_card_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS credit_card (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            total_limit TEXT NOT NULL,
            available_limit TEXT NOT NULL,
            closing_day INTEGER NOT NULL CHECK (closing_day BETWEEN 1 AND 31),
            due_day INTEGER NOT NULL CHECK (due_day BETWEEN 1 AND 31),
            is_active INTEGER NOT NULL DEFAULT 1,
            notes TEXT NOT NULL DEFAULT ''
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<CreditCard, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(CreditCard {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        total_limit: decimal_column(row, 2)?,
        available_limit: decimal_column(row, 3)?,
        closing_day: row.get(4)?,
        due_day: row.get(5)?,
        is_active: row.get(6)?,
        notes: row.get(7)?,
    })
}
