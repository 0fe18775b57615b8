//! Database operations for ledger entries.
//!
//! These functions do not touch credit card limits. Use the functions in
//! [crate::entry::ledger] to create, update or delete entries from handlers.

use rusqlite::{Connection, Row, types::Type};
use time::Date;

use crate::{
    Error,
    database_id::{CardId, EntryId},
    entry::{EntryKind, LedgerEntry, NewEntry, PaymentMethod},
    money::decimal_column,
    period::AccountingPeriod,
};

const ENTRY_COLUMNS: &str = "id, description, kind, amount, date, category_id, supplier_id, \
    payment_method, destination_jar_id, card_id, notes, is_transfer";

/// Insert an entry and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidReference] if the category, supplier, savings jar or
/// card does not exist.
pub fn create_entry(entry: &NewEntry, connection: &Connection) -> Result<LedgerEntry, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO ledger_entry
                (description, kind, amount, date, category_id, supplier_id,
                 payment_method, destination_jar_id, card_id, notes, is_transfer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING {ENTRY_COLUMNS}"
        ))?
        .query_row(
            (
                &entry.description,
                entry.kind.as_str(),
                entry.amount.to_string(),
                entry.date,
                entry.category_id,
                entry.supplier_id,
                entry.payment_method.map(PaymentMethod::as_str),
                entry.destination_jar_id,
                entry.card_id,
                &entry.notes,
                entry.destination_jar_id.is_some(),
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single entry by ID.
pub fn get_entry(entry_id: EntryId, connection: &Connection) -> Result<LedgerEntry, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entry WHERE id = :id"
        ))?
        .query_row(&[(":id", &entry_id)], map_row)
        .map_err(|error| error.into())
}

/// Overwrite an entry with `entry`.
///
/// The destination savings jar and the transfer flag are kept as they were, an
/// entry cannot be turned into a transfer or back by editing it.
///
/// # Errors
/// Returns [Error::UpdateMissingEntry] if the entry does not exist.
pub fn update_entry(
    entry_id: EntryId,
    entry: &NewEntry,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE ledger_entry
         SET description = ?1, kind = ?2, amount = ?3, date = ?4, category_id = ?5,
             supplier_id = ?6, payment_method = ?7, card_id = ?8, notes = ?9
         WHERE id = ?10",
        (
            &entry.description,
            entry.kind.as_str(),
            entry.amount.to_string(),
            entry.date,
            entry.category_id,
            entry.supplier_id,
            entry.payment_method.map(PaymentMethod::as_str),
            entry.card_id,
            &entry.notes,
            entry_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEntry);
    }

    Ok(())
}

/// Delete an entry by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingEntry] if the entry does not exist.
pub fn delete_entry(entry_id: EntryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM ledger_entry WHERE id = ?1", [entry_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingEntry);
    }

    Ok(())
}

/// Retrieve the entries dated between `start` and `end`, both inclusive, newest first.
///
/// A missing bound leaves that side of the range open.
pub fn get_entries_between(
    start: Option<Date>,
    end: Option<Date>,
    connection: &Connection,
) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entry
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date DESC, id DESC"
        ))?
        .query_map((start, end), map_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Retrieve every entry, newest first.
pub fn get_all_entries(connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    get_entries_between(None, None, connection)
}

/// Retrieve the `limit` most recent entries.
pub fn get_recent_entries(limit: u32, connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entry ORDER BY date DESC, id DESC LIMIT ?1"
        ))?
        .query_map([limit], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the outflows charged to a card within `period`, newest first.
pub fn get_card_entries(
    card_id: CardId,
    period: AccountingPeriod,
    connection: &Connection,
) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entry
             WHERE card_id = ?1 AND kind = 'outflow' AND date BETWEEN ?2 AND ?3
             ORDER BY date DESC, id DESC"
        ))?
        .query_map((card_id, period.start, period.end), map_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Initialize the ledger entry table.
///
/// Must run after the tables it references have been created.
pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS ledger_entry (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('inflow', 'outflow')),
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
            supplier_id INTEGER REFERENCES supplier(id) ON DELETE SET NULL,
            payment_method TEXT,
            destination_jar_id INTEGER REFERENCES savings_jar(id) ON DELETE SET NULL,
            card_id INTEGER REFERENCES credit_card(id) ON DELETE SET NULL,
            notes TEXT NOT NULL DEFAULT '',
            is_transfer INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_ledger_entry_date ON ledger_entry(date);
        CREATE INDEX IF NOT EXISTS idx_ledger_entry_card ON ledger_entry(card_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    let raw_kind: String = row.get(2)?;
    let kind = raw_kind
        .parse::<EntryKind>()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, error.into()))?;

    let raw_payment_method: Option<String> = row.get(7)?;
    let payment_method = raw_payment_method
        .as_deref()
        .map(str::parse::<PaymentMethod>)
        .transpose()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, error.into()))?;

    Ok(LedgerEntry {
        id: row.get(0)?,
        description: row.get(1)?,
        kind,
        amount: decimal_column(row, 3)?,
        date: row.get(4)?,
        category_id: row.get(5)?,
        supplier_id: row.get(6)?,
        payment_method,
        destination_jar_id: row.get(8)?,
        card_id: row.get(9)?,
        notes: row.get(10)?,
        is_transfer: row.get(11)?,
    })
}

#[cfg(test)]
mod entry_query_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        category::{NewCategory, create_category, delete_category},
        entry::{
            EntryKind, NewEntry, PaymentMethod, create_entry, delete_entry, get_entries_between,
            get_entry, get_recent_entries, update_entry,
        },
        name::Name,
        test_utils::get_test_connection,
    };

    fn entry_on(date: time::Date) -> NewEntry {
        NewEntry::new("Bread", EntryKind::Outflow, dec!(12.40), date)
            .payment_method(PaymentMethod::Cash)
    }

    #[test]
    fn create_entry_round_trips_every_field() {
        let connection = get_test_connection();
        let entry = NewEntry {
            notes: "weekly order".to_owned(),
            ..entry_on(date!(2024 - 09 - 12)).payment_method(PaymentMethod::InstantTransfer)
        };

        let created = create_entry(&entry, &connection).unwrap();

        assert_eq!(created.amount, dec!(12.40));
        assert_eq!(created.payment_method, Some(PaymentMethod::InstantTransfer));
        assert_eq!(get_entry(created.id, &connection), Ok(created));
    }

    #[test]
    fn unknown_category_is_invalid_reference() {
        let connection = get_test_connection();

        let got = create_entry(&entry_on(date!(2024 - 09 - 12)).category(99), &connection);

        assert_eq!(got, Err(Error::InvalidReference));
    }

    #[test]
    fn deleting_category_keeps_entry() {
        let connection = get_test_connection();
        let category = create_category(
            NewCategory {
                name: Name::new_unchecked("Bakery"),
                description: String::new(),
                parent_id: None,
                statement_line: None,
            },
            &connection,
        )
        .unwrap();
        let entry = create_entry(
            &entry_on(date!(2024 - 09 - 12)).category(category.id),
            &connection,
        )
        .unwrap();

        delete_category(category.id, &connection).unwrap();

        assert_eq!(get_entry(entry.id, &connection).unwrap().category_id, None);
    }

    #[test]
    fn update_and_delete_missing_entry_fail() {
        let connection = get_test_connection();
        let entry = entry_on(date!(2024 - 09 - 12));

        assert_eq!(
            update_entry(1, &entry, &connection),
            Err(Error::UpdateMissingEntry)
        );
        assert_eq!(delete_entry(1, &connection), Err(Error::DeleteMissingEntry));
    }

    #[test]
    fn entries_between_includes_both_bounds() {
        let connection = get_test_connection();
        for date in [
            date!(2024 - 08 - 10),
            date!(2024 - 08 - 11),
            date!(2024 - 09 - 10),
            date!(2024 - 09 - 11),
        ] {
            create_entry(&entry_on(date), &connection).unwrap();
        }

        let got = get_entries_between(
            Some(date!(2024 - 08 - 11)),
            Some(date!(2024 - 09 - 10)),
            &connection,
        )
        .unwrap();

        let dates: Vec<_> = got.iter().map(|entry| entry.date).collect();
        assert_eq!(dates, [date!(2024 - 09 - 10), date!(2024 - 08 - 11)]);
        assert_eq!(
            get_entries_between(None, Some(date!(2024 - 08 - 10)), &connection)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn recent_entries_are_newest_first() {
        let connection = get_test_connection();
        for day in 1..=7 {
            let date = time::Date::from_calendar_date(2024, time::Month::September, day).unwrap();
            create_entry(&entry_on(date), &connection).unwrap();
        }

        let got = get_recent_entries(5, &connection).unwrap();

        assert_eq!(got.len(), 5);
        assert_eq!(got[0].date, date!(2024 - 09 - 07));
    }
}
