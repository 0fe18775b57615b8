//! Database operations for suppliers.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::SupplierId,
    name::Name,
    supplier::{NewSupplier, Supplier, TaxId},
};

/// Create a supplier and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateTaxId] if another supplier has the same tax ID.
pub fn create_supplier(supplier: NewSupplier, connection: &Connection) -> Result<Supplier, Error> {
    connection
        .prepare(
            "INSERT INTO supplier (name, tax_id, contact) VALUES (?1, ?2, ?3)
             RETURNING id, name, tax_id, contact",
        )?
        .query_row(
            (
                supplier.name.as_ref(),
                supplier.tax_id.as_ref().map(AsRef::as_ref),
                &supplier.contact,
            ),
            map_row,
        )
        .map_err(|error| map_unique_error(error, supplier.tax_id.as_ref()))
}

/// Retrieve a single supplier by ID.
pub fn get_supplier(supplier_id: SupplierId, connection: &Connection) -> Result<Supplier, Error> {
    connection
        .prepare("SELECT id, name, tax_id, contact FROM supplier WHERE id = :id;")?
        .query_row(&[(":id", &supplier_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all suppliers ordered alphabetically by name.
pub fn get_all_suppliers(connection: &Connection) -> Result<Vec<Supplier>, Error> {
    connection
        .prepare("SELECT id, name, tax_id, contact FROM supplier ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_supplier| maybe_supplier.map_err(|error| error.into()))
        .collect()
}

/// Update a supplier. Returns an error if the supplier doesn't exist.
pub fn update_supplier(
    supplier_id: SupplierId,
    supplier: NewSupplier,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE supplier SET name = ?1, tax_id = ?2, contact = ?3 WHERE id = ?4",
            (
                supplier.name.as_ref(),
                supplier.tax_id.as_ref().map(AsRef::as_ref),
                &supplier.contact,
                supplier_id,
            ),
        )
        .map_err(|error| map_unique_error(error, supplier.tax_id.as_ref()))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingSupplier);
    }

    Ok(())
}

/// Delete a supplier by ID. Entries from the supplier are kept without a supplier.
pub fn delete_supplier(supplier_id: SupplierId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM supplier WHERE id = ?1", [supplier_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingSupplier);
    }

    Ok(())
}

/// Initialize the supplier table.
///
/// SQLite allows many NULLs in a UNIQUE column, so any number of suppliers
/// may omit the tax ID.
pub fn create_supplier_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS supplier (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            tax_id TEXT UNIQUE,
            contact TEXT NOT NULL DEFAULT ''
        );",
    )?;

    Ok(())
}

fn map_unique_error(error: rusqlite::Error, tax_id: Option<&TaxId>) -> Error {
    match (error, tax_id) {
        (
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ),
            Some(tax_id),
        ) => Error::DuplicateTaxId(tax_id.to_string()),
        (error, _) => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Supplier, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_tax_id: Option<String> = row.get(2)?;
    let contact = row.get(3)?;

    Ok(Supplier {
        id,
        name: Name::new_unchecked(&raw_name),
        tax_id: raw_tax_id.as_deref().map(TaxId::new_unchecked),
        contact,
    })
}
