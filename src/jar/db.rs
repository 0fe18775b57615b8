//! Database operations for savings jars.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::JarId,
    jar::{NewJar, SavingsJar},
    money::decimal_column,
    name::Name,
};

const JAR_COLUMNS: &str = "id, name, purpose, balance, target";

/// Create a savings jar with an empty balance.
pub fn create_jar(jar: NewJar, connection: &Connection) -> Result<SavingsJar, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO savings_jar (name, purpose, balance, target) VALUES (?1, ?2, '0', ?3)
             RETURNING {JAR_COLUMNS}"
        ))?
        .query_row(
            (jar.name.as_ref(), &jar.purpose, jar.target.to_string()),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single savings jar by ID.
pub fn get_jar(jar_id: JarId, connection: &Connection) -> Result<SavingsJar, Error> {
    connection
        .prepare(&format!("SELECT {JAR_COLUMNS} FROM savings_jar WHERE id = :id;"))?
        .query_row(&[(":id", &jar_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all savings jars ordered alphabetically by name.
pub fn get_all_jars(connection: &Connection) -> Result<Vec<SavingsJar>, Error> {
    connection
        .prepare(&format!("SELECT {JAR_COLUMNS} FROM savings_jar ORDER BY name ASC;"))?
        .query_map([], map_row)?
        .map(|maybe_jar| maybe_jar.map_err(|error| error.into()))
        .collect()
}

/// Update a jar's name, purpose and target. The balance is left unchanged.
pub fn update_jar(jar_id: JarId, jar: NewJar, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE savings_jar SET name = ?1, purpose = ?2, target = ?3 WHERE id = ?4",
        (jar.name.as_ref(), &jar.purpose, jar.target.to_string(), jar_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingJar);
    }

    Ok(())
}

/// Write a jar's balance back to the database.
pub(crate) fn save_balance(jar: &SavingsJar, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE savings_jar SET balance = ?1 WHERE id = ?2",
        (jar.balance.to_string(), jar.id),
    )?;

    Ok(())
}

/// Delete a savings jar by ID. Transfer entries are kept without a jar.
pub fn delete_jar(jar_id: JarId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM savings_jar WHERE id = ?1", [jar_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingJar);
    }

    Ok(())
}

/// Initialize the savings jar table.
pub fn create_jar_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS savings_jar (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            purpose TEXT NOT NULL DEFAULT '',
            balance TEXT NOT NULL DEFAULT '0',
            target TEXT NOT NULL DEFAULT '0'
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<SavingsJar, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let purpose = row.get(2)?;
    let balance = decimal_column(row, 3)?;
    let target = decimal_column(row, 4)?;

    Ok(SavingsJar {
        id,
        name: Name::new_unchecked(&raw_name),
        purpose,
        balance,
        target,
    })
}
