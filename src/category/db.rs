//! Database operations for categories.

use std::{collections::HashMap, str::FromStr};

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    category::{Category, NewCategory, StatementLine},
    database_id::CategoryId,
    name::Name,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name exists,
/// - [Error::InvalidParentCategory] if the parent does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, description, parent_id, statement_line)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, description, parent_id, statement_line",
        )?
        .query_row(
            (
                category.name.as_ref(),
                &category.description,
                category.parent_id,
                category.statement_line.map(StatementLine::as_str),
            ),
            map_row,
        )
        .map_err(|error| map_constraint_error(error, &category.name))
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, description, parent_id, statement_line
             FROM category WHERE id = :id;",
        )?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, description, parent_id, statement_line
             FROM category ORDER BY name ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category. Returns an error if the category doesn't exist.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidParentCategory] if the new parent is the category itself
///   or one of its descendants,
/// - [Error::DuplicateCategoryName] if another category has the same name,
/// - [Error::UpdateMissingCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    category: NewCategory,
    connection: &Connection,
) -> Result<(), Error> {
    if let Some(parent_id) = category.parent_id
        && is_descendant_or_self(parent_id, category_id, connection)?
    {
        return Err(Error::InvalidParentCategory);
    }

    let rows_affected = connection
        .execute(
            "UPDATE category
             SET name = ?1, description = ?2, parent_id = ?3, statement_line = ?4
             WHERE id = ?5",
            (
                category.name.as_ref(),
                &category.description,
                category.parent_id,
                category.statement_line.map(StatementLine::as_str),
                category_id,
            ),
        )
        .map_err(|error| map_constraint_error(error, &category.name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// Entries and subcategories that referred to the category are kept and lose
/// their category.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Count the ledger entries in each category.
pub fn count_entries_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category_id, COUNT(1) FROM ledger_entry
             WHERE category_id IS NOT NULL GROUP BY category_id",
        )?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            parent_id INTEGER,
            statement_line TEXT,
            FOREIGN KEY(parent_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_parent ON category(parent_id);",
    )?;

    Ok(())
}

/// Whether `candidate_id` is `category_id` or sits below it in the hierarchy.
fn is_descendant_or_self(
    candidate_id: CategoryId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<bool, Error> {
    let mut statement = connection.prepare("SELECT parent_id FROM category WHERE id = ?1")?;
    let mut current = Some(candidate_id);
    // Treat a hierarchy deeper than this as a cycle.
    let mut remaining_steps = 64;

    while let Some(id) = current {
        if id == category_id {
            return Ok(true);
        }

        if remaining_steps == 0 {
            return Ok(true);
        }
        remaining_steps -= 1;

        current = match statement.query_row([id], |row| row.get::<_, Option<CategoryId>>(0)) {
            Ok(parent_id) => parent_id,
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(error) => return Err(error.into()),
        };
    }

    Ok(false)
}

fn map_constraint_error(error: rusqlite::Error, name: &Name) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidParentCategory,
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let description = row.get(2)?;
    let parent_id = row.get(3)?;
    let raw_line: Option<String> = row.get(4)?;

    let statement_line = raw_line
        .map(|line| {
            StatementLine::from_str(&line)
                .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, error.into()))
        })
        .transpose()?;

    Ok(Category {
        id,
        name: Name::new_unchecked(&raw_name),
        description,
        parent_id,
        statement_line,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            NewCategory, StatementLine, create_category, delete_category, get_all_categories,
            get_category, update_category,
        },
        db::initialize,
        name::Name,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: Name::new_unchecked(name),
            description: String::new(),
            parent_id: None,
            statement_line: None,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let want = NewCategory {
            statement_line: Some(StatementLine::CostOfSales),
            description: "Flour, eggs and milk".to_owned(),
            ..new_category("Ingredients")
        };

        let got = create_category(want.clone(), &connection).expect("Could not create category");

        assert!(got.id > 0);
        assert_eq!(got.name, want.name);
        assert_eq!(got.description, want.description);
        assert_eq!(got.statement_line, Some(StatementLine::CostOfSales));
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        create_category(new_category("Sales"), &connection).unwrap();

        let got = create_category(new_category("Sales"), &connection);

        assert_eq!(got, Err(Error::DuplicateCategoryName("Sales".to_owned())));
    }

    #[test]
    fn create_category_fails_on_missing_parent() {
        let connection = get_test_db_connection();

        let got = create_category(
            NewCategory {
                parent_id: Some(42),
                ..new_category("Orphan")
            },
            &connection,
        );

        assert_eq!(got, Err(Error::InvalidParentCategory));
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_category(999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_is_sorted_by_name() {
        let connection = get_test_db_connection();
        create_category(new_category("Utilities"), &connection).unwrap();
        create_category(new_category("Ingredients"), &connection).unwrap();

        let names = get_all_categories(&connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, ["Ingredients", "Utilities"]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_db_connection();
        let parent = create_category(new_category("Expenses"), &connection).unwrap();
        let category = create_category(new_category("Gas"), &connection).unwrap();

        update_category(
            category.id,
            NewCategory {
                parent_id: Some(parent.id),
                statement_line: Some(StatementLine::OperatingExpense),
                ..new_category("Cooking gas")
            },
            &connection,
        )
        .expect("Could not update category");

        let got = get_category(category.id, &connection).unwrap();
        assert_eq!(got.name.as_ref(), "Cooking gas");
        assert_eq!(got.parent_id, Some(parent.id));
        assert_eq!(got.statement_line, Some(StatementLine::OperatingExpense));
    }

    #[test]
    fn category_cannot_be_its_own_parent() {
        let connection = get_test_db_connection();
        let category = create_category(new_category("Loop"), &connection).unwrap();

        let got = update_category(
            category.id,
            NewCategory {
                parent_id: Some(category.id),
                ..new_category("Loop")
            },
            &connection,
        );

        assert_eq!(got, Err(Error::InvalidParentCategory));
    }

    #[test]
    fn category_cannot_be_moved_under_its_child() {
        let connection = get_test_db_connection();
        let parent = create_category(new_category("Parent"), &connection).unwrap();
        let child = create_category(
            NewCategory {
                parent_id: Some(parent.id),
                ..new_category("Child")
            },
            &connection,
        )
        .unwrap();

        let got = update_category(
            parent.id,
            NewCategory {
                parent_id: Some(child.id),
                ..new_category("Parent")
            },
            &connection,
        );

        assert_eq!(got, Err(Error::InvalidParentCategory));
    }

    #[test]
    fn update_category_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let got = update_category(999, new_category("Missing"), &connection);

        assert_eq!(got, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_category_clears_parent_of_children() {
        let connection = get_test_db_connection();
        let parent = create_category(new_category("Parent"), &connection).unwrap();
        let child = create_category(
            NewCategory {
                parent_id: Some(parent.id),
                ..new_category("Child")
            },
            &connection,
        )
        .unwrap();

        delete_category(parent.id, &connection).expect("Could not delete category");

        assert_eq!(get_category(parent.id, &connection), Err(Error::NotFound));
        assert_eq!(get_category(child.id, &connection).unwrap().parent_id, None);
    }

    #[test]
    fn delete_category_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        assert_eq!(
            delete_category(999, &connection),
            Err(Error::DeleteMissingCategory)
        );
    }
}
