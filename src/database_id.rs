//! Type aliases for the integer primary keys of each table.

/// A SQLite row ID.
pub type DatabaseId = i64;

/// The ID of a row in the `ledger_entry` table.
pub type EntryId = DatabaseId;

/// The ID of a row in the `category` table.
pub type CategoryId = DatabaseId;

/// The ID of a row in the `supplier` table.
pub type SupplierId = DatabaseId;

/// The ID of a row in the `savings_jar` table.
pub type JarId = DatabaseId;

/// The ID of a row in the `credit_card` table.
pub type CardId = DatabaseId;
