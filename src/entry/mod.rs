//! Ledger entries: the inflows and outflows of money and their effect on card limits.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod ledger;
mod list;

pub use create::{create_entry_endpoint, get_new_entry_page};
pub use db::{
    create_entry, create_entry_table, delete_entry, get_all_entries, get_card_entries,
    get_entries_between, get_entry, get_recent_entries, update_entry,
};
pub use delete::delete_entry_endpoint;
pub use domain::{EntryFormData, EntryKind, LedgerEntry, NewEntry, PaymentMethod};
pub use edit::{get_edit_entry_page, update_entry_endpoint};
pub use ledger::{apply_entry_create, apply_entry_delete, apply_entry_update, reset_statement};
pub use list::get_entries_page;
