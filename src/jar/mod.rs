//! Savings jars and the transfers that fund them.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod transfer;
mod transfer_page;

pub use create::{create_jar_endpoint, get_new_jar_page};
pub use db::{create_jar, create_jar_table, delete_jar, get_all_jars, get_jar, update_jar};
pub use delete::delete_jar_endpoint;
pub use domain::{JarFormData, NewJar, SavingsJar, TransferFormData};
pub use edit::{get_edit_jar_page, update_jar_endpoint};
pub(crate) use list::progress_bar;
pub use list::get_jars_page;
pub use transfer::{current_cash_balance, transfer_to_jar};
pub use transfer_page::{get_jar_transfer_page, jar_transfer_endpoint};
