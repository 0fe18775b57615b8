//! Categories for grouping ledger entries and mapping them onto the income statement.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    count_entries_per_category, create_category, create_category_table, delete_category,
    get_all_categories, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryFormData, NewCategory, StatementLine, effective_statement_line};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
