//! Suppliers that outflows can be attributed to.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_supplier_endpoint, get_new_supplier_page};
pub use db::{
    create_supplier, create_supplier_table, delete_supplier, get_all_suppliers, get_supplier,
    update_supplier,
};
pub use delete::delete_supplier_endpoint;
pub use domain::{MAX_TAX_ID_LENGTH, NewSupplier, Supplier, SupplierFormData, TaxId};
pub use edit::{get_edit_supplier_page, update_supplier_endpoint};
pub use list::get_suppliers_page;
