//! Credit cards, their limits and statement cycles.

mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod form;
mod list;
mod reset;

pub use create::{create_card_endpoint, get_new_card_page};
pub(crate) use db::save_available_limit;
pub use db::{
    create_card, create_card_table, delete_card, get_all_cards, get_card, total_available_limit,
    update_card,
};
pub use delete::delete_card_endpoint;
pub use detail::get_card_page;
pub use domain::{CardFormData, CreditCard, NewCard};
pub use edit::{get_edit_card_page, update_card_endpoint};
pub use list::get_cards_page;
pub use reset::reset_card_endpoint;
