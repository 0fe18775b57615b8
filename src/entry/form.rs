//! The form fields shared by the create and edit entry pages.

use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    card::{CreditCard, get_all_cards},
    category::{Category, get_all_categories},
    database_id::{CardId, CategoryId, SupplierId},
    entry::{EntryKind, LedgerEntry, PaymentMethod},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    supplier::{Supplier, get_all_suppliers},
};

/// The values to pre-fill the entry form with.
pub struct EntryFormDefaults<'a> {
    pub description: Option<&'a str>,
    pub kind: EntryKind,
    pub amount: Option<Decimal>,
    pub date: Date,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub payment_method: Option<PaymentMethod>,
    pub card_id: Option<CardId>,
    pub notes: Option<&'a str>,
}

impl<'a> EntryFormDefaults<'a> {
    /// An empty outflow dated `date`.
    pub fn new(date: Date) -> Self {
        Self {
            description: None,
            kind: EntryKind::Outflow,
            amount: None,
            date,
            category_id: None,
            supplier_id: None,
            payment_method: None,
            card_id: None,
            notes: None,
        }
    }

    /// The values of an existing entry.
    pub fn from_entry(entry: &'a LedgerEntry) -> Self {
        Self {
            description: Some(&entry.description),
            kind: entry.kind,
            amount: Some(entry.amount),
            date: entry.date,
            category_id: entry.category_id,
            supplier_id: entry.supplier_id,
            payment_method: entry.payment_method,
            card_id: entry.card_id,
            notes: Some(&entry.notes),
        }
    }
}

/// The rows the entry form lets the user pick from.
pub struct EntryFormOptions {
    pub categories: Vec<Category>,
    pub suppliers: Vec<Supplier>,
    pub cards: Vec<CreditCard>,
}

impl EntryFormOptions {
    /// Load the options, keeping only active cards plus `selected_card`.
    pub fn load(selected_card: Option<CardId>, connection: &Connection) -> Result<Self, Error> {
        let cards = get_all_cards(connection)?
            .into_iter()
            .filter(|card| card.is_active || Some(card.id) == selected_card)
            .collect();

        Ok(Self {
            categories: get_all_categories(connection)?,
            suppliers: get_all_suppliers(connection)?,
            cards,
        })
    }
}

pub fn entry_form_fields(defaults: &EntryFormDefaults<'_>, options: &EntryFormOptions) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Kind" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for kind in [EntryKind::Outflow, EntryKind::Inflow] {
                    @let id = format!("kind-{}", kind.as_str());

                    div class="flex items-center gap-3"
                    {
                        input
                            name="kind"
                            id=(id)
                            type="radio"
                            value=(kind.as_str())
                            checked[kind == defaults.kind]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
                    }
                }
            }
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    value=[amount_str.as_deref()]
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No category" }

                @for category in &options.categories {
                    option
                        value=(category.id)
                        selected[Some(category.id) == defaults.category_id]
                    {
                        (category.name)
                    }
                }
            }
        }

        div
        {
            label for="supplier_id" class=(FORM_LABEL_STYLE) { "Supplier" }

            select name="supplier_id" id="supplier_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No supplier" }

                @for supplier in &options.suppliers {
                    option
                        value=(supplier.id)
                        selected[Some(supplier.id) == defaults.supplier_id]
                    {
                        (supplier.name)
                    }
                }
            }
        }

        div
        {
            label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment method" }

            select name="payment_method" id="payment_method" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Not specified" }

                @for method in PaymentMethod::ALL {
                    option
                        value=(method.as_str())
                        selected[Some(method) == defaults.payment_method]
                    {
                        (method.label())
                    }
                }
            }
        }

        div
        {
            label for="card_id" class=(FORM_LABEL_STYLE) { "Credit card" }

            select name="card_id" id="card_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No card" }

                @for card in &options.cards {
                    option
                        value=(card.id)
                        selected[Some(card.id) == defaults.card_id]
                    {
                        (card.name)
                    }
                }
            }

            p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
            {
                "Only used when the payment method is credit card."
            }
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            input
                name="notes"
                id="notes"
                type="text"
                placeholder="Optional"
                value=[defaults.notes]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
