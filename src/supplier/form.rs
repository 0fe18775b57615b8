//! The form fields shared by the create and edit supplier pages.

use maud::{Markup, html};

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    supplier::{MAX_TAX_ID_LENGTH, Supplier},
};

pub fn supplier_form_fields(supplier: Option<&Supplier>) -> Markup {
    let name = supplier.map(|supplier| supplier.name.as_ref());
    let tax_id = supplier.and_then(|supplier| supplier.tax_id.as_ref().map(AsRef::as_ref));
    let contact = supplier.map(|supplier| supplier.contact.as_str());

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Supplier Name"
                value=[name]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="tax_id" class=(FORM_LABEL_STYLE) { "Tax ID" }

            input
                id="tax_id"
                type="text"
                name="tax_id"
                inputmode="numeric"
                pattern="[0-9]*"
                maxlength=(MAX_TAX_ID_LENGTH)
                placeholder="Digits only"
                value=[tax_id]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="contact" class=(FORM_LABEL_STYLE) { "Contact" }

            input
                id="contact"
                type="text"
                name="contact"
                placeholder="Phone or email"
                value=[contact]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
