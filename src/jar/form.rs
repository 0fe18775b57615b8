//! The form fields shared by the create and edit savings jar pages.

use maud::{Markup, html};

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    jar::SavingsJar,
};

pub fn jar_form_fields(jar: Option<&SavingsJar>) -> Markup {
    let name = jar.map(|jar| jar.name.as_ref());
    let purpose = jar.map(|jar| jar.purpose.as_str());
    let target = jar.map(|jar| format!("{:.2}", jar.target));

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Jar Name"
                value=[name]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="purpose" class=(FORM_LABEL_STYLE) { "Purpose" }

            input
                id="purpose"
                type="text"
                name="purpose"
                placeholder="What the money is for"
                value=[purpose]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="target" class=(FORM_LABEL_STYLE) { "Target" }

            div class="input-wrapper w-full"
            {
                input
                    id="target"
                    type="number"
                    name="target"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[target]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}
