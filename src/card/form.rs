//! The form fields shared by the create and edit card pages.

use maud::{Markup, html};

use crate::{
    card::CreditCard,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

pub fn card_form_fields(card: Option<&CreditCard>) -> Markup {
    let name = card.map(|card| card.name.as_ref());
    let total_limit = card.map(|card| format!("{:.2}", card.total_limit));
    let closing_day = card.map(|card| card.closing_day);
    let due_day = card.map(|card| card.due_day);
    let is_active = card.is_none_or(|card| card.is_active);
    let notes = card.map(|card| card.notes.as_str());

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Card Name"
                value=[name]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="total_limit" class=(FORM_LABEL_STYLE) { "Total limit" }

            div class="input-wrapper w-full"
            {
                input
                    id="total_limit"
                    type="number"
                    name="total_limit"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[total_limit]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="closing_day" class=(FORM_LABEL_STYLE) { "Closing day" }

                input
                    id="closing_day"
                    type="number"
                    name="closing_day"
                    min="1"
                    max="31"
                    value=[closing_day]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="due_day" class=(FORM_LABEL_STYLE) { "Due day" }

                input
                    id="due_day"
                    type="number"
                    name="due_day"
                    min="1"
                    max="31"
                    value=[due_day]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div class="flex items-center gap-2"
        {
            input
                id="is_active"
                type="checkbox"
                name="is_active"
                value="true"
                checked[is_active]
                class="h-4 w-4 rounded border-gray-300";

            label for="is_active" class="text-sm font-medium text-gray-900 dark:text-white"
            {
                "Active"
            }
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            input
                id="notes"
                type="text"
                name="notes"
                placeholder="Optional"
                value=[notes]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
