//! The form fields shared by the create and edit category pages.

use maud::{Markup, html};

use crate::{
    category::{Category, StatementLine},
    database_id::CategoryId,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The values to pre-fill the category form with.
#[derive(Default)]
pub struct CategoryFormDefaults<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parent_id: Option<CategoryId>,
    pub statement_line: Option<StatementLine>,
    /// The category being edited, which cannot be picked as its own parent.
    pub editing_id: Option<CategoryId>,
}

pub fn category_form_fields(
    defaults: &CategoryFormDefaults<'_>,
    available_parents: &[Category],
) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Category Name"
                value=(defaults.name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                id="description"
                type="text"
                name="description"
                placeholder="Optional"
                value=(defaults.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="parent_id" class=(FORM_LABEL_STYLE) { "Parent category" }

            select
                name="parent_id"
                id="parent_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "None" }

                @for category in available_parents {
                    @if Some(category.id) != defaults.editing_id {
                        option
                            value=(category.id)
                            selected[Some(category.id) == defaults.parent_id]
                        {
                            (category.name)
                        }
                    }
                }
            }
        }

        div
        {
            label for="statement_line" class=(FORM_LABEL_STYLE) { "Income statement line" }

            select
                name="statement_line"
                id="statement_line"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Same as parent" }

                @for line in StatementLine::ALL {
                    option
                        value=(line.as_str())
                        selected[Some(line) == defaults.statement_line]
                    {
                        (line.label())
                    }
                }
            }
        }
    }
}
