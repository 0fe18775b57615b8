//! Categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, count_entries_per_category, domain::effective_statement_line,
        get_all_categories,
    },
    endpoints,
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A category with the details shown in its table row.
struct CategoryRow<'a> {
    category: &'a Category,
    parent_name: Option<&'a str>,
    statement_line: Option<&'static str>,
    entry_count: u32,
}

/// Render the categories listing page with entry counts.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let entries_per_category = count_entries_per_category(&connection)
        .inspect_err(|error| tracing::error!("Could not count entries per category: {error}"))?;

    let rows = categories
        .iter()
        .map(|category| CategoryRow {
            category,
            parent_name: category.parent_id.and_then(|parent_id| {
                categories
                    .iter()
                    .find(|parent| parent.id == parent_id)
                    .map(|parent| parent.name.as_ref())
            }),
            statement_line: effective_statement_line(category, &categories)
                .map(|line| line.label()),
            entry_count: entries_per_category
                .get(&category.id)
                .copied()
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&rows).into_response())
}

fn categories_view(rows: &[CategoryRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |row: &CategoryRow| {
        let id = row.category.id;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This will remove it from {} entries.",
            row.category.name, row.entry_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (row.category.name) }

                    @if !row.category.description.is_empty() {
                        p class="mt-1 text-xs" { (row.category.description) }
                    }
                }
                td class=(TABLE_CELL_STYLE) { (row.parent_name.unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE) { (row.statement_line.unwrap_or("Unclassified")) }
                td class=(TABLE_CELL_STYLE) { (row.entry_count) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Parent" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Statement line" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Entries" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories created yet. "
                                        a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};

    use crate::{
        category::{NewCategory, StatementLine, create_category, get_categories_page},
        name::Name,
        test_utils::{
            assert_valid_html, count_elements, get_test_connection_mutex, must_get_text,
            parse_html_document,
        },
    };

    use super::CategoriesPageState;

    #[tokio::test]
    async fn lists_categories_with_inherited_statement_line() {
        let state = CategoriesPageState {
            db_connection: get_test_connection_mutex(),
        };
        {
            let connection = state.db_connection.lock().unwrap();
            let parent = create_category(
                NewCategory {
                    name: Name::new_unchecked("Costs"),
                    description: String::new(),
                    parent_id: None,
                    statement_line: Some(StatementLine::CostOfSales),
                },
                &connection,
            )
            .unwrap();
            create_category(
                NewCategory {
                    name: Name::new_unchecked("Ingredients"),
                    description: String::new(),
                    parent_id: Some(parent.id),
                    statement_line: None,
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_categories_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count_elements(&html, "tbody tr"), 2);
        assert_eq!(
            must_get_text(&html, "tbody tr:nth-child(2) td:nth-child(3)"),
            "Cost of sales"
        );
    }

    #[tokio::test]
    async fn shows_prompt_when_empty() {
        let state = CategoriesPageState {
            db_connection: get_test_connection_mutex(),
        };

        let response = get_categories_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert!(must_get_text(&html, "tbody").contains("No categories created yet."));
    }
}
