//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryFormData, NewCategory,
        form::{CategoryFormDefaults, category_form_fields},
        get_all_categories, get_category, update_category,
    },
    database_id::CategoryId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let category = match get_category(category_id, &connection) {
        Ok(category) => Some(category),
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!("Failed to retrieve category {category_id}: {error}");
            return Err(error);
        }
    };

    Ok(edit_category_view(category_id, category.as_ref(), &categories).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let category = match NewCategory::try_from(form) {
        Ok(category) => category,
        Err(error) => {
            tracing::warn!("Rejected invalid category: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_category(category_id, category, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::UpdateMissingCategory
            | Error::DuplicateCategoryName(_)
            | Error::InvalidParentCategory),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_category_view(
    category_id: CategoryId,
    category: Option<&Category>,
    categories: &[Category],
) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let defaults = match category {
        Some(category) => CategoryFormDefaults {
            name: category.name.as_ref(),
            description: &category.description,
            parent_id: category.parent_id,
            statement_line: category.statement_line,
            editing_id: Some(category_id),
        },
        None => CategoryFormDefaults {
            editing_id: Some(category_id),
            ..Default::default()
        },
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                @if category.is_none() {
                    p class="text-red-600 dark:text-red-400" { "Category not found" }
                }

                (category_form_fields(&defaults, categories))

                (submit_button("Update Category"))
            }
        }
    };

    base("Edit Category", &[], &content)
}
