//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
        Category, CategoryFormData, NewCategory, create_category,
        form::{CategoryFormDefaults, category_form_fields},
        get_all_categories,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page(
    State(state): State<CreateCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(new_category_view(&categories).into_response())
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
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

    match create_category(category, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::DuplicateCategoryName(_) | Error::InvalidParentCategory)) => {
            tracing::warn!("Could not create category: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");
            error.into_alert_response()
        }
    }
}

fn new_category_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_CATEGORY)
                hx-target-error="#alert-container"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                (category_form_fields(&CategoryFormDefaults::default(), categories))

                (submit_button("Create Category"))
            }
        }
    };

    base("Create Category", &[], &content)
}

#[cfg(test)]
mod new_category_page_tests {
    use axum::{extract::State, http::StatusCode};

    use crate::{
        category::{create::CreateCategoryState, get_new_category_page},
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_select,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_valid_html,
            get_test_connection_mutex, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let state = CreateCategoryState {
            db_connection: get_test_connection_mutex(),
        };

        let response = get_new_category_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CATEGORY, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_select(&form, "parent_id", &["None"]);
        assert_form_submit_button_with_text(&form, "Create Category");
    }
}
