//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/cards/{card_id}', use [format_endpoint].

/// The root route which redirects to the home page.
pub const ROOT: &str = "/";
/// The landing page with totals, recent entries and savings jars.
pub const HOME_VIEW: &str = "/home";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The page listing the ledger entries.
pub const ENTRIES_VIEW: &str = "/entries";
/// The page for recording a new ledger entry.
pub const NEW_ENTRY_VIEW: &str = "/entries/new";
/// The page for editing a ledger entry.
pub const EDIT_ENTRY_VIEW: &str = "/entries/{entry_id}/edit";
/// The route to create a ledger entry.
pub const POST_ENTRY: &str = "/api/entries";
/// The route to update a ledger entry.
pub const PUT_ENTRY: &str = "/api/entries/{entry_id}";
/// The route to delete a ledger entry.
pub const DELETE_ENTRY: &str = "/api/entries/{entry_id}";

/// The page listing the categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing a category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";

/// The page listing the suppliers.
pub const SUPPLIERS_VIEW: &str = "/suppliers";
/// The page for registering a new supplier.
pub const NEW_SUPPLIER_VIEW: &str = "/suppliers/new";
/// The page for editing a supplier.
pub const EDIT_SUPPLIER_VIEW: &str = "/suppliers/{supplier_id}/edit";
/// The route to create a supplier.
pub const POST_SUPPLIER: &str = "/api/suppliers";
/// The route to update a supplier.
pub const PUT_SUPPLIER: &str = "/api/suppliers/{supplier_id}";
/// The route to delete a supplier.
pub const DELETE_SUPPLIER: &str = "/api/suppliers/{supplier_id}";

/// The page listing the savings jars.
pub const JARS_VIEW: &str = "/jars";
/// The page for creating a new savings jar.
pub const NEW_JAR_VIEW: &str = "/jars/new";
/// The page for editing a savings jar.
pub const EDIT_JAR_VIEW: &str = "/jars/{jar_id}/edit";
/// The page for moving cash into a savings jar.
pub const JAR_TRANSFER_VIEW: &str = "/jars/transfer";
/// The route to create a savings jar.
pub const POST_JAR: &str = "/api/jars";
/// The route to update a savings jar.
pub const PUT_JAR: &str = "/api/jars/{jar_id}";
/// The route to delete a savings jar.
pub const DELETE_JAR: &str = "/api/jars/{jar_id}";
/// The route to move cash into a savings jar.
pub const POST_JAR_TRANSFER: &str = "/api/jars/transfer";

/// The page listing the credit cards.
pub const CARDS_VIEW: &str = "/cards";
/// The page for registering a new credit card.
pub const NEW_CARD_VIEW: &str = "/cards/new";
/// The page showing a card's limits and current statement.
pub const CARD_VIEW: &str = "/cards/{card_id}";
/// The page for editing a credit card.
pub const EDIT_CARD_VIEW: &str = "/cards/{card_id}/edit";
/// The route to create a credit card.
pub const POST_CARD: &str = "/api/cards";
/// The route to update a credit card.
pub const PUT_CARD: &str = "/api/cards/{card_id}";
/// The route to delete a credit card.
pub const DELETE_CARD: &str = "/api/cards/{card_id}";
/// The route to restore a card's full limit after its statement was paid.
pub const RESET_CARD: &str = "/api/cards/{card_id}/reset";

/// The cash-flow report for a date range.
pub const CASH_FLOW_REPORT_VIEW: &str = "/reports/cash-flow";
/// The income statement (DRE) for a date range.
pub const DRE_REPORT_VIEW: &str = "/reports/dre";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/cards/{card_id}', '{card_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
