//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;

use crate::{
    alert::Alert, html::format_currency, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A credit card purchase is larger than what is left on the card.
    ///
    /// Nothing is written when this error is returned, the entry and the card
    /// are left exactly as they were.
    #[error("insufficient credit limit: requested {requested}, available {available}")]
    InsufficientLimit {
        /// The amount the entry tried to charge to the card.
        requested: Decimal,
        /// The limit that was left on the card at the time of the charge.
        available: Decimal,
    },

    /// A card was given for a payment method other than credit card, or the
    /// payment method is credit card but no card was given.
    #[error("a card must be chosen if and only if the payment method is credit card")]
    InconsistentPaymentMethod,

    /// The statement cut-off day is not a valid day of the month.
    #[error("{0} is not a valid cut-off day, expected a day between 1 and 31")]
    InvalidCutoffDay(u8),

    /// Money amounts must be positive, at most 99,999,999.99 and have at most two decimal places.
    #[error(
        "the amount {0} must be greater than zero and at most 99999999.99 with at most two decimal places"
    )]
    InvalidAmount(Decimal),

    /// An empty string was used for a name.
    #[error("Name cannot be empty")]
    EmptyName,

    /// A supplier tax ID must only contain digits and be at most 14 digits long.
    #[error("the tax ID \"{0}\" must only contain digits and be at most 14 digits long")]
    InvalidTaxId(String),

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// The specified tax ID already belongs to another supplier.
    #[error("a supplier with the tax ID \"{0}\" already exists in the database")]
    DuplicateTaxId(String),

    /// A category was set as its own parent, or the parent does not exist.
    #[error("the parent category is not valid")]
    InvalidParentCategory,

    /// A category, supplier, savings jar or card ID did not refer to a row in
    /// the database.
    #[error("the entry refers to a category, supplier, savings jar or card that does not exist")]
    InvalidReference,

    /// A transfer to a savings jar is larger than the current cash balance.
    #[error("insufficient cash balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// The amount to transfer.
        requested: Decimal,
        /// The cash balance at the time of the transfer.
        available: Decimal,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a ledger entry that does not exist
    #[error("tried to update a ledger entry that is not in the database")]
    UpdateMissingEntry,

    /// Tried to delete a ledger entry that does not exist
    #[error("tried to delete a ledger entry that is not in the database")]
    DeleteMissingEntry,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a supplier that does not exist
    #[error("tried to update a supplier that is not in the database")]
    UpdateMissingSupplier,

    /// Tried to delete a supplier that does not exist
    #[error("tried to delete a supplier that is not in the database")]
    DeleteMissingSupplier,

    /// Tried to update a savings jar that does not exist
    #[error("tried to update a savings jar that is not in the database")]
    UpdateMissingJar,

    /// Tried to delete a savings jar that does not exist
    #[error("tried to delete a savings jar that is not in the database")]
    DeleteMissingJar,

    /// Tried to update a credit card that does not exist
    #[error("tried to update a credit card that is not in the database")]
    UpdateMissingCard,

    /// Tried to delete a credit card that does not exist
    #[error("tried to delete a credit card that is not in the database")]
    DeleteMissingCard,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidReference,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InsufficientLimit {
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Insufficient credit limit".to_owned(),
                    details: format!(
                        "The card only has {} available, which is not enough for {}. \
                        Reduce the amount, choose another card or reset the card's statement.",
                        format_currency(available),
                        format_currency(requested)
                    ),
                },
            ),
            Error::InconsistentPaymentMethod => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid payment method".to_owned(),
                    details: "Choose a card when paying by credit card, and leave the card \
                        empty for every other payment method."
                        .to_owned(),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "{amount} is not a valid amount. \
                        Amounts must be greater than zero, no more than 99,999,999.99 \
                        and have at most two decimal places."
                    ),
                },
            ),
            Error::InsufficientBalance {
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Insufficient balance".to_owned(),
                    details: format!(
                        "The cash balance is {}, which is not enough to transfer {}.",
                        format_currency(available),
                        format_currency(requested)
                    ),
                },
            ),
            Error::InvalidCutoffDay(day) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid day of the month".to_owned(),
                    details: format!("{day} is not a day of the month, choose a day from 1 to 31."),
                },
            ),
            Error::EmptyName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Name cannot be empty".to_owned(),
                    details: "Enter a name and try again.".to_owned(),
                },
            ),
            Error::InvalidTaxId(tax_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid tax ID".to_owned(),
                    details: format!(
                        "\"{tax_id}\" is not a valid tax ID. Use up to 14 digits, without punctuation."
                    ),
                },
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Category Name".to_owned(),
                    details: format!(
                        "The category {name} already exists in the database. \
                        Choose a different name, or edit the existing category.",
                    ),
                },
            ),
            Error::DuplicateTaxId(tax_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Tax ID".to_owned(),
                    details: format!(
                        "A supplier with the tax ID {tax_id} already exists in the database."
                    ),
                },
            ),
            Error::InvalidParentCategory => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid parent category".to_owned(),
                    details: "A category cannot be its own parent, choose another category."
                        .to_owned(),
                },
            ),
            Error::InvalidReference => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid selection".to_owned(),
                    details: "The chosen category, supplier, savings jar or card no longer \
                        exists. Refresh the page and try again."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingEntry => missing("Could not update entry", "entry", false),
            Error::DeleteMissingEntry => missing("Could not delete entry", "entry", true),
            Error::UpdateMissingCategory => missing("Could not update category", "category", false),
            Error::DeleteMissingCategory => missing("Could not delete category", "category", true),
            Error::UpdateMissingSupplier => missing("Could not update supplier", "supplier", false),
            Error::DeleteMissingSupplier => missing("Could not delete supplier", "supplier", true),
            Error::UpdateMissingJar => missing("Could not update savings jar", "savings jar", false),
            Error::DeleteMissingJar => missing("Could not delete savings jar", "savings jar", true),
            Error::UpdateMissingCard => missing("Could not update card", "card", false),
            Error::DeleteMissingCard => missing("Could not delete card", "card", true),
            Error::NotFound => missing("Not found", "item", false),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

fn missing(message: &str, item: &str, is_delete: bool) -> (StatusCode, Alert) {
    let details = if is_delete {
        format!(
            "The {item} could not be found. \
            Try refreshing the page to see if the {item} has already been deleted."
        )
    } else {
        format!("The {item} could not be found.")
    };

    (
        StatusCode::NOT_FOUND,
        Alert::Error {
            message: message.to_owned(),
            details,
        },
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        let errors = [
            Error::InsufficientLimit {
                requested: dec!(10),
                available: dec!(5),
            },
            Error::InconsistentPaymentMethod,
            Error::InvalidAmount(dec!(-1)),
        ];

        for error in errors {
            let response = error.into_alert_response();

            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn missing_delete_is_not_found() {
        let response = Error::DeleteMissingCard.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
