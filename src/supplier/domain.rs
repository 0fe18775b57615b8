//! Core supplier domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::SupplierId, name::Name};

/// The longest tax ID accepted, the length of a company registration number.
pub const MAX_TAX_ID_LENGTH: usize = 14;

/// A validated tax registration number made of at most 14 digits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TaxId(String);

impl TaxId {
    /// Create a tax ID.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTaxId] if `tax_id` is empty, contains anything
    /// other than ASCII digits or is longer than [MAX_TAX_ID_LENGTH].
    pub fn new(tax_id: &str) -> Result<Self, Error> {
        let tax_id = tax_id.trim();

        if tax_id.is_empty()
            || tax_id.len() > MAX_TAX_ID_LENGTH
            || !tax_id.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(Error::InvalidTaxId(tax_id.to_owned()));
        }

        Ok(Self(tax_id.to_owned()))
    }

    /// Create a tax ID without validation, e.g. when reading from the database.
    pub fn new_unchecked(tax_id: &str) -> Self {
        Self(tax_id.to_owned())
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A business the organization buys from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: Name,
    pub tax_id: Option<TaxId>,
    pub contact: String,
}

/// The validated fields for creating or updating a supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    /// The supplier's trading name.
    pub name: Name,
    /// The supplier's registration number, unique if given.
    pub tax_id: Option<TaxId>,
    /// Phone number, e-mail or whatever is used to reach the supplier.
    pub contact: String,
}

/// Form data for supplier creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SupplierFormData {
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub contact: String,
}

impl TryFrom<SupplierFormData> for NewSupplier {
    type Error = Error;

    fn try_from(form: SupplierFormData) -> Result<Self, Self::Error> {
        let tax_id = form
            .tax_id
            .as_deref()
            .map(str::trim)
            .filter(|tax_id| !tax_id.is_empty())
            .map(TaxId::new)
            .transpose()?;

        Ok(NewSupplier {
            name: Name::new(&form.name)?,
            tax_id,
            contact: form.contact.trim().to_owned(),
        })
    }
}
