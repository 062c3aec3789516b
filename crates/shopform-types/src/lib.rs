//! # shopform-types
//!
//! Shared domain types for the Shopform services: the contact record
//! collected by both the store and the sheet server, and the A/B/C
//! classification an operator assigns to it.

pub mod classification;
pub mod contact;

pub use classification::{Classification, ClassificationPolicy};
pub use contact::{ContactDetails, ContactRecord};

/// Validation failures raised at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field required: {0}")]
    MissingField(&'static str),

    #[error("invalid classification '{0}': expected one of A, B, C")]
    InvalidClassification(String),

    #[error("invalid {field}: {detail}")]
    Malformed {
        field: &'static str,
        detail: String,
    },
}

/// Column headers of the spreadsheet, in append order.
pub const SHEET_COLUMNS: [&str; 6] = [
    "name",
    "mobile_number",
    "whatsapp_number",
    "email",
    "locality",
    "classification",
];
