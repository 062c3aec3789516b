//! Contact structures collected by the intake form.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The five required fields submitted on the intake form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub mobile_number: String,
    pub whatsapp_number: String,
    pub email: String,
    pub locality: String,
}

/// A persisted contact (store server only).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: i64,
    #[serde(flatten)]
    pub details: ContactDetails,
    /// Empty until the operator classifies the record.
    pub classification: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl ContactDetails {
    /// Field names paired with their values, in form order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("name", &self.name),
            ("mobile_number", &self.mobile_number),
            ("whatsapp_number", &self.whatsapp_number),
            ("email", &self.email),
            ("locality", &self.locality),
        ]
    }

    /// Every field must contain something other than whitespace.
    ///
    /// Reports the first missing field by its form name. Values are
    /// checked, never rewritten.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Spreadsheet row in column order (see [`crate::SHEET_COLUMNS`]).
    pub fn to_row(&self, classification: &str) -> Vec<String> {
        let mut row: Vec<String> = self.fields().iter().map(|(_, v)| v.to_string()).collect();
        row.push(classification.to_string());
        row
    }
}
