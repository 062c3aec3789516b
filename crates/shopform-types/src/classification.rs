//! Classification labels and the policy that normalizes operator input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One-letter label assigned to a contact after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    A,
    B,
    C,
}

impl Classification {
    /// All labels, in the order they are offered to the operator.
    pub const ALL: [Classification; 3] = [Classification::A, Classification::B, Classification::C];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::A => "A",
            Classification::B => "B",
            Classification::C => "C",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Classification::A),
            "B" => Ok(Classification::B),
            "C" => Ok(Classification::C),
            other => Err(ValidationError::InvalidClassification(other.to_string())),
        }
    }
}

/// How strictly classification input is checked before it is stored.
///
/// `Lenient` keeps the historical behaviour of the store server: the input
/// is uppercased and stored as-is, so `"z"` becomes `"Z"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    #[default]
    Strict,
    Lenient,
}

impl ClassificationPolicy {
    /// Normalize raw operator input into the value that gets persisted.
    pub fn normalize(self, input: &str) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("classification"));
        }
        match self {
            ClassificationPolicy::Strict => {
                trimmed.parse::<Classification>().map(|c| c.as_str().to_string())
            }
            ClassificationPolicy::Lenient => Ok(trimmed.to_uppercase()),
        }
    }
}
