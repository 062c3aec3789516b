//! Form payloads shared by both variants.
//!
//! Every field is optional at the extractor level so that a missing field
//! is reported as a 400 with the field name rather than an extractor
//! rejection.

use serde::Deserialize;
use shopform_types::{ContactDetails, ValidationError};

/// The intake form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeForm {
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub locality: Option<String>,
}

impl IntakeForm {
    /// Validate into [`ContactDetails`], keeping the submitted text as is.
    pub fn into_details(self) -> Result<ContactDetails, ValidationError> {
        let details = ContactDetails {
            name: self.name.unwrap_or_default(),
            mobile_number: self.mobile_number.unwrap_or_default(),
            whatsapp_number: self.whatsapp_number.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            locality: self.locality.unwrap_or_default(),
        };
        details.validate()?;
        Ok(details)
    }
}

/// The store server's classification form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyForm {
    pub user_id: Option<String>,
    pub classification: Option<String>,
}

impl ClassifyForm {
    pub fn user_id(&self) -> Result<i64, ValidationError> {
        let raw = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingField("user_id"))?;
        raw.parse().map_err(|_| ValidationError::Malformed {
            field: "user_id",
            detail: format!("'{raw}' is not an integer"),
        })
    }
}

/// The sheet server's final submission.
///
/// Carries either a `draft_token` (server-held state) or the five intake
/// fields with an optional `request_id` (client-held state).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinalForm {
    pub draft_token: Option<String>,
    pub request_id: Option<String>,
    pub classification: Option<String>,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub locality: Option<String>,
}

impl FinalForm {
    pub fn intake(&self) -> IntakeForm {
        IntakeForm {
            name: self.name.clone(),
            mobile_number: self.mobile_number.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            email: self.email.clone(),
            locality: self.locality.clone(),
        }
    }
}

/// Treat blank hidden inputs as absent.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> IntakeForm {
        IntakeForm {
            name: Some(" A ".into()),
            mobile_number: Some("1".into()),
            whatsapp_number: Some("2".into()),
            email: Some("a@b.com".into()),
            locality: Some("X".into()),
        }
    }

    #[test]
    fn test_into_details_keeps_padding() {
        let details = complete().into_details().expect("valid");
        assert_eq!(details.name, " A ");
        assert_eq!(details.locality, "X");
    }

    #[test]
    fn test_absent_field_is_missing() {
        let form = IntakeForm {
            email: None,
            ..complete()
        };
        assert_eq!(
            form.into_details(),
            Err(ValidationError::MissingField("email"))
        );
    }

    #[test]
    fn test_user_id_parsing() {
        let form = ClassifyForm {
            user_id: Some(" 12 ".into()),
            classification: Some("a".into()),
        };
        assert_eq!(form.user_id(), Ok(12));

        let form = ClassifyForm {
            user_id: Some("twelve".into()),
            classification: None,
        };
        assert!(matches!(
            form.user_id(),
            Err(ValidationError::Malformed { field: "user_id", .. })
        ));

        assert_eq!(
            ClassifyForm::default().user_id(),
            Err(ValidationError::MissingField("user_id"))
        );
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&None), None);
        assert_eq!(non_blank(&Some(" t ".into())), Some("t"));
    }
}
