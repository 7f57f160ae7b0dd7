use serde::Serialize;
use std::collections::BTreeMap;

/// Failures of CRM calls that stop the form from advancing. The display
/// text is what the visitor sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to create contact. Please try again.")]
    CreateContact,
    #[error("Failed to update contact details. Please try again.")]
    UpdateContact,
    #[error("Failed to create or update company. Please try again.")]
    UpsertCompany,
}

/// Per-field validation messages, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("some fields are invalid")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Remote(#[from] GatewayError),
    #[error("Contact ID not found. Please start over.")]
    MissingLead,
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        FormError::Validation(errors)
    }
}
