use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type FieldErrors = BTreeMap<String, String>;

pub const STEP_LABELS: [(u8, &str); 3] = [(1, "Email"), (2, "Details"), (3, "Done")];

/// Session view as returned by every `/api/intake` call.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IntakeView {
    pub session_id: String,
    pub step: u8,
    pub email: String,
    pub full_name: String,
    pub company_name: String,
    pub company_domain: String,
    pub is_loading: bool,
    pub error: Option<String>,
    #[serde(default)]
    pub field_errors: FieldErrors,
    pub contact_name: String,
}

#[derive(Serialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetailsRequest {
    pub full_name: String,
    pub company_name: String,
    pub company_domain: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

pub fn step_status(step_number: u8, current_step: u8) -> StepStatus {
    if step_number < current_step {
        StepStatus::Completed
    } else if step_number == current_step {
        StepStatus::Current
    } else {
        StepStatus::Upcoming
    }
}

/// What the form renders. Mirrors the server session, except that going
/// back is handled here without a request.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    pub session_id: Option<String>,
    pub step: u8,
    pub email: String,
    pub details: DetailsRequest,
    pub is_loading: bool,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    pub contact_name: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            session_id: None,
            step: 1,
            email: String::new(),
            details: DetailsRequest::default(),
            is_loading: false,
            error: None,
            field_errors: FieldErrors::new(),
            contact_name: "there".to_string(),
        }
    }
}

impl FormState {
    pub fn loading(&self) -> Self {
        Self {
            is_loading: true,
            error: None,
            field_errors: FieldErrors::new(),
            ..self.clone()
        }
    }

    /// Server fields win, but typed-in details survive a step-one response
    /// where the server has none yet.
    pub fn with_view(&self, view: IntakeView) -> Self {
        let keep = |server: String, local: &str| {
            if server.is_empty() {
                local.to_string()
            } else {
                server
            }
        };
        Self {
            session_id: Some(view.session_id),
            step: view.step.clamp(1, 3),
            email: keep(view.email, &self.email),
            details: DetailsRequest {
                full_name: keep(view.full_name, &self.details.full_name),
                company_name: keep(view.company_name, &self.details.company_name),
                company_domain: keep(view.company_domain, &self.details.company_domain),
            },
            is_loading: false,
            error: view.error,
            field_errors: view.field_errors,
            contact_name: view.contact_name,
        }
    }

    pub fn with_error(&self, message: String) -> Self {
        Self {
            is_loading: false,
            error: Some(message),
            ..self.clone()
        }
    }

    pub fn back(&self) -> Self {
        Self {
            step: self.step.saturating_sub(1).max(1),
            error: None,
            field_errors: FieldErrors::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(step: u8) -> IntakeView {
        IntakeView {
            session_id: "abc".to_string(),
            step,
            email: "jane@acme.com".to_string(),
            full_name: String::new(),
            company_name: String::new(),
            company_domain: String::new(),
            is_loading: false,
            error: None,
            field_errors: FieldErrors::new(),
            contact_name: "there".to_string(),
        }
    }

    #[test]
    fn progress_marks_earlier_steps_completed() {
        assert_eq!(step_status(1, 2), StepStatus::Completed);
        assert_eq!(step_status(2, 2), StepStatus::Current);
        assert_eq!(step_status(3, 2), StepStatus::Upcoming);
        let labels: Vec<&str> = STEP_LABELS.iter().map(|(_, label)| *label).collect();
        assert_eq!(labels, vec!["Email", "Details", "Done"]);
    }

    #[test]
    fn back_keeps_typed_details() {
        let mut state = FormState::default().with_view(view(2));
        state.details.full_name = "Jane Doe".to_string();
        state.error = Some("Failed to update contact details. Please try again.".to_string());

        let back = state.back();
        assert_eq!(back.step, 1);
        assert_eq!(back.details.full_name, "Jane Doe");
        assert_eq!(back.error, None);
        assert_eq!(back.back().step, 1);
    }

    #[test]
    fn server_view_keeps_local_details_when_blank() {
        let mut state = FormState::default();
        state.details.company_name = "Acme".to_string();
        let next = state.loading().with_view(view(2));
        assert_eq!(next.step, 2);
        assert_eq!(next.session_id.as_deref(), Some("abc"));
        assert_eq!(next.details.company_name, "Acme");
        assert!(!next.is_loading);
    }

    #[test]
    fn view_parses_with_missing_field_errors() {
        let json = r#"{"session_id":"abc","step":3,"email":"jane@acme.com","full_name":"Jane Doe",
            "company_name":"Acme","company_domain":"acme.com","is_loading":false,"error":null,
            "contact_name":"Jane"}"#;
        let parsed: IntakeView = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.step, 3);
        assert!(parsed.field_errors.is_empty());
        assert_eq!(parsed.contact_name, "Jane");
    }
}
