use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationErrors;
use crate::models::intake_models::{IntakeSession, Step};

#[derive(Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

/// What the browser gets back after every call: enough to render the
/// current step. CRM ids and the enrichment handle stay on the server.
///
/// Handlers hold the session lock for a whole step, so `is_loading` is
/// always false here. The browser keeps its own flag while a request is
/// in flight.
#[derive(Debug, Serialize)]
pub struct IntakeView {
    pub session_id: Uuid,
    pub step: Step,
    pub email: String,
    pub full_name: String,
    pub company_name: String,
    pub company_domain: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub field_errors: ValidationErrors,
    pub contact_name: String,
}

impl IntakeView {
    pub fn new(session_id: Uuid, session: &IntakeSession, field_errors: ValidationErrors) -> Self {
        Self {
            session_id,
            step: session.step,
            email: session.email.clone(),
            full_name: session.full_name.clone(),
            company_name: session.company_name.clone(),
            company_domain: session.company_domain.clone(),
            is_loading: session.is_loading,
            error: session.error.clone(),
            field_errors,
            contact_name: session.contact_name(),
        }
    }
}
