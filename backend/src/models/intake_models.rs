use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::task::JoinHandle;

/// HubSpot record id of a contact (a lead).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// HubSpot record id of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile fields written onto a contact in step two.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactDetails {
    pub email: String,
    pub full_name: String, // split into firstname/lastname by the gateway
    pub company: String,
    pub company_domain: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyData {
    pub name: String,
    pub domain: String,
}

/// What the model thinks of a lead. Serialized with camelCase keys since the
/// JSON form is written verbatim onto the CRM records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub fit_score: u8,
    pub service_recommendations: Vec<String>,
    pub key_opportunities: Vec<String>,
    pub concerns: Vec<String>,
    pub engagement_approach: String,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

impl FitReport {
    /// Report used whenever automated analysis can't produce one.
    pub fn fallback(generated_at: DateTime<Utc>) -> Self {
        Self {
            fit_score: 5,
            service_recommendations: vec!["Manual review needed".to_string()],
            key_opportunities: vec!["Follow up for detailed discovery".to_string()],
            concerns: vec!["Automated analysis unavailable".to_string()],
            engagement_approach: "Standard outreach process".to_string(),
            summary: "Automated enrichment failed. Manual review recommended.".to_string(),
            generated_at,
        }
    }
}

/// Cursor of the three-step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    Email,
    Details,
    Done,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Email => 1,
            Step::Details => 2,
            Step::Done => 3,
        }
    }

    /// One step back, never before the first.
    pub fn previous(self) -> Step {
        match self {
            Step::Email | Step::Details => Step::Email,
            Step::Done => Step::Details,
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Step::Email),
            2 => Ok(Step::Details),
            3 => Ok(Step::Done),
            other => Err(format!("no such step: {}", other)),
        }
    }
}

/// Raw step-two input as typed by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsInput {
    pub full_name: String,
    pub company_name: String,
    pub company_domain: String,
}

/// One visitor's progress through the form. Lives only in memory.
#[derive(Debug)]
pub struct IntakeSession {
    pub email: String,
    pub full_name: String,
    pub company_name: String,
    pub company_domain: String,
    pub step: Step,
    pub is_loading: bool,
    pub error: Option<String>,
    pub lead_id: Option<LeadId>,
    pub org_id: Option<OrgId>,
    pub enrichment_task: Option<JoinHandle<Option<FitReport>>>,
    pub last_active: DateTime<Utc>,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self {
            email: String::new(),
            full_name: String::new(),
            company_name: String::new(),
            company_domain: String::new(),
            step: Step::Email,
            is_loading: false,
            error: None,
            lead_id: None,
            org_id: None,
            enrichment_task: None,
            last_active: Utc::now(),
        }
    }
}

impl IntakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Name used on the confirmation screen.
    pub fn contact_name(&self) -> String {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or("there")
            .to_string()
    }
}
