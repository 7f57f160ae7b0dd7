use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::enrichment::EnrichmentGateway;
use crate::api::hubspot_companies::CompanyGateway;
use crate::api::hubspot_contacts::ContactGateway;
use crate::error::FormError;
use crate::models::intake_models::{
    CompanyData, ContactDetails, DetailsInput, FitReport, IntakeSession, LeadId, OrgId, Step,
};
use crate::utils::validation::{validate_details_step, validate_email_step};

/// Drives an [`IntakeSession`] through email → details → done, calling the
/// CRM and model gateways in order. Only the step handlers mutate a session.
#[derive(Clone)]
pub struct IntakeFlow {
    contacts: Arc<dyn ContactGateway>,
    companies: Arc<dyn CompanyGateway>,
    enrichment: Arc<dyn EnrichmentGateway>,
}

impl IntakeFlow {
    pub fn new(
        contacts: Arc<dyn ContactGateway>,
        companies: Arc<dyn CompanyGateway>,
        enrichment: Arc<dyn EnrichmentGateway>,
    ) -> Self {
        Self {
            contacts,
            companies,
            enrichment,
        }
    }

    /// Step one: create (or find) the contact for this email.
    pub async fn submit_email(&self, session: &mut IntakeSession, raw_email: &str) -> Result<(), FormError> {
        let email = validate_email_step(raw_email)?;

        session.is_loading = true;
        session.error = None;

        match self.contacts.create_contact(&email).await {
            Ok(lead_id) => {
                tracing::info!("Intake step one done for lead {}", lead_id);
                session.email = email;
                session.lead_id = Some(lead_id);
                session.step = Step::Details;
                session.is_loading = false;
                Ok(())
            }
            Err(e) => {
                session.error = Some(e.to_string());
                session.is_loading = false;
                Err(e.into())
            }
        }
    }

    /// Step two: update the contact, upsert and link the company, then kick
    /// off enrichment without waiting for it.
    pub async fn submit_details(&self, session: &mut IntakeSession, input: DetailsInput) -> Result<(), FormError> {
        let details = validate_details_step(&input)?;

        let lead_id = match session.lead_id.clone() {
            Some(id) => id,
            None => {
                tracing::error!("Details submitted before a contact was created");
                let err = FormError::MissingLead;
                session.error = Some(err.to_string());
                return Err(err);
            }
        };

        session.is_loading = true;
        session.error = None;

        let org_id = match self.link_records(&lead_id, &session.email, &details).await {
            Ok(org_id) => org_id,
            Err(e) => {
                session.error = Some(e.to_string());
                session.is_loading = false;
                return Err(e);
            }
        };

        session.enrichment_task = Some(self.spawn_enrichment(
            lead_id,
            org_id.clone(),
            session.email.clone(),
            details.clone(),
        ));

        session.full_name = details.full_name;
        session.company_name = details.company_name;
        session.company_domain = details.company_domain;
        session.org_id = Some(org_id);
        session.step = Step::Done;
        session.is_loading = false;
        Ok(())
    }

    /// Back one step. No network, keeps every field.
    pub fn go_back(&self, session: &mut IntakeSession) {
        session.step = session.step.previous();
        session.error = None;
    }

    async fn link_records(
        &self,
        lead_id: &LeadId,
        email: &str,
        details: &DetailsInput,
    ) -> Result<OrgId, FormError> {
        let contact = ContactDetails {
            email: email.to_string(),
            full_name: details.full_name.clone(),
            company: details.company_name.clone(),
            company_domain: details.company_domain.clone(),
        };
        self.contacts.update_contact_with_details(lead_id, &contact).await?;

        let company = CompanyData {
            name: details.company_name.clone(),
            domain: details.company_domain.clone(),
        };
        let org_id = self.companies.create_or_update_company(&company).await?;

        self.companies.associate_contact_with_company(lead_id, &org_id).await;
        Ok(org_id)
    }

    /// Runs enrichment and both attach calls on their own task. The returned
    /// handle resolves to `None` only if that task panicked.
    fn spawn_enrichment(
        &self,
        lead_id: LeadId,
        org_id: OrgId,
        email: String,
        details: DetailsInput,
    ) -> JoinHandle<Option<FitReport>> {
        if !self.enrichment.is_configured() {
            tracing::warn!("Enrichment not configured, lead {} will get the fallback report", lead_id);
        }

        let contacts = Arc::clone(&self.contacts);
        let companies = Arc::clone(&self.companies);
        let enrichment = Arc::clone(&self.enrichment);

        let work = tokio::spawn(async move {
            let report = enrichment
                .enrich_company_data(
                    &details.company_name,
                    &details.company_domain,
                    &details.full_name,
                    &email,
                )
                .await;
            contacts.attach_enrichment_report(&lead_id, &report).await;
            companies.attach_company_enrichment(&org_id, &report).await;
            tracing::info!("Enrichment completed and saved to HubSpot for lead {}", lead_id);
            report
        });

        tokio::spawn(async move {
            match work.await {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!("Enrichment failed but user flow continues: {}", e);
                    None
                }
            }
        })
    }
}
