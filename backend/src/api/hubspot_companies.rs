use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::api::hubspot_client::{HubSpotClient, HubSpotError, CONTACT_TO_COMPANY, NOTE_TO_COMPANY};
use crate::api::hubspot_notes::{enrichment_date, note_timestamp, report_note_body};
use crate::error::GatewayError;
use crate::models::intake_models::{CompanyData, FitReport, LeadId, OrgId};

const COMPANIES: &str = "companies";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyGateway: Send + Sync {
    /// Find-or-create by domain. An existing company gets its name refreshed.
    async fn create_or_update_company(&self, company: &CompanyData) -> Result<OrgId, GatewayError>;

    /// Best-effort; an existing association counts as success.
    async fn associate_contact_with_company(&self, lead_id: &LeadId, org_id: &OrgId);

    /// Best-effort: failures are logged, never returned.
    async fn attach_company_enrichment(&self, org_id: &OrgId, report: &FitReport);
}

pub struct HubSpotCompanies {
    client: Arc<HubSpotClient>,
}

impl HubSpotCompanies {
    pub fn new(client: Arc<HubSpotClient>) -> Self {
        Self { client }
    }

    async fn upsert(&self, company: &CompanyData) -> Result<OrgId, HubSpotError> {
        let properties = json!({
            "name": company.name,
            "domain": company.domain,
        });

        if let Some(id) = self
            .client
            .find_by_property(COMPANIES, "domain", &company.domain)
            .await?
        {
            tracing::info!("Existing company found: {}", id);
            self.client.update_object(COMPANIES, &id, properties).await?;
            tracing::info!("Company updated: {}", id);
            return Ok(OrgId(id));
        }

        let id = self
            .client
            .create_object(COMPANIES, json!({ "properties": properties }))
            .await?;
        tracing::info!("Company created: {}", id);
        Ok(OrgId(id))
    }

    async fn write_report(&self, org_id: &OrgId, report: &FitReport) -> Result<(), HubSpotError> {
        let now = Utc::now();
        let report_json = serde_json::to_string_pretty(report).unwrap_or_default();

        self.client
            .update_object(
                COMPANIES,
                &org_id.0,
                json!({
                    "ai_fit_score": report.fit_score.to_string(),
                    "ai_fit_report": report_json,
                    "enrichment_date": enrichment_date(now),
                    "key_opportunities": report.key_opportunities.join("\n"),
                    "engagement_approach": report.engagement_approach,
                }),
            )
            .await?;

        let body = report_note_body("AI Company Enrichment Report", report, now);
        self.client
            .create_note(&body, &note_timestamp(now), &org_id.0, NOTE_TO_COMPANY)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CompanyGateway for HubSpotCompanies {
    async fn create_or_update_company(&self, company: &CompanyData) -> Result<OrgId, GatewayError> {
        self.upsert(company).await.map_err(|e| {
            tracing::error!("Error creating/updating company {}: {}", company.domain, e);
            GatewayError::UpsertCompany
        })
    }

    async fn associate_contact_with_company(&self, lead_id: &LeadId, org_id: &OrgId) {
        match self
            .client
            .associate("contacts", &lead_id.0, COMPANIES, &org_id.0, CONTACT_TO_COMPANY)
            .await
        {
            Ok(()) => tracing::info!("Contact {} associated with company {}", lead_id, org_id),
            Err(e) if e.is_conflict() => {
                tracing::info!("Contact {} already associated with company {}", lead_id, org_id)
            }
            Err(e) => {
                tracing::error!("Error associating contact with company: {}", e);
                tracing::warn!("Continuing without association");
            }
        }
    }

    async fn attach_company_enrichment(&self, org_id: &OrgId, report: &FitReport) {
        match self.write_report(org_id, report).await {
            Ok(()) => tracing::info!("Enrichment report attached to company: {}", org_id),
            Err(e) => tracing::error!("Error attaching company enrichment to {}: {}", org_id, e),
        }
    }
}
