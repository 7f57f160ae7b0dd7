use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::api::hubspot_client::{HubSpotClient, HubSpotError, NOTE_TO_CONTACT};
use crate::api::hubspot_notes::{enrichment_date, note_timestamp, report_note_body};
use crate::error::GatewayError;
use crate::models::intake_models::{ContactDetails, FitReport, LeadId};

const CONTACTS: &str = "contacts";
const FORM_SOURCE: &str = "Website Contact Form";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactGateway: Send + Sync {
    /// Id of the contact with this email, creating it when needed.
    async fn create_contact(&self, email: &str) -> Result<LeadId, GatewayError>;

    async fn update_contact_with_details(
        &self,
        lead_id: &LeadId,
        details: &ContactDetails,
    ) -> Result<(), GatewayError>;

    /// Best-effort: failures are logged, never returned.
    async fn attach_enrichment_report(&self, lead_id: &LeadId, report: &FitReport);
}

/// Splits "Jane van Doe" into ("Jane", Some("van Doe")).
pub fn split_full_name(full_name: &str) -> (String, Option<String>) {
    let mut parts = full_name.trim().split(' ');
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() { None } else { Some(rest) };
    (first, last)
}

pub struct HubSpotContacts {
    client: Arc<HubSpotClient>,
}

impl HubSpotContacts {
    pub fn new(client: Arc<HubSpotClient>) -> Self {
        Self { client }
    }

    async fn write_report(&self, lead_id: &LeadId, report: &FitReport) -> Result<(), HubSpotError> {
        let now = Utc::now();
        let report_json = serde_json::to_string_pretty(report).unwrap_or_default();

        self.client
            .update_object(
                CONTACTS,
                &lead_id.0,
                json!({
                    "ai_fit_score": report.fit_score.to_string(),
                    "ai_enrichment_report": report_json,
                    "enrichment_date": enrichment_date(now),
                }),
            )
            .await?;

        let body = report_note_body("AI Enrichment Report", report, now);
        self.client
            .create_note(&body, &note_timestamp(now), &lead_id.0, NOTE_TO_CONTACT)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ContactGateway for HubSpotContacts {
    async fn create_contact(&self, email: &str) -> Result<LeadId, GatewayError> {
        let body = json!({
            "properties": {
                "email": email,
                "contact_form_source": FORM_SOURCE,
            }
        });

        let err = match self.client.create_object(CONTACTS, body).await {
            Ok(id) => {
                tracing::info!("Contact created: {}", id);
                return Ok(LeadId(id));
            }
            Err(e) => e,
        };

        if err.is_conflict() {
            tracing::info!("Contact already exists, fetching existing contact");
            match self.client.find_by_property(CONTACTS, "email", email).await {
                Ok(Some(id)) => {
                    tracing::info!("Existing contact found: {}", id);
                    return Ok(LeadId(id));
                }
                Ok(None) => tracing::error!("Conflict reported but no contact matches the email"),
                Err(search_err) => {
                    tracing::error!("Error searching for existing contact: {}", search_err)
                }
            }
        }

        tracing::error!("Error creating contact: {}", err);
        Err(GatewayError::CreateContact)
    }

    async fn update_contact_with_details(
        &self,
        lead_id: &LeadId,
        details: &ContactDetails,
    ) -> Result<(), GatewayError> {
        let (firstname, lastname) = split_full_name(&details.full_name);

        let mut properties = Map::new();
        properties.insert("firstname".to_string(), Value::String(firstname));
        properties.insert("company".to_string(), Value::String(details.company.clone()));
        properties.insert(
            "company_domain".to_string(),
            Value::String(details.company_domain.clone()),
        );
        if let Some(lastname) = lastname {
            properties.insert("lastname".to_string(), Value::String(lastname));
        }

        match self
            .client
            .update_object(CONTACTS, &lead_id.0, Value::Object(properties))
            .await
        {
            Ok(()) => {
                tracing::info!("Contact updated: {}", lead_id);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error updating contact {}: {}", lead_id, e);
                Err(GatewayError::UpdateContact)
            }
        }
    }

    async fn attach_enrichment_report(&self, lead_id: &LeadId, report: &FitReport) {
        match self.write_report(lead_id, report).await {
            Ok(()) => tracing::info!("Enrichment report attached to contact: {}", lead_id),
            Err(e) => tracing::error!("Error attaching enrichment report to contact {}: {}", lead_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn gateway(server: &MockServer) -> HubSpotContacts {
        HubSpotContacts::new(Arc::new(HubSpotClient::new(server.uri(), Some("t".to_string()))))
    }

    #[test]
    fn splits_name_on_first_space() {
        assert_eq!(split_full_name("Jane Doe"), ("Jane".to_string(), Some("Doe".to_string())));
        assert_eq!(
            split_full_name(" Jane van der Berg "),
            ("Jane".to_string(), Some("van der Berg".to_string()))
        );
        assert_eq!(split_full_name("Cher"), ("Cher".to_string(), None));
    }

    #[tokio::test]
    async fn new_contact_returns_created_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts"))
            .and(body_partial_json(json!({
                "properties": {"email": "jane@acme.com", "contact_form_source": "Website Contact Form"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "101"})))
            .expect(1)
            .mount(&server)
            .await;

        let id = gateway(&server).create_contact("jane@acme.com").await.unwrap();
        assert_eq!(id, LeadId("101".to_string()));
    }

    #[tokio::test]
    async fn duplicate_email_resolves_to_same_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "101"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Contact already exists"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts/search"))
            .and(body_partial_json(json!({
                "filterGroups": [{"filters": [{"propertyName": "email", "operator": "EQ", "value": "jane@acme.com"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 1, "results": [{"id": "101"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let contacts = gateway(&server);
        let first = contacts.create_contact("jane@acme.com").await.unwrap();
        let second = contacts.create_contact("jane@acme.com").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn other_failures_are_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = gateway(&server).create_contact("jane@acme.com").await.unwrap_err();
        assert_eq!(err, GatewayError::CreateContact);
        assert_eq!(err.to_string(), "Failed to create contact. Please try again.");
    }

    #[tokio::test]
    async fn conflict_without_match_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "results": []})))
            .mount(&server)
            .await;

        let err = gateway(&server).create_contact("jane@acme.com").await.unwrap_err();
        assert_eq!(err, GatewayError::CreateContact);
    }

    #[tokio::test]
    async fn update_omits_empty_lastname() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/crm/v3/objects/contacts/101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "101"})))
            .expect(1)
            .mount(&server)
            .await;

        let details = ContactDetails {
            email: "cher@acme.com".to_string(),
            full_name: "Cher".to_string(),
            company: "Acme".to_string(),
            company_domain: "acme.com".to_string(),
        };
        gateway(&server)
            .update_contact_with_details(&LeadId("101".to_string()), &details)
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["properties"]["firstname"], "Cher");
        assert_eq!(body["properties"]["company"], "Acme");
        assert_eq!(body["properties"]["company_domain"], "acme.com");
        assert!(body["properties"].get("lastname").is_none());
    }

    #[tokio::test]
    async fn update_failure_blocks_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let details = ContactDetails {
            email: "jane@acme.com".to_string(),
            full_name: "Jane Doe".to_string(),
            company: "Acme".to_string(),
            company_domain: "acme.com".to_string(),
        };
        let err = gateway(&server)
            .update_contact_with_details(&LeadId("101".to_string()), &details)
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::UpdateContact);
    }

    #[tokio::test]
    async fn attach_writes_fields_and_note() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/crm/v3/objects/contacts/101"))
            .and(body_partial_json(json!({"properties": {"ai_fit_score": "5"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "101"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/notes"))
            .and(body_partial_json(json!({
                "associations": [{"to": {"id": "101"}, "types": [{"associationTypeId": 202}]}]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "n1"})))
            .expect(1)
            .mount(&server)
            .await;

        gateway(&server)
            .attach_enrichment_report(&LeadId("101".to_string()), &FitReport::fallback(Utc::now()))
            .await;
    }

    #[tokio::test]
    async fn attach_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/notes"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "n1"})))
            .expect(0)
            .mount(&server)
            .await;

        gateway(&server)
            .attach_enrichment_report(&LeadId("101".to_string()), &FitReport::fallback(Utc::now()))
            .await;
    }
}
