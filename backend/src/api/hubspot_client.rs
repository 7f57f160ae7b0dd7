use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_HUBSPOT_URL: &str = "https://api.hubapi.com";

// HubSpot-defined association type ids
pub const CONTACT_TO_COMPANY: u32 = 1;
pub const NOTE_TO_COMPANY: u32 = 190;
pub const NOTE_TO_CONTACT: u32 = 202;

#[derive(Debug, thiserror::Error)]
pub enum HubSpotError {
    #[error("HubSpot access token not found. Please set HUBSPOT_ACCESS_TOKEN in your .env file.")]
    NotConfigured,
    #[error("HubSpot responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("HubSpot request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected HubSpot response: {0}")]
    Decode(String),
}

impl HubSpotError {
    /// The record (or association) already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, HubSpotError::Status { status, .. } if *status == StatusCode::CONFLICT)
    }
}

#[derive(Deserialize)]
struct ObjectResponse {
    id: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ObjectResponse>,
}

/// Thin wrapper over the HubSpot CRM v3/v4 REST API. Built once at start-up
/// and shared by the contact and company gateways.
pub struct HubSpotClient {
    http: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HubSpotClient {
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, HubSpotError> {
        let token = self.access_token.as_deref().ok_or(HubSpotError::NotConfigured)?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HubSpotError::Status { status, body });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| HubSpotError::Decode(e.to_string()))
    }

    /// Creates a record and returns its id.
    pub async fn create_object(&self, object_type: &str, body: Value) -> Result<String, HubSpotError> {
        let request = self
            .http
            .post(self.url(&format!("/crm/v3/objects/{}", object_type)))
            .json(&body);
        let value = self.send(request).await?;
        let created: ObjectResponse =
            serde_json::from_value(value).map_err(|e| HubSpotError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    pub async fn update_object(
        &self,
        object_type: &str,
        id: &str,
        properties: Value,
    ) -> Result<(), HubSpotError> {
        let request = self
            .http
            .patch(self.url(&format!("/crm/v3/objects/{}/{}", object_type, id)))
            .json(&json!({ "properties": properties }));
        self.send(request).await?;
        Ok(())
    }

    /// Id of the first record whose `property` equals `value` exactly.
    pub async fn find_by_property(
        &self,
        object_type: &str,
        property: &str,
        value: &str,
    ) -> Result<Option<String>, HubSpotError> {
        let body = json!({
            "filterGroups": [{
                "filters": [{
                    "propertyName": property,
                    "operator": "EQ",
                    "value": value,
                }]
            }],
            "limit": 1,
        });
        let request = self
            .http
            .post(self.url(&format!("/crm/v3/objects/{}/search", object_type)))
            .json(&body);
        let value = self.send(request).await?;
        let found: SearchResponse =
            serde_json::from_value(value).map_err(|e| HubSpotError::Decode(e.to_string()))?;
        Ok(found.results.into_iter().next().map(|r| r.id))
    }

    pub async fn associate(
        &self,
        from_type: &str,
        from_id: &str,
        to_type: &str,
        to_id: &str,
        association_type_id: u32,
    ) -> Result<(), HubSpotError> {
        let request = self
            .http
            .put(self.url(&format!(
                "/crm/v4/objects/{}/{}/associations/{}/{}",
                from_type, from_id, to_type, to_id
            )))
            .json(&json!([{
                "associationCategory": "HUBSPOT_DEFINED",
                "associationTypeId": association_type_id,
            }]));
        self.send(request).await?;
        Ok(())
    }

    /// Creates a note attached to a single record.
    pub async fn create_note(
        &self,
        note_body: &str,
        timestamp: &str,
        target_id: &str,
        association_type_id: u32,
    ) -> Result<String, HubSpotError> {
        let body = json!({
            "properties": {
                "hs_note_body": note_body,
                "hs_timestamp": timestamp,
            },
            "associations": [{
                "to": { "id": target_id },
                "types": [{
                    "associationCategory": "HUBSPOT_DEFINED",
                    "associationTypeId": association_type_id,
                }]
            }]
        });
        self.create_object("notes", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn calls_fail_fast_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1"})))
            .expect(0)
            .mount(&server)
            .await;

        let client = HubSpotClient::new(server.uri(), None);
        assert!(!client.is_configured());
        let err = client.create_object("contacts", json!({})).await.unwrap_err();
        assert!(matches!(err, HubSpotError::NotConfigured));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let client = HubSpotClient::new(DEFAULT_HUBSPOT_URL, Some("  ".to_string()));
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn sends_bearer_token_and_reads_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/contacts"))
            .and(header("authorization", "Bearer pat-123"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "501"})))
            .mount(&server)
            .await;

        let client = HubSpotClient::new(server.uri(), Some("pat-123".to_string()));
        let id = client
            .create_object("contacts", json!({"properties": {"email": "a@b.com"}}))
            .await
            .unwrap();
        assert_eq!(id, "501");
    }

    #[tokio::test]
    async fn conflict_status_is_recognized() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(409).set_body_string("exists"))
            .mount(&server)
            .await;

        let client = HubSpotClient::new(server.uri(), Some("t".to_string()));
        let err = client.associate("contacts", "1", "companies", "2", CONTACT_TO_COMPANY).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn search_returns_none_when_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm/v3/objects/companies/search"))
            .and(body_partial_json(json!({"limit": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "results": []})))
            .mount(&server)
            .await;

        let client = HubSpotClient::new(server.uri(), Some("t".to_string()));
        let found = client.find_by_property("companies", "domain", "acme.com").await.unwrap();
        assert_eq!(found, None);
    }
}
