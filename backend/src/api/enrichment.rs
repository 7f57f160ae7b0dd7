use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openai_api_rs::v1::{api::OpenAIClient, chat_completion};
use serde::Deserialize;
use serde_json::Value;

use crate::models::intake_models::FitReport;
use crate::utils::enrichment_prompts::fit_analysis_prompt;

pub const DEFAULT_LLM_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "anthropic/claude-sonnet-4";

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Model API key not found. Please set OPENROUTER_API_KEY in your .env file.")]
    NotConfigured,
    #[error("Model request failed: {0}")]
    Request(String),
    #[error("Model returned no text")]
    EmptyResponse,
    #[error("No JSON found in AI response")]
    NoJson,
    #[error("AI response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrichmentGateway: Send + Sync {
    /// Whether a model key is present. Never touches the network.
    fn is_configured(&self) -> bool;

    /// Always yields a report; any failure turns into [`FitReport::fallback`].
    async fn enrich_company_data(
        &self,
        company_name: &str,
        company_domain: &str,
        contact_name: &str,
        email: &str,
    ) -> FitReport;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    fit_score: Option<Value>,
    service_recommendations: Option<Vec<String>>,
    key_opportunities: Option<Vec<String>>,
    concerns: Option<Vec<String>>,
    engagement_approach: Option<String>,
    summary: Option<String>,
}

fn score_from(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(score) if score.is_finite() && score != 0.0 => score.round().clamp(1.0, 10.0) as u8,
        _ => 5,
    }
}

fn non_empty(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Slice from the first `{` through the last `}`, after dropping any
/// markdown code fences around the reply.
pub fn extract_json_object(text: &str) -> Option<String> {
    let mut cleaned = text.trim().to_string();
    if cleaned.starts_with("```") {
        cleaned = cleaned.replace("```json", "").replace("```", "").trim().to_string();
    }
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end < start {
        return None;
    }
    Some(cleaned[start..=end].to_string())
}

pub fn parse_fit_report(text: &str, now: DateTime<Utc>) -> Result<FitReport, EnrichmentError> {
    let json = extract_json_object(text).ok_or(EnrichmentError::NoJson)?;
    let analysis: RawAnalysis = serde_json::from_str(&json)?;

    Ok(FitReport {
        fit_score: score_from(analysis.fit_score.as_ref()),
        service_recommendations: analysis.service_recommendations.unwrap_or_default(),
        key_opportunities: analysis.key_opportunities.unwrap_or_default(),
        concerns: analysis.concerns.unwrap_or_default(),
        engagement_approach: non_empty(analysis.engagement_approach, "Standard outreach"),
        summary: non_empty(analysis.summary, "Analysis completed"),
        generated_at: now,
    })
}

/// Scores leads with a chat model behind an OpenAI-compatible endpoint
/// (OpenRouter unless configured otherwise).
pub struct FitAnalyzer {
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl FitAnalyzer {
    pub fn new(api_key: Option<String>, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn create_client(&self) -> Result<OpenAIClient, EnrichmentError> {
        let api_key = self.api_key.clone().ok_or(EnrichmentError::NotConfigured)?;
        OpenAIClient::builder()
            .with_endpoint(self.endpoint.as_str())
            .with_api_key(api_key)
            .build()
            .map_err(|e| EnrichmentError::Request(e.to_string()))
    }

    async fn request_analysis(&self, prompt: String) -> Result<String, EnrichmentError> {
        let client = self.create_client()?;

        let messages = vec![chat_completion::ChatCompletionMessage {
            role: chat_completion::MessageRole::user,
            content: chat_completion::Content::Text(prompt),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }];
        let request = chat_completion::ChatCompletionRequest::new(self.model.clone(), messages)
            .max_tokens(1000);

        let response = client
            .chat_completion(request)
            .await
            .map_err(|e| EnrichmentError::Request(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(EnrichmentError::EmptyResponse)
    }
}

#[async_trait]
impl EnrichmentGateway for FitAnalyzer {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn enrich_company_data(
        &self,
        company_name: &str,
        company_domain: &str,
        contact_name: &str,
        email: &str,
    ) -> FitReport {
        let prompt = fit_analysis_prompt(company_name, company_domain, contact_name, email);

        let result = match self.request_analysis(prompt).await {
            Ok(text) => parse_fit_report(&text, Utc::now()),
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                tracing::info!(
                    "AI enrichment completed for {}: fit score {}",
                    company_domain,
                    report.fit_score
                );
                report
            }
            Err(e) => {
                tracing::error!("Error enriching company data for {}: {}", company_domain, e);
                FitReport::fallback(Utc::now())
            }
        }
    }
}
