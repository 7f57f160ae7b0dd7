use std::env;

use crate::api::enrichment::{EnrichmentGateway, DEFAULT_LLM_MODEL, DEFAULT_LLM_URL};
use crate::api::hubspot_client::{HubSpotClient, DEFAULT_HUBSPOT_URL};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub hubspot_access_token: Option<String>,
    pub hubspot_api_url: String,
    pub openrouter_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub frontend_url: Option<String>,
    pub bind_addr: String,
    pub session_ttl_minutes: i64,
    pub sentry_dsn: Option<String>,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_ttl_minutes = match optional("SESSION_TTL_MINUTES") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    tracing::warn!(
                        "Invalid SESSION_TTL_MINUTES '{}', using {}",
                        raw,
                        DEFAULT_SESSION_TTL_MINUTES
                    );
                    DEFAULT_SESSION_TTL_MINUTES
                }
            },
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        Self {
            hubspot_access_token: optional("HUBSPOT_ACCESS_TOKEN"),
            hubspot_api_url: or_default("HUBSPOT_API_URL", DEFAULT_HUBSPOT_URL),
            openrouter_api_key: optional("OPENROUTER_API_KEY"),
            llm_api_url: or_default("LLM_API_URL", DEFAULT_LLM_URL),
            llm_model: or_default("LLM_MODEL", DEFAULT_LLM_MODEL),
            frontend_url: optional("FRONTEND_URL"),
            bind_addr: or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            session_ttl_minutes,
            sentry_dsn: optional("SENTRY_DSN"),
        }
    }
}

/// Missing credentials do not stop the server: the form still renders,
/// CRM steps fail with their user-facing message and enrichment falls back.
/// Returns the warnings it logged.
pub fn validate_env(
    config: &AppConfig,
    hubspot: &HubSpotClient,
    enrichment: &dyn EnrichmentGateway,
) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if !hubspot.is_configured() {
        warnings.push("HUBSPOT_ACCESS_TOKEN not set, contact and company steps will fail");
    }
    if !enrichment.is_configured() {
        warnings.push("OPENROUTER_API_KEY not set, enrichment will use the fallback report");
    }
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    if config.frontend_url.is_none() {
        tracing::info!("FRONTEND_URL not set, allowing any origin");
    }
    warnings
}
