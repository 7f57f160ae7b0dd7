use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod handlers {
    pub mod intake_dtos;
    pub mod intake_handlers;
}
mod api {
    pub mod enrichment;
    pub mod hubspot_client;
    pub mod hubspot_companies;
    pub mod hubspot_contacts;
    pub mod hubspot_notes;
}
mod models {
    pub mod intake_models;
}
mod repositories {
    pub mod intake_sessions;
}
mod utils {
    pub mod enrichment_prompts;
    pub mod intake_flow;
    pub mod validation;
}
mod config {
    pub mod app_config;
}
mod jobs {
    pub mod scheduler;
}
mod error;

use api::enrichment::FitAnalyzer;
use api::hubspot_client::HubSpotClient;
use api::hubspot_companies::HubSpotCompanies;
use api::hubspot_contacts::HubSpotContacts;
use config::app_config::{validate_env, AppConfig};
use handlers::intake_handlers;
use repositories::intake_sessions::IntakeSessions;
use utils::intake_flow::IntakeFlow;

async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    flow: IntakeFlow,
    sessions: IntakeSessions,
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .expose_headers([axum::http::header::CONTENT_TYPE]);

    match config
        .frontend_url
        .as_deref()
        .and_then(|url| url.parse::<axum::http::HeaderValue>().ok())
    {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let _guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let hubspot = Arc::new(HubSpotClient::new(
        config.hubspot_api_url.clone(),
        config.hubspot_access_token.clone(),
    ));
    let analyzer = FitAnalyzer::new(
        config.openrouter_api_key.clone(),
        config.llm_api_url.clone(),
        config.llm_model.clone(),
    );
    validate_env(&config, &hubspot, &analyzer);
    let flow = IntakeFlow::new(
        Arc::new(HubSpotContacts::new(hubspot.clone())),
        Arc::new(HubSpotCompanies::new(hubspot)),
        Arc::new(analyzer),
    );

    let state = Arc::new(AppState {
        flow,
        sessions: IntakeSessions::new(chrono::Duration::minutes(config.session_ttl_minutes)),
    });

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/intake", post(intake_handlers::create_intake))
        .route("/api/intake/{id}", get(intake_handlers::get_intake))
        .route("/api/intake/{id}/email", post(intake_handlers::submit_email))
        .route("/api/intake/{id}/details", post(intake_handlers::submit_details))
        .route("/api/intake/{id}/back", post(intake_handlers::go_back))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&config))
        .with_state(state.clone());

    // Start the scheduler
    let state_for_scheduler = state.clone();
    tokio::spawn(async move {
        jobs::scheduler::start_scheduler(state_for_scheduler).await;
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Lead intake backend listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
