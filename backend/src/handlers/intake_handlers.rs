use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{FormError, ValidationErrors};
use crate::handlers::intake_dtos::{EmailRequest, IntakeView};
use crate::models::intake_models::DetailsInput;
use crate::repositories::intake_sessions::SessionSlot;
use crate::AppState;

type ViewResponse = (StatusCode, Json<IntakeView>);
type ApiError = (StatusCode, Json<serde_json::Value>);

fn find_session(state: &AppState, raw_id: &str) -> Result<(Uuid, SessionSlot), ApiError> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Session not found. Please start over."})),
        )
    };
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    let slot = state.sessions.get(&id).ok_or_else(not_found)?;
    Ok((id, slot))
}

fn status_for(err: &FormError) -> StatusCode {
    match err {
        FormError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::Remote(_) => StatusCode::BAD_GATEWAY,
        FormError::MissingLead => StatusCode::CONFLICT,
    }
}

/// Splits a step outcome into the status and the per-field messages to show.
fn outcome(result: Result<(), FormError>) -> (StatusCode, ValidationErrors) {
    match result {
        Ok(()) => (StatusCode::OK, ValidationErrors::new()),
        Err(err) => {
            let status = status_for(&err);
            match err {
                FormError::Validation(errors) => (status, errors),
                _ => (status, ValidationErrors::new()),
            }
        }
    }
}

pub async fn create_intake(State(state): State<Arc<AppState>>) -> ViewResponse {
    let (id, slot) = state.sessions.create();
    let session = slot.lock().await;
    tracing::info!("Intake session started: {}", id);
    (
        StatusCode::CREATED,
        Json(IntakeView::new(id, &session, ValidationErrors::new())),
    )
}

pub async fn get_intake(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<ViewResponse, ApiError> {
    let (id, slot) = find_session(&state, &raw_id)?;
    let mut session = slot.lock().await;
    session.touch();
    Ok((StatusCode::OK, Json(IntakeView::new(id, &session, ValidationErrors::new()))))
}

pub async fn submit_email(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Json(request): Json<EmailRequest>,
) -> Result<ViewResponse, ApiError> {
    let (id, slot) = find_session(&state, &raw_id)?;
    let mut session = slot.lock().await;
    session.touch();

    let result = state.flow.submit_email(&mut session, &request.email).await;
    if let Err(e) = &result {
        tracing::warn!("Email step rejected for session {}: {}", id, e);
    }
    let (status, field_errors) = outcome(result);
    Ok((status, Json(IntakeView::new(id, &session, field_errors))))
}

pub async fn submit_details(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Json(request): Json<DetailsInput>,
) -> Result<ViewResponse, ApiError> {
    let (id, slot) = find_session(&state, &raw_id)?;
    let mut session = slot.lock().await;
    session.touch();

    let result = state.flow.submit_details(&mut session, request).await;
    if let Err(e) = &result {
        tracing::warn!("Details step rejected for session {}: {}", id, e);
    }
    let (status, field_errors) = outcome(result);
    Ok((status, Json(IntakeView::new(id, &session, field_errors))))
}

pub async fn go_back(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<ViewResponse, ApiError> {
    let (id, slot) = find_session(&state, &raw_id)?;
    let mut session = slot.lock().await;
    session.touch();

    state.flow.go_back(&mut session);
    Ok((StatusCode::OK, Json(IntakeView::new(id, &session, ValidationErrors::new()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::enrichment::MockEnrichmentGateway;
    use crate::api::hubspot_companies::MockCompanyGateway;
    use crate::api::hubspot_contacts::MockContactGateway;
    use crate::error::GatewayError;
    use crate::models::intake_models::{FitReport, LeadId, OrgId, Step};
    use crate::repositories::intake_sessions::IntakeSessions;
    use crate::utils::intake_flow::IntakeFlow;
    use chrono::{Duration, Utc};

    fn app_state(
        contacts: MockContactGateway,
        companies: MockCompanyGateway,
        enrichment: MockEnrichmentGateway,
    ) -> Arc<AppState> {
        Arc::new(AppState {
            flow: IntakeFlow::new(Arc::new(contacts), Arc::new(companies), Arc::new(enrichment)),
            sessions: IntakeSessions::new(Duration::minutes(60)),
        })
    }

    fn idle_state() -> Arc<AppState> {
        app_state(
            MockContactGateway::new(),
            MockCompanyGateway::new(),
            MockEnrichmentGateway::new(),
        )
    }

    async fn start(state: &Arc<AppState>) -> String {
        let (status, Json(view)) = create_intake(State(state.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view.step, Step::Email);
        view.session_id.to_string()
    }

    fn email(value: &str) -> Json<EmailRequest> {
        Json(EmailRequest {
            email: value.to_string(),
        })
    }

    fn details(full_name: &str, company: &str, domain: &str) -> Json<DetailsInput> {
        Json(DetailsInput {
            full_name: full_name.to_string(),
            company_name: company.to_string(),
            company_domain: domain.to_string(),
        })
    }

    #[tokio::test]
    async fn unknown_or_malformed_session_is_not_found() {
        let state = idle_state();
        let err = get_intake(State(state.clone()), Path(Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);

        let err = go_back(State(state), Path("not-a-uuid".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_email_is_unprocessable_with_field_error() {
        let state = idle_state();
        let id = start(&state).await;

        let (status, Json(view)) = submit_email(State(state), Path(id), email("nope"))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(view.step, Step::Email);
        assert_eq!(
            view.field_errors.get("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn crm_failure_is_bad_gateway_with_message() {
        let mut contacts = MockContactGateway::new();
        contacts
            .expect_create_contact()
            .returning(|_| Err(GatewayError::CreateContact));
        let state = app_state(contacts, MockCompanyGateway::new(), MockEnrichmentGateway::new());
        let id = start(&state).await;

        let (status, Json(view)) = submit_email(State(state), Path(id), email("jane@acme.com"))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(view.step, Step::Email);
        assert!(!view.is_loading);
        assert_eq!(
            view.error.as_deref(),
            Some("Failed to create contact. Please try again.")
        );
    }

    #[tokio::test]
    async fn details_without_contact_is_conflict() {
        let state = idle_state();
        let id = start(&state).await;

        let (status, Json(view)) = submit_details(
            State(state),
            Path(id),
            details("Jane Doe", "Acme", "acme.com"),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(view.error.as_deref(), Some("Contact ID not found. Please start over."));
    }

    #[tokio::test]
    async fn full_walkthrough_reaches_confirmation() {
        let mut contacts = MockContactGateway::new();
        contacts
            .expect_create_contact()
            .returning(|_| Ok(LeadId("101".to_string())));
        contacts
            .expect_update_contact_with_details()
            .returning(|_, _| Ok(()));
        contacts
            .expect_attach_enrichment_report()
            .times(1)
            .returning(|_, _| ());

        let mut companies = MockCompanyGateway::new();
        companies
            .expect_create_or_update_company()
            .returning(|_| Ok(OrgId("900".to_string())));
        companies
            .expect_associate_contact_with_company()
            .returning(|_, _| ());
        companies
            .expect_attach_company_enrichment()
            .times(1)
            .returning(|_, _| ());

        let mut enrichment = MockEnrichmentGateway::new();
        enrichment.expect_is_configured().return_const(true);
        enrichment
            .expect_enrich_company_data()
            .times(1)
            .returning(|_, _, _, _| FitReport {
                fit_score: 8,
                ..FitReport::fallback(Utc::now())
            });

        let state = app_state(contacts, companies, enrichment);
        let id = start(&state).await;

        let (status, Json(view)) =
            submit_email(State(state.clone()), Path(id.clone()), email("jane@acme.com"))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view.step, Step::Details);
        assert_eq!(view.email, "jane@acme.com");

        let (status, Json(view)) = submit_details(
            State(state.clone()),
            Path(id.clone()),
            details("Jane Doe", "Acme", "https://www.Acme.com/"),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view.step, Step::Done);
        assert_eq!(view.company_domain, "acme.com");
        assert_eq!(view.contact_name, "Jane");
        assert!(view.field_errors.is_empty());
        assert!(!view.is_loading);

        let slot = state.sessions.get(&view.session_id).unwrap();
        let task = slot.lock().await.enrichment_task.take().unwrap();
        let report = task.await.unwrap().unwrap();
        assert_eq!(report.fit_score, 8);

        let (_, Json(view)) = go_back(State(state), Path(id)).await.unwrap();
        assert_eq!(view.step, Step::Details);
        assert_eq!(view.full_name, "Jane Doe");
    }
}
