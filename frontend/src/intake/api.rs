use gloo_net::http::{Request, Response};
use serde::Serialize;

use crate::config;
use crate::intake::form_state::{DetailsRequest, EmailRequest, IntakeView};

fn intake_url(path: &str) -> String {
    format!("{}/api/intake{}", config::get_backend_url(), path)
}

/// Step failures (422, 409, 502) still carry the session view.
async fn read_view(response: Response) -> Result<IntakeView, String> {
    match response.status() {
        200 | 201 | 409 | 422 | 502 => response
            .json::<IntakeView>()
            .await
            .map_err(|e| format!("Failed to parse server response: {}", e)),
        404 => Err("Your session expired. Please refresh the page and start over.".to_string()),
        status => Err(format!("Request failed with status {}", status)),
    }
}

async fn post_json<T: Serialize>(url: &str, body: &T) -> Result<IntakeView, String> {
    let request = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to build request: {}", e))?;
    let response = request
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_view(response).await
}

pub async fn start_intake() -> Result<IntakeView, String> {
    let response = Request::post(&intake_url(""))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_view(response).await
}

pub async fn submit_email(session_id: &str, email: String) -> Result<IntakeView, String> {
    post_json(&intake_url(&format!("/{}/email", session_id)), &EmailRequest { email }).await
}

pub async fn submit_details(session_id: &str, details: &DetailsRequest) -> Result<IntakeView, String> {
    post_json(&intake_url(&format!("/{}/details", session_id)), details).await
}
