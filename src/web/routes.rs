use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::model::IngestRequest;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest))
        .route("/health", get(health))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub job_id: String,
    pub company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Every failure is reported as a flat 500 with the error message.
fn error_response(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::error!(error = %rejection.body_text(), "Rejected ingest body");
            return error_response(rejection.body_text());
        }
    };

    match state.reconciler.ingest(request).await {
        Ok(outcome) => {
            tracing::info!(
                job_id = %outcome.job_id,
                company_id = %outcome.company_id,
                job_created = outcome.job_created,
                company_created = outcome.company_created,
                "Ingest complete"
            );
            Json(IngestResponse {
                success: true,
                job_id: outcome.job_id.to_string(),
                company_id: outcome.company_id.to_string(),
                application_url: outcome.application_url,
                application_type: outcome.application_type,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("Ingest error: {e}");
            error_response(e.to_string())
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
