use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use crate::models::{HealthResponse, ServiceStatus};
use crate::state::AppState;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let pdf_processor = state.analyzer.extractor_available();
    let model_configured = state.analyzer.is_configured();

    let status = if pdf_processor && model_configured {
        "healthy"
    } else {
        "degraded"
    };

    info!(
        status = status,
        pdf_available = pdf_processor,
        model_configured = model_configured,
        "Health check completed"
    );

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: ServiceStatus {
            pdf_processor,
            model_configured,
            model: state.config.gemini_model.clone(),
        },
    })
}

/// Readiness check endpoint. Not ready until an API key is configured.
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if state.analyzer.is_configured() && state.analyzer.extractor_available() {
        StatusCode::OK
    } else {
        info!("Readiness check failed - Gemini API key not configured");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
