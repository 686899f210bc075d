//! System endpoints: health check and billing configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Billing configuration as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
struct BillingConfigResponse {
    hold_window_days: i64,
    currency_code: String,
}

/// `GET /config/billing` — Billing parameters.
///
/// The hold window served here is the same configured value the ledger
/// stamps on every new hold; client copy must not hard-code its own.
#[utoipa::path(
    get,
    path = "/config/billing",
    tag = "System",
    summary = "Billing configuration",
    description = "Returns the configured hold window and currency so clients never hard-code either.",
    responses(
        (status = 200, description = "Billing parameters", body = BillingConfigResponse),
    )
)]
pub async fn billing_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(BillingConfigResponse {
            hold_window_days: state.hold_window_days,
            currency_code: state.currency_code.clone(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/billing", get(billing_config_handler))
}
