//! Hold listing handler.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{HoldDto, HoldFilterParams, HoldListResponse};
use crate::app_state::AppState;
use crate::domain::{HoldStatus, WalletId};
use crate::error::{ErrorResponse, LedgerError};

/// `GET /wallets/{id}/holds` — Holds plus the balance projection.
///
/// # Errors
///
/// Returns [`LedgerError::WalletNotFound`] for an unknown wallet or
/// [`LedgerError::InvalidRequest`] for an unknown status filter.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}/holds",
    tag = "Holds",
    summary = "List holds",
    description = "Returns the wallet's holds, optionally filtered by status, together with the balance summary the wallet screens render.",
    params(
        ("id" = uuid::Uuid, Path, description = "Wallet UUID"),
        HoldFilterParams,
    ),
    responses(
        (status = 200, description = "Hold list with summary", body = HoldListResponse),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
    )
)]
pub async fn list_holds(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<HoldFilterParams>,
) -> Result<impl IntoResponse, LedgerError> {
    let status = params
        .status
        .as_deref()
        .map(HoldStatus::from_str)
        .transpose()
        .map_err(LedgerError::InvalidRequest)?;

    let listing = state.ledger.holds(WalletId::from_uuid(id), status).await?;

    Ok(Json(HoldListResponse {
        data: listing.holds.iter().map(HoldDto::from).collect(),
        total_balance: listing.summary.total_balance.minor(),
        available_balance: listing.summary.available_balance.minor(),
        total_hold_amount: listing.summary.hold_amount.minor(),
        active_holds_count: listing.active_holds_count,
    }))
}

/// Hold routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/wallets/{id}/holds", get(list_holds))
}
