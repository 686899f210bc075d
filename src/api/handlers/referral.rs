//! Referral billing handlers: hold creation and outcome callbacks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CreateReferralHoldRequest, EntryDto, HoldDto};
use crate::app_state::AppState;
use crate::domain::{Amount, ReferralRequestId, WalletId};
use crate::error::{ErrorResponse, LedgerError};

/// `POST /referral-requests` — Reserve funds for a referral request.
///
/// A duplicate submission (same `referral_request_id` with an Active
/// hold) is answered `200 OK` with the existing hold, so a double-tapped
/// submit button or a network retry never reserves twice.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientBalance`] with the exact shortfall
/// when the available balance cannot cover the amount.
#[utoipa::path(
    post,
    path = "/api/v1/referral-requests",
    tag = "Referrals",
    summary = "Reserve funds for a referral request",
    description = "Creates an Active hold against the wallet's available balance. No ledger entry is written until the referral is fulfilled.",
    request_body = CreateReferralHoldRequest,
    responses(
        (status = 201, description = "Hold created", body = HoldDto),
        (status = 200, description = "Hold already exists for this request", body = HoldDto),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
        (status = 422, description = "Insufficient available balance", body = ErrorResponse),
    )
)]
pub async fn create_referral_hold(
    State(state): State<AppState>,
    Json(req): Json<CreateReferralHoldRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let wallet_id = WalletId::from_uuid(req.wallet_id);
    let request_id = ReferralRequestId::from_uuid(req.referral_request_id);

    match state
        .ledger
        .create_hold(wallet_id, request_id, Amount::from_minor(req.amount))
        .await
    {
        Ok(hold) => Ok((StatusCode::CREATED, Json(HoldDto::from(&hold)))),
        Err(LedgerError::DuplicateHold { hold_id }) => {
            let existing = state.ledger.hold(wallet_id, hold_id).await?;
            Ok((StatusCode::OK, Json(HoldDto::from(&existing))))
        }
        Err(err) => Err(err),
    }
}

/// `POST /referral-requests/{id}/fulfilled` — Referral outcome callback:
/// convert the hold into a charge.
///
/// # Errors
///
/// Returns [`LedgerError::HoldNotActive`] when the hold was already
/// resolved (the callback lost the race; callers log and move on).
#[utoipa::path(
    post,
    path = "/api/v1/referral-requests/{id}/fulfilled",
    tag = "Referrals",
    summary = "Settle a fulfilled referral",
    description = "Converts the Active hold into a Debit ledger entry. The only path by which a referral decreases the total balance.",
    params(
        ("id" = uuid::Uuid, Path, description = "Referral request UUID"),
    ),
    responses(
        (status = 200, description = "Hold converted; charge entry returned", body = EntryDto),
        (status = 404, description = "Unknown referral request", body = ErrorResponse),
        (status = 409, description = "Hold already resolved", body = ErrorResponse),
    )
)]
pub async fn referral_fulfilled(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, LedgerError> {
    let entry = state
        .ledger
        .on_referral_fulfilled(ReferralRequestId::from_uuid(id))
        .await?;
    Ok(Json(EntryDto::from(&entry)))
}

/// `POST /referral-requests/{id}/cancelled` — Referral outcome callback:
/// release the hold.
///
/// # Errors
///
/// Returns [`LedgerError::HoldNotActive`] when the hold was already
/// resolved.
#[utoipa::path(
    post,
    path = "/api/v1/referral-requests/{id}/cancelled",
    tag = "Referrals",
    summary = "Release a cancelled referral's hold",
    description = "Releases the Active hold; the funds count toward the available balance again. No ledger entry is written.",
    params(
        ("id" = uuid::Uuid, Path, description = "Referral request UUID"),
    ),
    responses(
        (status = 200, description = "Hold released", body = HoldDto),
        (status = 404, description = "Unknown referral request", body = ErrorResponse),
        (status = 409, description = "Hold already resolved", body = ErrorResponse),
    )
)]
pub async fn referral_cancelled(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, LedgerError> {
    let hold = state
        .ledger
        .on_referral_cancelled(ReferralRequestId::from_uuid(id))
        .await?;
    Ok(Json(HoldDto::from(&hold)))
}

/// Referral billing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/referral-requests", post(create_referral_hold))
        .route("/referral-requests/{id}/fulfilled", post(referral_fulfilled))
        .route("/referral-requests/{id}/cancelled", post(referral_cancelled))
}
