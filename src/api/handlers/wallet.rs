//! Wallet handlers: creation, balance, recharge, withdrawals, entries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BalanceResponse, CreateWalletRequest, EntryDto, EntryListResponse, PaginationMeta,
    PaginationParams, RechargeRequest, WalletResponse, WithdrawalRequest,
};
use crate::app_state::AppState;
use crate::domain::{Amount, EntrySource, UserId, WalletId};
use crate::error::{ErrorResponse, LedgerError};

/// `POST /wallets` — Create a zero-balance wallet for a user.
///
/// # Errors
///
/// Returns [`LedgerError::WalletAlreadyExists`] if the user already has
/// a wallet.
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    tag = "Wallets",
    summary = "Create a wallet",
    description = "Creates the user's wallet at signup. Wallets are 1:1 with users and start at zero balance.",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created", body = WalletResponse),
        (status = 409, description = "User already has a wallet", body = ErrorResponse),
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(req): Json<CreateWalletRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let info = state.ledger.create_wallet(UserId::from_uuid(req.user_id)).await?;
    Ok((StatusCode::CREATED, Json(WalletResponse::from(info))))
}

/// `GET /wallets/{id}/balance` — Balance projection.
///
/// # Errors
///
/// Returns [`LedgerError::WalletNotFound`] for an unknown wallet.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}/balance",
    tag = "Wallets",
    summary = "Get wallet balance",
    description = "Returns total, held, and available balance. Available is total minus all Active holds.",
    params(
        ("id" = uuid::Uuid, Path, description = "Wallet UUID"),
    ),
    responses(
        (status = 200, description = "Balance projection", body = BalanceResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, LedgerError> {
    let summary = state.ledger.wallet_summary(WalletId::from_uuid(id)).await?;
    Ok(Json(BalanceResponse {
        total_balance: summary.total_balance.minor(),
        hold_amount: summary.hold_amount.minor(),
        available_balance: summary.available_balance.minor(),
        currency_code: state.currency_code.clone(),
    }))
}

/// `POST /wallets/{id}/recharge` — Append a credit entry.
///
/// # Errors
///
/// Returns [`LedgerError`] for unknown wallets, invalid amounts, or an
/// unknown credit source.
#[utoipa::path(
    post,
    path = "/api/v1/wallets/{id}/recharge",
    tag = "Wallets",
    summary = "Recharge a wallet",
    description = "Credits the wallet. `source` selects Recharge (default), PromoBonus, or Refund.",
    params(
        ("id" = uuid::Uuid, Path, description = "Wallet UUID"),
    ),
    request_body = RechargeRequest,
    responses(
        (status = 201, description = "Credit entry appended", body = EntryDto),
        (status = 400, description = "Invalid amount or source", body = ErrorResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
    )
)]
pub async fn recharge(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RechargeRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let source = parse_credit_source(req.source.as_deref())?;
    let entry = state
        .ledger
        .credit(WalletId::from_uuid(id), Amount::from_minor(req.amount), source)
        .await?;
    Ok((StatusCode::CREATED, Json(EntryDto::from(&entry))))
}

/// `POST /wallets/{id}/withdrawals` — Append a withdrawal payout debit.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientBalance`] when the amount exceeds
/// the available balance.
#[utoipa::path(
    post,
    path = "/api/v1/wallets/{id}/withdrawals",
    tag = "Wallets",
    summary = "Withdraw from a wallet",
    description = "Debits the available balance. Held funds cannot be withdrawn.",
    params(
        ("id" = uuid::Uuid, Path, description = "Wallet UUID"),
    ),
    request_body = WithdrawalRequest,
    responses(
        (status = 201, description = "Debit entry appended", body = EntryDto),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
        (status = 422, description = "Insufficient available balance", body = ErrorResponse),
    )
)]
pub async fn create_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<WithdrawalRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let entry = state
        .ledger
        .withdraw(WalletId::from_uuid(id), Amount::from_minor(req.amount))
        .await?;
    Ok((StatusCode::CREATED, Json(EntryDto::from(&entry))))
}

/// `GET /wallets/{id}/entries` — Paginated audit trail, oldest first.
///
/// # Errors
///
/// Returns [`LedgerError::WalletNotFound`] for an unknown wallet.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{id}/entries",
    tag = "Wallets",
    summary = "List ledger entries",
    description = "Returns the wallet's immutable transaction history with pagination.",
    params(
        ("id" = uuid::Uuid, Path, description = "Wallet UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Paginated entry list", body = EntryListResponse),
        (status = 404, description = "Wallet not found", body = ErrorResponse),
    )
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, LedgerError> {
    let params = params.clamped();
    let entries = state.ledger.entries(WalletId::from_uuid(id)).await?;

    let total = entries.len() as u32;
    let per_page = params.per_page;
    let page = params.page;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    // Offset math in u64: u32::MAX * 100 does not fit in u32.
    let start = u64::from(page - 1).saturating_mul(u64::from(per_page));
    let data: Vec<EntryDto> = entries
        .iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(per_page as usize)
        .map(EntryDto::from)
        .collect();

    Ok(Json(EntryListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// Wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets", post(create_wallet))
        .route("/wallets/{id}/balance", get(get_balance))
        .route("/wallets/{id}/recharge", post(recharge))
        .route("/wallets/{id}/withdrawals", post(create_withdrawal))
        .route("/wallets/{id}/entries", get(list_entries))
}

/// Parses the optional recharge `source` field.
fn parse_credit_source(source: Option<&str>) -> Result<EntrySource, LedgerError> {
    match source {
        None | Some("Recharge") | Some("recharge") => Ok(EntrySource::Recharge),
        Some("PromoBonus") | Some("promo_bonus") => Ok(EntrySource::PromoBonus),
        Some("Refund") | Some("refund") => Ok(EntrySource::Refund),
        Some(other) => Err(LedgerError::InvalidRequest(format!(
            "unknown credit source: {other}"
        ))),
    }
}
