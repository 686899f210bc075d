//! Ledger error types with HTTP status code mapping.
//!
//! [`LedgerError`] is the central error type for the service. Each variant
//! maps to a numeric code, a stable string `error_code` consumed by the
//! client apps, an HTTP status, and a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::amount::Amount;
use crate::domain::ids::{HoldId, ReferralRequestId, UserId, WalletId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "error_code": "INSUFFICIENT_WALLET_BALANCE",
///     "message": "insufficient balance: have 40, need 60",
///     "details": { "current_balance": 40, "required_amount": 60 }
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, string discriminator, and message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`LedgerError`]).
    pub code: u32,
    /// Stable string discriminator (e.g. `"INSUFFICIENT_WALLET_BALANCE"`).
    pub error_code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g. the exact balance shortfall).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 4000–4999 | Funds           | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Non-positive amount passed to a ledger operation. Rejected before
    /// any state is written.
    #[error("invalid amount: must be positive")]
    InvalidAmount,

    /// Wallet with the given ID was not found.
    #[error("wallet not found: {0}")]
    WalletNotFound(WalletId),

    /// Hold with the given ID was not found.
    #[error("hold not found: {0}")]
    HoldNotFound(HoldId),

    /// No hold is indexed for the given referral request.
    #[error("referral request not found: {0}")]
    RequestNotFound(ReferralRequestId),

    /// The user already has a wallet (wallets are 1:1 with users).
    #[error("wallet already exists for user {0}")]
    WalletAlreadyExists(UserId),

    /// An Active hold already exists for the referral request. Carries the
    /// existing hold's ID so callers can treat a retry as success.
    #[error("active hold already exists for this referral request: {hold_id}")]
    DuplicateHold {
        /// The canonical hold already covering this referral request.
        hold_id: HoldId,
    },

    /// Convert/release race lost: the hold is no longer Active. Exactly one
    /// of the competing resolutions wins; the losers see this.
    #[error("hold is not active: {0}")]
    HoldNotActive(HoldId),

    /// Available balance is below the amount required for the operation.
    #[error("insufficient balance: have {current_balance}, need {required_amount}")]
    InsufficientBalance {
        /// Available balance at the time of the check, in minor units.
        current_balance: Amount,
        /// Amount the operation required, in minor units.
        required_amount: Amount,
    },

    /// A credit would overflow the wallet balance.
    #[error("balance overflow")]
    BalanceOverflow,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidAmount => 1002,
            Self::WalletNotFound(_) => 2001,
            Self::HoldNotFound(_) => 2002,
            Self::RequestNotFound(_) => 2003,
            Self::WalletAlreadyExists(_) => 2101,
            Self::DuplicateHold { .. } => 2102,
            Self::HoldNotActive(_) => 2103,
            Self::InsufficientBalance { .. } => 4001,
            Self::BalanceOverflow => 4002,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the stable string discriminator consumed by client apps.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::WalletNotFound(_) => "WALLET_NOT_FOUND",
            Self::HoldNotFound(_) => "HOLD_NOT_FOUND",
            Self::RequestNotFound(_) => "REFERRAL_REQUEST_NOT_FOUND",
            Self::WalletAlreadyExists(_) => "WALLET_ALREADY_EXISTS",
            Self::DuplicateHold { .. } => "DUPLICATE_HOLD",
            Self::HoldNotActive(_) => "HOLD_NOT_ACTIVE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_WALLET_BALANCE",
            Self::BalanceOverflow => "BALANCE_OVERFLOW",
            Self::PersistenceError(_) => "PERSISTENCE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAmount => StatusCode::BAD_REQUEST,
            Self::WalletNotFound(_) | Self::HoldNotFound(_) | Self::RequestNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::WalletAlreadyExists(_) | Self::DuplicateHold { .. } | Self::HoldNotActive(_) => {
                StatusCode::CONFLICT
            }
            Self::InsufficientBalance { .. } | Self::BalanceOverflow => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured details for variants where the client needs more than a
    /// message: the exact shortfall on `InsufficientBalance` (so the UI can
    /// route to a top-up flow) and the canonical hold ID on `DuplicateHold`.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InsufficientBalance {
                current_balance,
                required_amount,
            } => Some(serde_json::json!({
                "current_balance": current_balance,
                "required_amount": required_amount,
            })),
            Self::DuplicateHold { hold_id } => Some(serde_json::json!({ "hold_id": hold_id })),
            _ => None,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                error_code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
