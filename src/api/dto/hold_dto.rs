//! Hold DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::Hold;

/// Query parameters for `GET /wallets/{id}/holds`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct HoldFilterParams {
    /// Optional status filter: `Active`, `Converted`, or `Released`.
    #[serde(default)]
    pub status: Option<String>,
}

/// One hold as served in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoldDto {
    /// Hold identifier.
    pub hold_id: Uuid,
    /// Wallet whose funds are reserved.
    pub wallet_id: Uuid,
    /// Referral request this hold backs.
    pub referral_request_id: Uuid,
    /// Reserved amount in minor units.
    pub amount: u64,
    /// `"Active"`, `"Converted"`, or `"Released"`.
    pub status: &'static str,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Auto-release deadline.
    pub expires_at: DateTime<Utc>,
    /// Conversion timestamp, if converted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_at: Option<DateTime<Utc>>,
    /// Release timestamp, if released.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

impl From<&Hold> for HoldDto {
    fn from(hold: &Hold) -> Self {
        Self {
            hold_id: hold.hold_id.into(),
            wallet_id: hold.wallet_id.into(),
            referral_request_id: hold.referral_request_id.into(),
            amount: hold.amount.minor(),
            status: hold.status.as_str(),
            created_at: hold.created_at,
            expires_at: hold.expires_at,
            converted_at: hold.converted_at,
            released_at: hold.released_at,
        }
    }
}

/// Response body for `GET /wallets/{id}/holds`: the filtered holds plus
/// the balance projection the wallet screens render alongside them.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoldListResponse {
    /// Holds matching the filter, newest first.
    pub data: Vec<HoldDto>,
    /// Total settled balance in minor units.
    pub total_balance: u64,
    /// Available balance in minor units.
    pub available_balance: u64,
    /// Sum of Active hold amounts in minor units.
    pub total_hold_amount: u64,
    /// Number of currently Active holds (unfiltered).
    pub active_holds_count: usize,
}
