//! Wallet, balance, and ledger-entry DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::PaginationMeta;
use crate::domain::LedgerEntry;
use crate::service::WalletInfo;

/// Request body for `POST /wallets`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Owning user; wallets are 1:1 with users.
    pub user_id: Uuid,
}

/// Response body for `POST /wallets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletResponse {
    /// New wallet identifier.
    pub wallet_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Starting balance in minor units (always 0).
    pub total_balance: u64,
}

impl From<WalletInfo> for WalletResponse {
    fn from(info: WalletInfo) -> Self {
        Self {
            wallet_id: info.wallet_id.into(),
            user_id: info.user_id.into(),
            created_at: info.created_at,
            total_balance: 0,
        }
    }
}

/// Response body for `GET /wallets/{id}/balance`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Sum of all settled credits and debits, in minor units.
    pub total_balance: u64,
    /// Sum of all Active hold amounts, in minor units.
    pub hold_amount: u64,
    /// `total_balance - hold_amount`, in minor units.
    pub available_balance: u64,
    /// ISO-4217 currency code.
    pub currency_code: String,
}

/// Request body for `POST /wallets/{id}/recharge`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RechargeRequest {
    /// Credit amount in minor units; must be positive.
    pub amount: u64,
    /// Credit source: `"Recharge"` (default), `"PromoBonus"`, or
    /// `"Refund"`.
    #[serde(default)]
    pub source: Option<String>,
}

/// Request body for `POST /wallets/{id}/withdrawals`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawalRequest {
    /// Payout amount in minor units; bounded by the available balance.
    pub amount: u64,
}

/// One ledger entry as served in API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryDto {
    /// Entry identifier.
    pub entry_id: Uuid,
    /// Wallet the entry belongs to.
    pub wallet_id: Uuid,
    /// `"Credit"` or `"Debit"`.
    pub entry_type: &'static str,
    /// Amount moved, in minor units.
    pub amount: u64,
    /// Business origin (e.g. `"Recharge"`, `"ReferralCharge"`).
    pub source: &'static str,
    /// Wallet balance immediately after this entry.
    pub balance_after: u64,
    /// Hold that produced this entry, for conversion debits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_hold_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&LedgerEntry> for EntryDto {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            entry_id: entry.entry_id.into(),
            wallet_id: entry.wallet_id.into(),
            entry_type: entry.entry_type.as_str(),
            amount: entry.amount.minor(),
            source: entry.source.as_str(),
            balance_after: entry.balance_after.minor(),
            related_hold_id: entry.related_hold_id.map(Into::into),
            created_at: entry.created_at,
        }
    }
}

/// Response body for `GET /wallets/{id}/entries`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryListResponse {
    /// Entries for the requested page, oldest first.
    pub data: Vec<EntryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
