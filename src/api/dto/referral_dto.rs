//! Referral-request billing DTOs.

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for `POST /referral-requests`.
///
/// `referral_request_id` is assigned by the referral subsystem before
/// submission, so a retried submit carries the same ID and lands on the
/// existing hold instead of reserving twice.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReferralHoldRequest {
    /// Wallet funding the referral request.
    pub wallet_id: Uuid,
    /// Referral request the hold backs.
    pub referral_request_id: Uuid,
    /// Amount to reserve, in minor units.
    pub amount: u64,
}
