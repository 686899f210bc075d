//! Funds holds: reservations against pending referral requests.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::ids::{HoldId, ReferralRequestId, WalletId};

/// Lifecycle state of a hold.
///
/// `Active` is the only non-terminal state. Exactly one transition out of
/// it is permitted: to `Converted` (hold became a charge) or to `Released`
/// (funds returned to the available balance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldStatus {
    /// Funds are reserved; counts toward the wallet's hold amount.
    Active,
    /// Terminal: the hold was settled into a Debit ledger entry.
    Converted,
    /// Terminal: the reservation was cancelled or expired; no ledger entry.
    Released,
}

impl HoldStatus {
    /// Status name as served in API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Converted => "Converted",
            Self::Released => "Released",
        }
    }
}

impl FromStr for HoldStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" | "active" => Ok(Self::Active),
            "Converted" | "converted" => Ok(Self::Converted),
            "Released" | "released" => Ok(Self::Released),
            other => Err(format!("unknown hold status: {other}")),
        }
    }
}

/// A reservation of wallet funds against a pending referral request.
///
/// Creating a hold writes no ledger entry; the amount is reserved, not
/// spent. At most one Active hold may exist per referral request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    /// Unique hold identifier.
    pub hold_id: HoldId,
    /// Wallet whose funds are reserved.
    pub wallet_id: WalletId,
    /// Referral request this hold backs (at most one Active hold each).
    pub referral_request_id: ReferralRequestId,
    /// Reserved amount in minor units.
    pub amount: Amount,
    /// Current lifecycle state.
    pub status: HoldStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Deadline after which the sweeper force-releases the hold.
    pub expires_at: DateTime<Utc>,
    /// Set when the hold was converted into a charge.
    pub converted_at: Option<DateTime<Utc>>,
    /// Set when the hold was released.
    pub released_at: Option<DateTime<Utc>>,
}

impl Hold {
    /// Creates a new Active hold.
    #[must_use]
    pub fn new(
        wallet_id: WalletId,
        referral_request_id: ReferralRequestId,
        amount: Amount,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hold_id: HoldId::new(),
            wallet_id,
            referral_request_id,
            amount,
            status: HoldStatus::Active,
            created_at,
            expires_at,
            converted_at: None,
            released_at: None,
        }
    }

    /// Returns `true` while the hold reserves funds.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, HoldStatus::Active)
    }

    /// Returns `true` if the hold is Active and past its deadline.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.expires_at <= now
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_hold(window: Duration) -> Hold {
        let now = Utc::now();
        Hold::new(
            WalletId::new(),
            ReferralRequestId::new(),
            Amount::from_minor(60),
            now,
            now + window,
        )
    }

    #[test]
    fn new_hold_is_active() {
        let hold = make_hold(Duration::days(14));
        assert!(hold.is_active());
        assert_eq!(hold.status, HoldStatus::Active);
        assert!(hold.converted_at.is_none());
        assert!(hold.released_at.is_none());
    }

    #[test]
    fn expiry_requires_deadline_passed() {
        let hold = make_hold(Duration::days(14));
        assert!(!hold.is_expired(Utc::now()));
        assert!(hold.is_expired(Utc::now() + Duration::days(15)));
    }

    #[test]
    fn terminal_hold_never_reports_expired() {
        let mut hold = make_hold(Duration::days(14));
        hold.status = HoldStatus::Converted;
        assert!(!hold.is_expired(Utc::now() + Duration::days(15)));
    }

    #[test]
    fn status_parses_case_insensitive() {
        assert_eq!(HoldStatus::from_str("Active"), Ok(HoldStatus::Active));
        assert_eq!(HoldStatus::from_str("released"), Ok(HoldStatus::Released));
        assert!(HoldStatus::from_str("Pending").is_err());
    }

    #[test]
    fn status_serializes_as_variant_name() {
        let json = serde_json::to_string(&HoldStatus::Converted).ok();
        assert_eq!(json.as_deref(), Some("\"Converted\""));
    }
}
