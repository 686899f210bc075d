//! Immutable ledger entries: the wallet's append-only audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::ids::{EntryId, HoldId, WalletId};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// Funds added to the wallet.
    Credit,
    /// Funds removed from the wallet.
    Debit,
}

/// Business origin of a ledger entry.
///
/// Credits come from `Recharge`, `Refund`, or `PromoBonus`; debits from
/// `ReferralCharge` (hold conversion) or `WithdrawalPayout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySource {
    /// User-initiated wallet top-up.
    Recharge,
    /// Charge realized by converting a referral hold.
    ReferralCharge,
    /// Refund credited back to the wallet.
    Refund,
    /// Payout of withdrawn funds.
    WithdrawalPayout,
    /// Promotional bonus credit.
    PromoBonus,
}

impl EntrySource {
    /// Returns `true` if the source is valid for the given entry direction.
    #[must_use]
    pub const fn allows(self, entry_type: EntryType) -> bool {
        match self {
            Self::Recharge | Self::Refund | Self::PromoBonus => {
                matches!(entry_type, EntryType::Credit)
            }
            Self::ReferralCharge | Self::WithdrawalPayout => {
                matches!(entry_type, EntryType::Debit)
            }
        }
    }

    /// Source name as served in API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recharge => "Recharge",
            Self::ReferralCharge => "ReferralCharge",
            Self::Refund => "Refund",
            Self::WithdrawalPayout => "WithdrawalPayout",
            Self::PromoBonus => "PromoBonus",
        }
    }
}

impl EntryType {
    /// Direction name as served in API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
        }
    }
}

/// One immutable row of the wallet's transaction history.
///
/// `balance_after` is the cached balance projection written in the same
/// critical section as the entry itself; reads never re-sum the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier.
    pub entry_id: EntryId,
    /// Wallet this entry belongs to.
    pub wallet_id: WalletId,
    /// Credit or debit.
    pub entry_type: EntryType,
    /// Positive amount moved, in minor units.
    pub amount: Amount,
    /// Business origin of the entry.
    pub source: EntrySource,
    /// Wallet balance immediately after this entry.
    pub balance_after: Amount,
    /// Set only for debits produced by hold conversion.
    pub related_hold_id: Option<HoldId>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_bind_to_directions() {
        assert!(EntrySource::Recharge.allows(EntryType::Credit));
        assert!(EntrySource::PromoBonus.allows(EntryType::Credit));
        assert!(EntrySource::Refund.allows(EntryType::Credit));
        assert!(!EntrySource::Recharge.allows(EntryType::Debit));

        assert!(EntrySource::ReferralCharge.allows(EntryType::Debit));
        assert!(EntrySource::WithdrawalPayout.allows(EntryType::Debit));
        assert!(!EntrySource::ReferralCharge.allows(EntryType::Credit));
    }

    #[test]
    fn entry_serializes_with_variant_names() {
        let entry = LedgerEntry {
            entry_id: EntryId::new(),
            wallet_id: WalletId::new(),
            entry_type: EntryType::Credit,
            amount: Amount::from_minor(100),
            source: EntrySource::Recharge,
            balance_after: Amount::from_minor(100),
            related_hold_id: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).ok();
        let Some(json) = json else {
            return;
        };
        assert!(json.contains("\"Credit\""));
        assert!(json.contains("\"Recharge\""));
    }
}
