//! Domain events reflecting ledger state mutations.
//!
//! Every mutation emits a [`LedgerEvent`] through the [`super::EventBus`].
//! Events are also the durable journal records: the persistence writer
//! appends them to PostgreSQL and startup recovery replays them, so the
//! enum derives `Deserialize` as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;
use super::hold::Hold;
use super::ids::{HoldId, ReferralRequestId, UserId, WalletId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Emitted when a wallet is created at user signup.
    WalletCreated {
        /// Wallet identifier.
        wallet_id: WalletId,
        /// Owning user.
        user_id: UserId,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted for every non-conversion ledger entry (recharge, promo,
    /// refund, withdrawal payout).
    EntryAppended {
        /// Wallet the entry belongs to.
        wallet_id: WalletId,
        /// The appended entry, including its `balance_after` projection.
        entry: LedgerEntry,
        /// Append timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when funds are reserved for a referral request.
    HoldCreated {
        /// Wallet whose funds are reserved.
        wallet_id: WalletId,
        /// The new Active hold.
        hold: Hold,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a hold is settled into a charge. Carries the Debit
    /// entry so the event alone reconstructs the transition on replay.
    HoldConverted {
        /// Wallet the hold belongs to.
        wallet_id: WalletId,
        /// The converted hold.
        hold_id: HoldId,
        /// Referral request the hold backed.
        referral_request_id: ReferralRequestId,
        /// The Debit entry realized by the conversion.
        entry: LedgerEntry,
        /// Conversion timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a hold is released, either explicitly or by the
    /// expiry sweeper.
    HoldReleased {
        /// Wallet the hold belongs to.
        wallet_id: WalletId,
        /// The released hold.
        hold_id: HoldId,
        /// Referral request the hold backed.
        referral_request_id: ReferralRequestId,
        /// `true` when the sweeper released a hold past its deadline.
        expired: bool,
        /// Release timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Returns the wallet ID associated with this event.
    #[must_use]
    pub const fn wallet_id(&self) -> WalletId {
        match self {
            Self::WalletCreated { wallet_id, .. }
            | Self::EntryAppended { wallet_id, .. }
            | Self::HoldCreated { wallet_id, .. }
            | Self::HoldConverted { wallet_id, .. }
            | Self::HoldReleased { wallet_id, .. } => *wallet_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::WalletCreated { .. } => "wallet_created",
            Self::EntryAppended { .. } => "entry_appended",
            Self::HoldCreated { .. } => "hold_created",
            Self::HoldConverted { .. } => "hold_converted",
            Self::HoldReleased { .. } => "hold_released",
        }
    }
}
