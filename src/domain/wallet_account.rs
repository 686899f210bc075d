//! Per-wallet state machine: balance projection, holds, and settlements.
//!
//! A [`WalletAccount`] is the unit of serialization. Every mutating method
//! runs while the caller owns the wallet's write lock (see
//! [`super::WalletRegistry`]), so precondition checks and state writes are
//! a single atomic step per wallet. Distinct wallets never contend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::amount::Amount;
use super::entry::{EntrySource, EntryType, LedgerEntry};
use super::hold::{Hold, HoldStatus};
use super::ids::{EntryId, HoldId, ReferralRequestId, UserId, WalletId};
use super::ledger_event::LedgerEvent;
use crate::error::LedgerError;

/// Balance projection served by the read path.
///
/// `hold_amount` is always recomputed from current Active holds, never
/// cached separately, so it cannot drift from the hold table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WalletSummary {
    /// Sum of all settled credits and debits.
    pub total_balance: Amount,
    /// Sum of all Active hold amounts.
    pub hold_amount: Amount,
    /// `total_balance - hold_amount`; the only amount eligible for new
    /// holds or withdrawal.
    pub available_balance: Amount,
}

/// A single wallet's authoritative state.
///
/// `balance` caches the last entry's `balance_after`; the entry list is the
/// audit trail and is never re-summed on the hot path.
#[derive(Debug)]
pub struct WalletAccount {
    /// Wallet identifier (immutable after creation).
    pub wallet_id: WalletId,
    /// Owning user (1:1 with the wallet, immutable).
    pub user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    entries: Vec<LedgerEntry>,
    holds: HashMap<HoldId, Hold>,
    by_request: HashMap<ReferralRequestId, HoldId>,
    balance: Amount,
}

impl WalletAccount {
    /// Creates an empty wallet (zero balance, no holds).
    #[must_use]
    pub fn new(wallet_id: WalletId, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            wallet_id,
            user_id,
            created_at,
            entries: Vec::new(),
            holds: HashMap::new(),
            by_request: HashMap::new(),
            balance: Amount::ZERO,
        }
    }

    /// Total settled balance (cached projection of the last entry).
    #[must_use]
    pub const fn total_balance(&self) -> Amount {
        self.balance
    }

    /// Sum of all Active hold amounts.
    ///
    /// Bounded by `total_balance` via the creation-time check, so the
    /// saturating sum never actually saturates.
    #[must_use]
    pub fn hold_amount(&self) -> Amount {
        self.holds
            .values()
            .filter(|h| h.is_active())
            .fold(Amount::ZERO, |acc, h| acc.saturating_add(h.amount))
    }

    /// `total_balance - hold_amount`.
    #[must_use]
    pub fn available_balance(&self) -> Amount {
        self.balance.saturating_sub(self.hold_amount())
    }

    /// Number of Active holds.
    #[must_use]
    pub fn active_holds_count(&self) -> usize {
        self.holds.values().filter(|h| h.is_active()).count()
    }

    /// Builds the balance projection for API responses.
    #[must_use]
    pub fn summary(&self) -> WalletSummary {
        let hold_amount = self.hold_amount();
        WalletSummary {
            total_balance: self.balance,
            hold_amount,
            available_balance: self.balance.saturating_sub(hold_amount),
        }
    }

    /// The immutable audit trail, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Looks up a hold by ID.
    #[must_use]
    pub fn hold(&self, hold_id: HoldId) -> Option<&Hold> {
        self.holds.get(&hold_id)
    }

    /// Looks up the hold currently indexed for a referral request.
    #[must_use]
    pub fn hold_for_request(&self, request_id: ReferralRequestId) -> Option<&Hold> {
        self.by_request.get(&request_id).and_then(|id| self.holds.get(id))
    }

    /// Returns holds, optionally filtered by status, newest first.
    #[must_use]
    pub fn holds_filtered(&self, status: Option<HoldStatus>) -> Vec<Hold> {
        let mut holds: Vec<Hold> = self
            .holds
            .values()
            .filter(|h| status.is_none_or(|s| h.status == s))
            .cloned()
            .collect();
        holds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        holds
    }

    /// IDs of Active holds whose deadline has passed.
    #[must_use]
    pub fn expired_holds(&self, now: DateTime<Utc>) -> Vec<HoldId> {
        self.holds
            .values()
            .filter(|h| h.is_expired(now))
            .map(|h| h.hold_id)
            .collect()
    }

    /// Appends a ledger entry and updates the cached balance.
    ///
    /// Debits without a related hold (withdrawals) are bounded by the
    /// *available* balance; hold-conversion debits are bounded by the total
    /// balance since their reservation is already excluded from available.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] for a zero amount.
    /// - [`LedgerError::InvalidRequest`] if the source does not match the
    ///   entry direction.
    /// - [`LedgerError::InsufficientBalance`] when a withdrawal exceeds the
    ///   available balance.
    /// - [`LedgerError::BalanceOverflow`] when a credit overflows.
    pub fn append_entry(
        &mut self,
        entry_type: EntryType,
        amount: Amount,
        source: EntrySource,
        related_hold_id: Option<HoldId>,
        now: DateTime<Utc>,
    ) -> Result<LedgerEntry, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        if !source.allows(entry_type) {
            return Err(LedgerError::InvalidRequest(format!(
                "source {source:?} is not valid for {entry_type:?} entries"
            )));
        }

        let balance_after = match entry_type {
            EntryType::Credit => self
                .balance
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?,
            EntryType::Debit => {
                if related_hold_id.is_none() {
                    let available = self.available_balance();
                    if available < amount {
                        return Err(LedgerError::InsufficientBalance {
                            current_balance: available,
                            required_amount: amount,
                        });
                    }
                }
                self.balance.checked_sub(amount).ok_or_else(|| {
                    LedgerError::Internal("debit exceeds total balance".to_string())
                })?
            }
        };

        let entry = LedgerEntry {
            entry_id: EntryId::new(),
            wallet_id: self.wallet_id,
            entry_type,
            amount,
            source,
            balance_after,
            related_hold_id,
            created_at: now,
        };
        self.balance = balance_after;
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Reserves funds for a referral request.
    ///
    /// Writes no ledger entry: the amount is reserved, not spent.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] for a zero amount.
    /// - [`LedgerError::DuplicateHold`] if an Active hold already covers
    ///   this referral request (carries the existing hold's ID).
    /// - [`LedgerError::InsufficientBalance`] if the available balance is
    ///   below `amount` (carries the exact shortfall).
    pub fn create_hold(
        &mut self,
        request_id: ReferralRequestId,
        amount: Amount,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Hold, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        if let Some(existing) = self.hold_for_request(request_id)
            && existing.is_active()
        {
            return Err(LedgerError::DuplicateHold {
                hold_id: existing.hold_id,
            });
        }
        let available = self.available_balance();
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                current_balance: available,
                required_amount: amount,
            });
        }

        let hold = Hold::new(self.wallet_id, request_id, amount, now, expires_at);
        self.by_request.insert(request_id, hold.hold_id);
        self.holds.insert(hold.hold_id, hold.clone());
        Ok(hold)
    }

    /// Settles a hold into a charge: Active → Converted plus exactly one
    /// Debit entry with `related_hold_id` set, in one atomic step.
    ///
    /// This is the only path by which `total_balance` decreases for a
    /// referral.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::HoldNotFound`] for an unknown hold ID.
    /// - [`LedgerError::HoldNotActive`] if the hold is already terminal;
    ///   callers racing on resolution treat this as losing the race.
    pub fn convert_hold(
        &mut self,
        hold_id: HoldId,
        now: DateTime<Utc>,
    ) -> Result<(Hold, LedgerEntry), LedgerError> {
        let amount = {
            let hold = self
                .holds
                .get(&hold_id)
                .ok_or(LedgerError::HoldNotFound(hold_id))?;
            if !hold.is_active() {
                return Err(LedgerError::HoldNotActive(hold_id));
            }
            hold.amount
        };

        // All fallible checks happen before any mutation.
        let entry = self.append_entry(
            EntryType::Debit,
            amount,
            EntrySource::ReferralCharge,
            Some(hold_id),
            now,
        )?;

        let hold = self
            .holds
            .get_mut(&hold_id)
            .ok_or(LedgerError::HoldNotFound(hold_id))?;
        hold.status = HoldStatus::Converted;
        hold.converted_at = Some(now);
        Ok((hold.clone(), entry))
    }

    /// Releases a hold: Active → Released, no ledger entry. The funds count
    /// toward the available balance again as soon as the status flips.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::HoldNotFound`] for an unknown hold ID.
    /// - [`LedgerError::HoldNotActive`] if the hold is already terminal.
    pub fn release_hold(&mut self, hold_id: HoldId, now: DateTime<Utc>) -> Result<Hold, LedgerError> {
        let hold = self
            .holds
            .get_mut(&hold_id)
            .ok_or(LedgerError::HoldNotFound(hold_id))?;
        if !hold.is_active() {
            return Err(LedgerError::HoldNotActive(hold_id));
        }
        hold.status = HoldStatus::Released;
        hold.released_at = Some(now);
        Ok(hold.clone())
    }

    /// Re-applies a journaled event during startup recovery.
    ///
    /// The journal is trusted: entries and holds are installed as recorded,
    /// without re-running precondition checks.
    pub fn apply_event(&mut self, event: &LedgerEvent) {
        match event {
            LedgerEvent::WalletCreated { .. } => {}
            LedgerEvent::EntryAppended { entry, .. } => {
                self.balance = entry.balance_after;
                self.entries.push(entry.clone());
            }
            LedgerEvent::HoldCreated { hold, .. } => {
                self.by_request.insert(hold.referral_request_id, hold.hold_id);
                self.holds.insert(hold.hold_id, hold.clone());
            }
            LedgerEvent::HoldConverted {
                hold_id,
                entry,
                timestamp,
                ..
            } => {
                if let Some(hold) = self.holds.get_mut(hold_id) {
                    hold.status = HoldStatus::Converted;
                    hold.converted_at = Some(*timestamp);
                }
                self.balance = entry.balance_after;
                self.entries.push(entry.clone());
            }
            LedgerEvent::HoldReleased {
                hold_id, timestamp, ..
            } => {
                if let Some(hold) = self.holds.get_mut(hold_id) {
                    hold.status = HoldStatus::Released;
                    hold.released_at = Some(*timestamp);
                }
            }
        }
    }
}
