//! Ledger service: orchestrates wallet operations and emits events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Amount, EntrySource, EntryType, EventBus, Hold, HoldId, HoldStatus, LedgerEntry, LedgerEvent,
    ReferralRequestId, UserId, WalletAccount, WalletId, WalletRegistry, WalletSummary,
};
use crate::error::LedgerError;

/// Wallet metadata returned from wallet creation.
#[derive(Debug, Clone, Copy)]
pub struct WalletInfo {
    /// The new wallet's identifier.
    pub wallet_id: WalletId,
    /// Owning user.
    pub user_id: UserId,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<Utc>,
}

/// Holds listing combined with the balance projection, as served by
/// `GET /wallets/{id}/holds`.
#[derive(Debug, Clone)]
pub struct HoldListing {
    /// Holds matching the requested status filter, newest first.
    pub holds: Vec<Hold>,
    /// Balance projection at listing time.
    pub summary: WalletSummary,
    /// Number of currently Active holds (unfiltered).
    pub active_holds_count: usize,
}

/// Result of one sweeper pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOutcome {
    /// Holds released in this pass.
    pub released: usize,
    /// Holds whose release failed and was skipped.
    pub failed: usize,
}

/// Orchestration layer for all ledger operations.
///
/// Stateless coordinator: owns references to [`WalletRegistry`] for state
/// and [`EventBus`] for event emission. Every mutation method follows the
/// pattern: acquire the wallet's write lock → run the state machine →
/// release the lock → emit events → return the result.
#[derive(Debug, Clone)]
pub struct LedgerService {
    registry: Arc<WalletRegistry>,
    event_bus: EventBus,
    hold_window: chrono::Duration,
}

impl LedgerService {
    /// Creates a new `LedgerService` with the configured hold window.
    #[must_use]
    pub fn new(
        registry: Arc<WalletRegistry>,
        event_bus: EventBus,
        hold_window: chrono::Duration,
    ) -> Self {
        Self {
            registry,
            event_bus,
            hold_window,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Creates a zero-balance wallet for a user (signup hook).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletAlreadyExists`] if the user already
    /// has a wallet.
    pub async fn create_wallet(&self, user_id: UserId) -> Result<WalletInfo, LedgerError> {
        let now = Utc::now();
        let account = WalletAccount::new(WalletId::new(), user_id, now);
        let wallet_id = self.registry.insert(account).await?;

        let _ = self.event_bus.publish(LedgerEvent::WalletCreated {
            wallet_id,
            user_id,
            timestamp: now,
        });

        tracing::info!(%wallet_id, %user_id, "wallet created");
        Ok(WalletInfo {
            wallet_id,
            user_id,
            created_at: now,
        })
    }

    /// Appends a credit entry (recharge, promo bonus, or refund).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the wallet is unknown, the amount is
    /// zero, the source is a debit source, or the balance would overflow.
    pub async fn credit(
        &self,
        wallet_id: WalletId,
        amount: Amount,
        source: EntrySource,
    ) -> Result<LedgerEntry, LedgerError> {
        let now = Utc::now();
        let account_lock = self.registry.get(wallet_id).await?;
        let mut account = account_lock.write().await;
        let entry = account.append_entry(EntryType::Credit, amount, source, None, now)?;
        drop(account);

        let _ = self.event_bus.publish(LedgerEvent::EntryAppended {
            wallet_id,
            entry: entry.clone(),
            timestamp: now,
        });

        tracing::info!(%wallet_id, %amount, ?source, balance_after = %entry.balance_after, "credit appended");
        Ok(entry)
    }

    /// Appends a withdrawal payout debit, bounded by the available balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] when the withdrawal
    /// exceeds the available balance, or other [`LedgerError`] variants
    /// for unknown wallets and invalid amounts.
    pub async fn withdraw(
        &self,
        wallet_id: WalletId,
        amount: Amount,
    ) -> Result<LedgerEntry, LedgerError> {
        let now = Utc::now();
        let account_lock = self.registry.get(wallet_id).await?;
        let mut account = account_lock.write().await;
        let entry = account.append_entry(
            EntryType::Debit,
            amount,
            EntrySource::WithdrawalPayout,
            None,
            now,
        )?;
        drop(account);

        let _ = self.event_bus.publish(LedgerEvent::EntryAppended {
            wallet_id,
            entry: entry.clone(),
            timestamp: now,
        });

        tracing::info!(%wallet_id, %amount, balance_after = %entry.balance_after, "withdrawal appended");
        Ok(entry)
    }

    /// Reserves funds for a referral request.
    ///
    /// The duplicate check and the available-balance check run under the
    /// same wallet lock that guards ledger appends, so two concurrent
    /// submissions cannot both pass the funds check.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::DuplicateHold`] if an Active hold already covers
    ///   this referral request.
    /// - [`LedgerError::InsufficientBalance`] with the exact shortfall.
    /// - Other [`LedgerError`] variants for unknown wallets and invalid
    ///   amounts.
    pub async fn create_hold(
        &self,
        wallet_id: WalletId,
        request_id: ReferralRequestId,
        amount: Amount,
    ) -> Result<Hold, LedgerError> {
        let now = Utc::now();
        let expires_at = now + self.hold_window;

        let account_lock = self.registry.get(wallet_id).await?;
        let mut account = account_lock.write().await;
        let hold = account.create_hold(request_id, amount, now, expires_at)?;
        // Indexed while the wallet lock is still held: the moment the hold
        // is visible, an outcome callback must be able to route to it.
        self.registry.index_request(request_id, wallet_id).await;
        drop(account);

        let _ = self.event_bus.publish(LedgerEvent::HoldCreated {
            wallet_id,
            hold: hold.clone(),
            timestamp: now,
        });

        tracing::info!(
            %wallet_id,
            hold_id = %hold.hold_id,
            referral_request_id = %request_id,
            %amount,
            expires_at = %hold.expires_at,
            "hold created"
        );
        Ok(hold)
    }

    /// Converts the hold backing a fulfilled referral into a charge.
    ///
    /// Invoked by the referral subsystem's outcome callback.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::RequestNotFound`] if no hold was ever created for
    ///   the request.
    /// - [`LedgerError::HoldNotActive`] if the hold was already resolved
    ///   (race lost; the caller logs and moves on).
    pub async fn on_referral_fulfilled(
        &self,
        request_id: ReferralRequestId,
    ) -> Result<LedgerEntry, LedgerError> {
        let wallet_id = self.registry.wallet_for_request(request_id).await?;
        let now = Utc::now();

        let account_lock = self.registry.get(wallet_id).await?;
        let mut account = account_lock.write().await;
        let hold_id = account
            .hold_for_request(request_id)
            .map(|h| h.hold_id)
            .ok_or(LedgerError::RequestNotFound(request_id))?;
        let (hold, entry) = account.convert_hold(hold_id, now)?;
        drop(account);

        let _ = self.event_bus.publish(LedgerEvent::HoldConverted {
            wallet_id,
            hold_id: hold.hold_id,
            referral_request_id: request_id,
            entry: entry.clone(),
            timestamp: now,
        });

        tracing::info!(
            %wallet_id,
            hold_id = %hold.hold_id,
            referral_request_id = %request_id,
            amount = %entry.amount,
            "hold converted"
        );
        Ok(entry)
    }

    /// Releases the hold backing a cancelled or expired referral.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::RequestNotFound`] if no hold was ever created for
    ///   the request.
    /// - [`LedgerError::HoldNotActive`] if the hold was already resolved.
    pub async fn on_referral_cancelled(
        &self,
        request_id: ReferralRequestId,
    ) -> Result<Hold, LedgerError> {
        let wallet_id = self.registry.wallet_for_request(request_id).await?;
        let account_lock = self.registry.get(wallet_id).await?;
        let mut account = account_lock.write().await;
        let hold_id = account
            .hold_for_request(request_id)
            .map(|h| h.hold_id)
            .ok_or(LedgerError::RequestNotFound(request_id))?;
        let now = Utc::now();
        let hold = account.release_hold(hold_id, now)?;
        drop(account);

        let _ = self.event_bus.publish(LedgerEvent::HoldReleased {
            wallet_id,
            hold_id: hold.hold_id,
            referral_request_id: request_id,
            expired: false,
            timestamp: now,
        });

        tracing::info!(
            %wallet_id,
            hold_id = %hold.hold_id,
            referral_request_id = %request_id,
            "hold released"
        );
        Ok(hold)
    }

    /// Looks up a hold by wallet and hold ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletNotFound`] or
    /// [`LedgerError::HoldNotFound`].
    pub async fn hold(&self, wallet_id: WalletId, hold_id: HoldId) -> Result<Hold, LedgerError> {
        let account_lock = self.registry.get(wallet_id).await?;
        let account = account_lock.read().await;
        account
            .hold(hold_id)
            .cloned()
            .ok_or(LedgerError::HoldNotFound(hold_id))
    }

    /// Balance projection for `GET /wallets/{id}/balance`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletNotFound`] for an unknown wallet.
    pub async fn wallet_summary(&self, wallet_id: WalletId) -> Result<WalletSummary, LedgerError> {
        let account_lock = self.registry.get(wallet_id).await?;
        let account = account_lock.read().await;
        Ok(account.summary())
    }

    /// Holds listing with summary for `GET /wallets/{id}/holds`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletNotFound`] for an unknown wallet.
    pub async fn holds(
        &self,
        wallet_id: WalletId,
        status: Option<HoldStatus>,
    ) -> Result<HoldListing, LedgerError> {
        let account_lock = self.registry.get(wallet_id).await?;
        let account = account_lock.read().await;
        Ok(HoldListing {
            holds: account.holds_filtered(status),
            summary: account.summary(),
            active_holds_count: account.active_holds_count(),
        })
    }

    /// Full audit trail for `GET /wallets/{id}/entries`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletNotFound`] for an unknown wallet.
    pub async fn entries(&self, wallet_id: WalletId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let account_lock = self.registry.get(wallet_id).await?;
        let account = account_lock.read().await;
        Ok(account.entries().to_vec())
    }

    /// Releases every Active hold past its deadline.
    ///
    /// Each hold is processed independently: a failure is logged and
    /// skipped so one bad row never blocks the rest of the pass. Safe to
    /// run concurrently with explicit resolutions because `release_hold`
    /// rejects non-Active holds.
    pub async fn sweep_expired(&self) -> SweepOutcome {
        let now = Utc::now();
        let mut outcome = SweepOutcome::default();

        for wallet_id in self.registry.wallet_ids().await {
            let Ok(account_lock) = self.registry.get(wallet_id).await else {
                continue;
            };
            let mut account = account_lock.write().await;
            let expired = account.expired_holds(now);
            let mut released = Vec::with_capacity(expired.len());
            for hold_id in expired {
                match account.release_hold(hold_id, now) {
                    Ok(hold) => released.push(hold),
                    Err(err) => {
                        outcome.failed += 1;
                        tracing::warn!(%wallet_id, %hold_id, %err, "expiry release failed; skipping");
                    }
                }
            }
            drop(account);

            for hold in released {
                outcome.released += 1;
                let _ = self.event_bus.publish(LedgerEvent::HoldReleased {
                    wallet_id,
                    hold_id: hold.hold_id,
                    referral_request_id: hold.referral_request_id,
                    expired: true,
                    timestamp: now,
                });
                tracing::info!(
                    %wallet_id,
                    hold_id = %hold.hold_id,
                    expires_at = %hold.expires_at,
                    "expired hold released"
                );
            }
        }

        outcome
    }

    /// Rebuilds in-memory state from the journaled event stream.
    ///
    /// Events are applied in journal order. Malformed or orphaned events
    /// are logged and skipped; recovery never halts on one bad record.
    /// Returns the number of events applied.
    pub async fn restore_from_events(&self, events: Vec<LedgerEvent>) -> usize {
        let mut applied = 0;
        for event in events {
            match &event {
                LedgerEvent::WalletCreated {
                    wallet_id,
                    user_id,
                    timestamp,
                } => {
                    let account = WalletAccount::new(*wallet_id, *user_id, *timestamp);
                    if let Err(err) = self.registry.insert(account).await {
                        tracing::warn!(%wallet_id, %err, "skipping wallet_created during replay");
                        continue;
                    }
                    applied += 1;
                }
                other => {
                    let wallet_id = other.wallet_id();
                    let Ok(account_lock) = self.registry.get(wallet_id).await else {
                        tracing::warn!(
                            %wallet_id,
                            event_type = other.event_type_str(),
                            "skipping orphaned event during replay"
                        );
                        continue;
                    };
                    if let LedgerEvent::HoldCreated { hold, .. } = other {
                        self.registry
                            .index_request(hold.referral_request_id, wallet_id)
                            .await;
                    }
                    let mut account = account_lock.write().await;
                    account.apply_event(other);
                    applied += 1;
                }
            }
        }
        applied
    }
}
