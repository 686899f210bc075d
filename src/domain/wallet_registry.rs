//! Concurrent wallet storage with per-wallet fine-grained locking.
//!
//! [`WalletRegistry`] stores all wallets in a `HashMap` where each entry
//! is individually protected by a [`tokio::sync::RwLock`]. All mutations
//! to one wallet's balance or holds serialize on that wallet's lock while
//! different wallets proceed fully in parallel — the process-local
//! equivalent of a per-row database lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ids::{ReferralRequestId, UserId, WalletId};
use super::wallet_account::WalletAccount;
use crate::error::LedgerError;

/// Central store for all wallets.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<WalletAccount>>` for fine-grained per-wallet locking.
/// Two secondary indexes route external identifiers to wallets: the
/// user index enforces the 1:1 wallet-per-user rule and the referral
/// request index routes outcome callbacks to the owning wallet.
///
/// # Concurrency
///
/// - Multiple tasks may read the same wallet concurrently.
/// - Writes to different wallets are concurrent.
/// - Writes to the same wallet are serialized.
#[derive(Debug)]
pub struct WalletRegistry {
    wallets: RwLock<HashMap<WalletId, Arc<RwLock<WalletAccount>>>>,
    by_user: RwLock<HashMap<UserId, WalletId>>,
    by_request: RwLock<HashMap<ReferralRequestId, WalletId>>,
}

impl WalletRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wallets: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
            by_request: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a wallet, enforcing one wallet per user.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletAlreadyExists`] if the user already
    /// has a wallet.
    pub async fn insert(&self, account: WalletAccount) -> Result<WalletId, LedgerError> {
        let wallet_id = account.wallet_id;
        let user_id = account.user_id;

        let mut users = self.by_user.write().await;
        if users.contains_key(&user_id) {
            return Err(LedgerError::WalletAlreadyExists(user_id));
        }
        users.insert(user_id, wallet_id);
        drop(users);

        let mut map = self.wallets.write().await;
        map.insert(wallet_id, Arc::new(RwLock::new(account)));
        Ok(wallet_id)
    }

    /// Returns a shared handle to the wallet behind its per-wallet lock.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WalletNotFound`] if no wallet with the given
    /// ID exists.
    pub async fn get(
        &self,
        wallet_id: WalletId,
    ) -> Result<Arc<RwLock<WalletAccount>>, LedgerError> {
        let map = self.wallets.read().await;
        map.get(&wallet_id)
            .cloned()
            .ok_or(LedgerError::WalletNotFound(wallet_id))
    }

    /// Resolves a user's wallet.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] if the user has no wallet.
    pub async fn wallet_for_user(&self, user_id: UserId) -> Result<WalletId, LedgerError> {
        let users = self.by_user.read().await;
        users
            .get(&user_id)
            .copied()
            .ok_or_else(|| LedgerError::InvalidRequest(format!("no wallet for user {user_id}")))
    }

    /// Records which wallet holds funds for a referral request, so outcome
    /// callbacks can be routed without a scan.
    pub async fn index_request(&self, request_id: ReferralRequestId, wallet_id: WalletId) {
        let mut requests = self.by_request.write().await;
        requests.insert(request_id, wallet_id);
    }

    /// Resolves the wallet that reserved funds for a referral request.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::RequestNotFound`] if no hold was ever
    /// indexed for the request.
    pub async fn wallet_for_request(
        &self,
        request_id: ReferralRequestId,
    ) -> Result<WalletId, LedgerError> {
        let requests = self.by_request.read().await;
        requests
            .get(&request_id)
            .copied()
            .ok_or(LedgerError::RequestNotFound(request_id))
    }

    /// Snapshot of all wallet IDs, for the sweeper's scan.
    pub async fn wallet_ids(&self) -> Vec<WalletId> {
        self.wallets.read().await.keys().copied().collect()
    }

    /// Returns the number of wallets in the registry.
    pub async fn len(&self) -> usize {
        self.wallets.read().await.len()
    }

    /// Returns `true` if the registry contains no wallets.
    pub async fn is_empty(&self) -> bool {
        self.wallets.read().await.is_empty()
    }
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_account() -> WalletAccount {
        WalletAccount::new(WalletId::new(), UserId::new(), Utc::now())
    }

    #[tokio::test]
    async fn insert_and_get() {
        let registry = WalletRegistry::new();
        let account = make_account();
        let id = account.wallet_id;

        let result = registry.insert(account).await;
        let Ok(inserted) = result else {
            panic!("insert failed");
        };
        assert_eq!(inserted, id);

        let fetched = registry.get(id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let registry = WalletRegistry::new();
        let result = registry.get(WalletId::new()).await;
        assert!(matches!(result, Err(LedgerError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn one_wallet_per_user() {
        let registry = WalletRegistry::new();
        let user_id = UserId::new();
        let first = WalletAccount::new(WalletId::new(), user_id, Utc::now());
        let second = WalletAccount::new(WalletId::new(), user_id, Utc::now());

        assert!(registry.insert(first).await.is_ok());
        let result = registry.insert(second).await;
        assert!(matches!(result, Err(LedgerError::WalletAlreadyExists(_))));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn user_index_resolves_wallet() {
        let registry = WalletRegistry::new();
        let account = make_account();
        let user_id = account.user_id;
        let wallet_id = account.wallet_id;
        let _ = registry.insert(account).await;

        let resolved = registry.wallet_for_user(user_id).await;
        let Ok(resolved) = resolved else {
            panic!("lookup failed");
        };
        assert_eq!(resolved, wallet_id);
    }

    #[tokio::test]
    async fn request_index_routes_callbacks() {
        let registry = WalletRegistry::new();
        let account = make_account();
        let wallet_id = account.wallet_id;
        let _ = registry.insert(account).await;

        let request_id = ReferralRequestId::new();
        assert!(matches!(
            registry.wallet_for_request(request_id).await,
            Err(LedgerError::RequestNotFound(_))
        ));

        registry.index_request(request_id, wallet_id).await;
        let resolved = registry.wallet_for_request(request_id).await;
        let Ok(resolved) = resolved else {
            panic!("lookup failed");
        };
        assert_eq!(resolved, wallet_id);
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = WalletRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let _ = registry.insert(make_account()).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }
}
