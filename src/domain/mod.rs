//! Domain layer: ledger types, wallet registry, and event system.
//!
//! This module contains the server-side domain model: identifier and
//! amount newtypes, immutable ledger entries, holds and their lifecycle,
//! the per-wallet state machine, the wallet registry for concurrent
//! storage, and the event bus broadcasting every mutation.

pub mod amount;
pub mod entry;
pub mod event_bus;
pub mod hold;
pub mod ids;
pub mod ledger_event;
pub mod wallet_account;
pub mod wallet_registry;

pub use amount::Amount;
pub use entry::{EntrySource, EntryType, LedgerEntry};
pub use event_bus::EventBus;
pub use hold::{Hold, HoldStatus};
pub use ids::{EntryId, HoldId, ReferralRequestId, UserId, WalletId};
pub use ledger_event::LedgerEvent;
pub use wallet_account::{WalletAccount, WalletSummary};
pub use wallet_registry::WalletRegistry;
