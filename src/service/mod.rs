//! Service layer: ledger orchestration and the expiry sweeper.

pub mod ledger_service;
pub mod sweeper;

pub use ledger_service::{HoldListing, LedgerService, SweepOutcome, WalletInfo};
pub use sweeper::ExpirySweeper;
