//! # wallet-ledger
//!
//! Hold/settlement wallet ledger service for a job-referral marketplace.
//!
//! Job seekers fund referral requests from a prepaid wallet. Submitting a
//! request reserves the fee as a *hold* against the available balance;
//! the hold is later settled into a charge when the referral is
//! fulfilled, released when it is cancelled, or auto-released by the
//! expiry sweeper once its window lapses. Balances are derived from an
//! immutable, append-only ledger — never mutated directly.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP) + Referral subsystem callbacks
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── LedgerService (service/)
//!     ├── ExpirySweeper (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── WalletRegistry → WalletAccount state machines (domain/)
//!     │
//!     └── PostgreSQL event journal (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
