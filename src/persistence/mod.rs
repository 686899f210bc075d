//! Persistence layer: PostgreSQL event journal.
//!
//! Durable storage for the ledger's event stream. A background writer
//! subscribed to the event bus appends every mutation to the
//! `ledger_events` table, and startup recovery replays the journal to
//! rebuild in-memory wallet state. The concrete implementation uses
//! `sqlx::PgPool` for async PostgreSQL access.

pub mod models;
pub mod postgres;
pub mod writer;

pub use models::StoredEvent;
pub use postgres::LedgerJournal;
