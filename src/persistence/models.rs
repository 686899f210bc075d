//! Database models for the ledger event journal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A journaled event row from the `ledger_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Auto-increment row ID; replay order.
    pub id: i64,
    /// Wallet that generated the event.
    pub wallet_id: Uuid,
    /// Event type discriminator (e.g. `"hold_converted"`).
    pub event_type: String,
    /// JSONB payload: the full serialized [`crate::domain::LedgerEvent`].
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}
