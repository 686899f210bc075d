//! PostgreSQL implementation of the ledger event journal.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::StoredEvent;
use crate::error::LedgerError;

/// PostgreSQL-backed event journal using `sqlx::PgPool`.
///
/// The journal is append-only: every [`crate::domain::LedgerEvent`] is
/// stored as one row, and replaying the rows in ID order reconstructs all
/// wallet state (see `LedgerService::restore_from_events`). Rows are never
/// deleted; the journal is the sole durable record, so truncating it would
/// lose wallets and holds on the next restart.
#[derive(Debug, Clone)]
pub struct LedgerJournal {
    pool: PgPool,
}

impl LedgerJournal {
    /// Creates a new journal with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an event to the journal.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] on database failure.
    pub async fn save_event(
        &self,
        wallet_id: Uuid,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, LedgerError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO ledger_events (wallet_id, event_type, payload) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(wallet_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Loads all journaled events in append order, for startup replay.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] on database failure.
    pub async fn load_all_events(&self) -> Result<Vec<StoredEvent>, LedgerError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
            "SELECT id, wallet_id, event_type, payload, created_at FROM ledger_events \
             ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, wallet_id, event_type, payload, created_at)| StoredEvent {
                id,
                wallet_id,
                event_type,
                payload,
                created_at,
            })
            .collect())
    }

}
