//! Write-behind journal writer subscribed to the event bus.
//!
//! The writer is the persistence layer's only producer: it receives every
//! [`LedgerEvent`] published by the service and appends it to PostgreSQL.
//! Journal writes are off the request path, so a slow database never
//! blocks a wallet operation; a crash can lose the tail of the journal,
//! which a deployment accepts by enabling this mode.

use tokio::sync::broadcast;

use super::postgres::LedgerJournal;
use crate::domain::LedgerEvent;

/// Consumes events from the bus and journals each one.
///
/// Per-event failures are logged and skipped. A lagged receiver (bus ring
/// buffer overrun) is logged with the number of lost events and the loop
/// continues with the next available event. Returns when the bus closes.
pub async fn run(journal: LedgerJournal, mut rx: broadcast::Receiver<LedgerEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let wallet_id = *event.wallet_id().as_uuid();
                let event_type = event.event_type_str();
                let payload = match serde_json::to_value(&event) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::warn!(%wallet_id, event_type, %err, "event serialization failed");
                        continue;
                    }
                };
                if let Err(err) = journal.save_event(wallet_id, event_type, &payload).await {
                    tracing::warn!(%wallet_id, event_type, %err, "journal append failed");
                }
            }
            Err(broadcast::error::RecvError::Lagged(lost)) => {
                tracing::warn!(lost, "journal writer lagged; events lost");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("event bus closed; journal writer stopping");
                return;
            }
        }
    }
}
