//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::LedgerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ledger service for all business logic.
    pub ledger: Arc<LedgerService>,
    /// Event bus carrying every ledger mutation.
    pub event_bus: EventBus,
    /// ISO-4217 currency code reported in balance responses.
    pub currency_code: String,
    /// Configured hold window, surfaced at `GET /config/billing`.
    pub hold_window_days: i64,
}
