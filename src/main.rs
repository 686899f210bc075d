//! wallet-ledger server entry point.
//!
//! Starts the Axum HTTP server, the expiry sweeper, and (when enabled)
//! the PostgreSQL journal writer, after replaying any existing journal
//! into the in-memory wallet registry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use wallet_ledger::api;
use wallet_ledger::app_state::AppState;
use wallet_ledger::config::LedgerConfig;
use wallet_ledger::domain::{EventBus, LedgerEvent, WalletRegistry};
use wallet_ledger::persistence::LedgerJournal;
use wallet_ledger::service::{ExpirySweeper, LedgerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = LedgerConfig::from_env().map_err(|e| anyhow!("configuration error: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting wallet-ledger");

    // Build domain layer
    let registry = Arc::new(WalletRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let ledger = Arc::new(LedgerService::new(
        Arc::clone(&registry),
        event_bus.clone(),
        config.hold_window(),
    ));

    // Persistence: connect, migrate, replay, then start the write-behind
    // journal writer. A failed connection degrades to in-memory operation
    // rather than refusing to start.
    if config.persistence_enabled {
        match connect_journal(&config).await {
            Ok(journal) => {
                match journal.load_all_events().await {
                    Ok(stored) => {
                        let events: Vec<LedgerEvent> = stored
                            .into_iter()
                            .filter_map(|row| {
                                serde_json::from_value(row.payload)
                                    .map_err(|err| {
                                        tracing::warn!(row_id = row.id, %err, "unreadable journal row");
                                    })
                                    .ok()
                            })
                            .collect();
                        let applied = ledger.restore_from_events(events).await;
                        let wallets = registry.len().await;
                        tracing::info!(applied, wallets, "journal replayed");
                    }
                    Err(err) => tracing::warn!(%err, "journal replay failed; starting empty"),
                }

                tokio::spawn(wallet_ledger::persistence::writer::run(
                    journal,
                    event_bus.subscribe(),
                ));
            }
            Err(err) => {
                tracing::warn!(%err, "database unavailable; running without persistence");
            }
        }
    }

    // Start the expiry sweeper
    let sweeper = ExpirySweeper::new(
        Arc::clone(&ledger),
        Duration::from_secs(config.sweep_interval_secs),
    );
    tokio::spawn(sweeper.run());

    // Build application state
    let app_state = AppState {
        ledger,
        event_bus,
        currency_code: config.currency_code.clone(),
        hold_window_days: config.hold_window_days,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to PostgreSQL and applies migrations.
async fn connect_journal(config: &LedgerConfig) -> anyhow::Result<LedgerJournal> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(LedgerJournal::new(pool))
}
