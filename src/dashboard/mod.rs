//! Dashboard HTTP API.
//!
//! # Data Flow
//! ```text
//! GET  /api/stats, /api/validators, /api/featured, /api/balance/{wallet}
//!     → StatsHub snapshots → view.rs projections
//! POST /api/wallet/*, /api/tx/*
//!     → WalletBridge → notifications in the toast feed
//! ```

pub mod format;
pub mod handlers;
pub mod view;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::bridge::{ToastFeed, WalletBridge};
use crate::config::PresentationConfig;
use crate::lifecycle::Shutdown;
use crate::stats::StatsHub;
use self::handlers::*;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<WalletBridge>,
    pub stats: StatsHub,
    pub presentation: Arc<PresentationConfig>,
    pub toasts: Arc<ToastFeed>,
}

/// Build the router with all routes and the trace layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/stats", get(get_stats))
        .route("/api/validators", get(get_validators))
        .route("/api/featured", get(get_featured))
        .route("/api/balance/{wallet}", get(get_balance))
        .route("/api/notifications", get(get_notifications))
        .route("/api/wallet/connect", post(connect_wallet))
        .route("/api/wallet/select", post(select_account))
        .route("/api/wallet/disconnect", post(disconnect_wallet))
        .route("/api/tx/stake", post(stake))
        .route("/api/tx/unstake", post(unstake))
        .route("/api/tx/restake", post(restake))
        .route("/api/tx/transfer", post(transfer))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the dashboard until `shutdown` triggers.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: Shutdown,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Dashboard API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.triggered().await })
        .await?;

    tracing::info!("Dashboard API stopped");
    Ok(())
}
