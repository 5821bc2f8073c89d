//! comstake dashboard server.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      comstake                         │
//!                 │                                                       │
//!   Browser/CLI   │  ┌───────────┐   ┌─────────────┐   ┌──────────────┐  │
//!   ──────────────┼─▶│ dashboard │──▶│   bridge    │──▶│    chain     │──┼──▶ Node (WS RPC)
//!                 │  │  (axum)   │   │ (wallet tx) │   │ (slot + rpc) │  │
//!                 │  └─────┬─────┘   └──────┬──────┘   └──────────────┘  │
//!                 │        │                │                             │
//!                 │        │                ▼                             │
//!                 │        │         ┌─────────────┐                      │
//!                 │        │         │   wallet    │──────────────────────┼──▶ Signer bridge
//!                 │        │         └─────────────┘                      │
//!                 │        ▼                                              │
//!                 │  ┌───────────┐                                        │
//!                 │  │   stats   │────────────────────────────────────────┼──▶ Stats API
//!                 │  │ (polling) │                                        │
//!                 │  └───────────┘                                        │
//!                 │                                                       │
//!                 │  config (toml + reload) · observability · lifecycle   │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use comstake::bridge::{BridgeSettings, ToastFeed, WalletBridge};
use comstake::chain::{ConnectionSlot, WsConnector};
use comstake::config::{
    load_config, loader::apply_env_overrides, ConfigChange, ConfigWatcher, DashboardConfig,
};
use comstake::dashboard::{self, AppState};
use comstake::lifecycle::{signals, Shutdown};
use comstake::observability::{logging, metrics};
use comstake::stats::{StatsClient, StatsHub};
use comstake::wallet::RemoteExtension;

#[derive(Parser)]
#[command(name = "comstake")]
#[command(about = "Commune AI staking dashboard", long_about = None)]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = DashboardConfig::default();
            apply_env_overrides(&mut config);
            config
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "comstake starting");
    tracing::info!(
        bind_address = %config.server.bind_address,
        ws_endpoint = %config.chain.ws_endpoint,
        stats = %config.stats.base_url,
        featured_validator = %config.dashboard.featured_validator,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::shutdown_on_ctrl_c(shutdown.clone());

    let connection = Arc::new(ConnectionSlot::new(Arc::new(WsConnector::new(
        config.chain.rpc_timeout_secs,
    ))));
    let toasts = Arc::new(ToastFeed::default());
    let bridge = Arc::new(WalletBridge::new(
        BridgeSettings {
            app_name: config.wallet.app_name.clone(),
            net_id: config.chain.net_id,
        },
        Arc::new(RemoteExtension::new(&config.wallet.signer_url)?),
        connection.clone(),
        toasts.clone(),
    ));

    if let Err(e) = bridge.reconnect(&config.chain.ws_endpoint).await {
        tracing::warn!(
            endpoint = %config.chain.ws_endpoint,
            error = %e,
            "Chain connection unavailable, retrying in the background"
        );
    }

    let stats_client = Arc::new(StatsClient::new(&config.stats)?);
    let (stats, mut tasks) = StatsHub::spawn(
        stats_client,
        &config.stats,
        &config.dashboard.featured_validator,
        &shutdown,
    );
    tasks.push(connection.supervise(config.chain.reconnect.clone(), &shutdown));

    // Dropping the watcher stops it.
    let _watcher = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let watcher = watcher.run()?;
            tasks.push(tokio::spawn(apply_reloads(
                config.clone(),
                updates,
                bridge.clone(),
                shutdown.clone(),
            )));
            Some(watcher)
        }
        None => None,
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let state = AppState {
        bridge: bridge.clone(),
        stats,
        presentation: Arc::new(config.dashboard.clone()),
        toasts,
    };
    dashboard::serve(listener, state, shutdown.clone()).await?;

    shutdown.trigger();
    for task in tasks {
        let _ = task.await;
    }
    bridge.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Act on reloaded configuration until shutdown.
async fn apply_reloads(
    mut current: DashboardConfig,
    mut updates: tokio::sync::mpsc::UnboundedReceiver<DashboardConfig>,
    bridge: Arc<WalletBridge>,
    shutdown: Shutdown,
) {
    let mut shutdown_rx = shutdown.subscribe();

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(next) = update else { break };
                let change = ConfigChange::between(&current, &next);

                if let Some(endpoint) = &change.ws_endpoint {
                    tracing::info!(endpoint = %endpoint, "Chain endpoint changed, reconnecting");
                    if let Err(e) = bridge.reconnect(endpoint).await {
                        tracing::error!(endpoint = %endpoint, error = %e, "Reconnect failed");
                    }
                }
                if !change.restart_required.is_empty() {
                    tracing::warn!(
                        sections = ?change.restart_required,
                        "Changed settings take effect after restart"
                    );
                }

                current = next;
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}
