//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::DashboardConfig;

/// What a reload changed that running components must act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigChange {
    /// New chain endpoint, if it moved.
    pub ws_endpoint: Option<String>,
    /// Settings that only take effect after a restart.
    pub restart_required: Vec<&'static str>,
}

impl ConfigChange {
    pub fn between(old: &DashboardConfig, new: &DashboardConfig) -> Self {
        let mut change = Self::default();

        if old.chain.ws_endpoint != new.chain.ws_endpoint {
            change.ws_endpoint = Some(new.chain.ws_endpoint.clone());
        }

        let restart_sections: [(&'static str, bool); 8] = [
            ("server", old.server != new.server),
            ("chain.net_id", old.chain.net_id != new.chain.net_id),
            (
                "chain.rpc_timeout_secs",
                old.chain.rpc_timeout_secs != new.chain.rpc_timeout_secs,
            ),
            ("chain.reconnect", old.chain.reconnect != new.chain.reconnect),
            ("wallet", old.wallet != new.wallet),
            ("stats", old.stats != new.stats),
            ("dashboard", old.dashboard != new.dashboard),
            ("observability", old.observability != new.observability),
        ];
        change.restart_required = restart_sections
            .into_iter()
            .filter_map(|(name, changed)| changed.then_some(name))
            .collect();

        change
    }
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<DashboardConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver of validated reloads.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<DashboardConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Config file changed, reloading");
                    match load_config(&path) {
                        Ok(config) => {
                            let _ = tx.send(config);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Config reload failed, keeping current configuration");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
