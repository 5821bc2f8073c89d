//! Connection traits and the owned connection slot.
//!
//! At most one connection is live. Reopening closes the previous handle
//! first; in-flight calls on it observe [`ChainError::Closed`].
//!
//! The slot remembers the endpoint it was last pointed at. A connection the
//! node dropped counts as absent, and [`ConnectionSlot::supervise`] reopens
//! that endpoint with backoff until [`ConnectionSlot::close`] clears it.
//!
//! [`ChainError::Closed`]: crate::chain::types::ChainError::Closed

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::chain::backoff::reconnect_delay;
use crate::chain::types::{ChainResult, RuntimeVersion, SignedExtrinsic, TxHash};
use crate::config::ReconnectConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Operations the dashboard needs from a live node connection.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Endpoint this connection was opened against.
    fn endpoint(&self) -> &str;

    /// False once the socket is gone, whichever side closed it.
    fn is_alive(&self) -> bool;

    async fn genesis_hash(&self) -> ChainResult<String>;

    async fn block_number(&self) -> ChainResult<u64>;

    async fn runtime_version(&self) -> ChainResult<RuntimeVersion>;

    /// Next nonce for `address`, including pool transactions.
    async fn account_nonce(&self, address: &str) -> ChainResult<u64>;

    /// Broadcast a signed extrinsic. Resolves once the pool accepts it.
    async fn submit_extrinsic(&self, extrinsic: &SignedExtrinsic) -> ChainResult<TxHash>;

    /// Tear the connection down. Idempotent.
    async fn close(&self);
}

/// Factory for connections, so the slot can reopen on endpoint change.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> ChainResult<Arc<dyn ChainConnection>>;
}

#[derive(Default)]
struct SlotState {
    /// Endpoint to hold open; survives failed opens and dropped sockets.
    target: Option<String>,
    live: Option<Arc<dyn ChainConnection>>,
}

impl SlotState {
    fn healthy(&self) -> Option<&Arc<dyn ChainConnection>> {
        self.live.as_ref().filter(|c| c.is_alive())
    }
}

/// Owner of the single live chain connection.
pub struct ConnectionSlot {
    connector: Arc<dyn ChainConnector>,
    state: RwLock<SlotState>,
}

impl ConnectionSlot {
    pub fn new(connector: Arc<dyn ChainConnector>) -> Self {
        Self {
            connector,
            state: RwLock::new(SlotState::default()),
        }
    }

    /// Close any live connection, then open one against `endpoint`.
    ///
    /// If opening fails the slot is left without a connection, but still
    /// targets `endpoint` so the supervisor keeps retrying it.
    pub async fn open(&self, endpoint: &str) -> ChainResult<()> {
        let mut state = self.state.write().await;

        if let Some(previous) = state.live.take() {
            tracing::info!(
                previous = %previous.endpoint(),
                next = %endpoint,
                "Replacing chain connection"
            );
            previous.close().await;
            metrics::record_chain_connected(false);
        }
        state.target = Some(endpoint.to_string());

        let connection = self.connector.connect(endpoint).await?;
        state.live = Some(connection);
        metrics::record_chain_connected(true);
        Ok(())
    }

    /// Close and release the live connection, if any, and stop targeting
    /// its endpoint.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.target = None;
        if let Some(connection) = state.live.take() {
            connection.close().await;
            metrics::record_chain_connected(false);
        }
    }

    /// The live connection, if any. A dropped connection is not returned.
    pub async fn current(&self) -> Option<Arc<dyn ChainConnection>> {
        self.state.read().await.healthy().cloned()
    }

    /// Endpoint the slot targets, connected or not.
    pub async fn endpoint(&self) -> Option<String> {
        self.state.read().await.target.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.healthy().is_some()
    }

    /// Reopen the target endpoint if its connection is missing or dropped.
    ///
    /// Returns `None` when there was nothing to do. The connect runs without
    /// holding the slot, so readers see "disconnected" meanwhile; a result
    /// that lost a race with [`open`](Self::open) or [`close`](Self::close)
    /// is discarded.
    pub async fn restore(&self) -> Option<ChainResult<()>> {
        let endpoint = {
            let mut state = self.state.write().await;
            let endpoint = state.target.clone()?;
            if state.healthy().is_some() {
                return None;
            }
            if let Some(dropped) = state.live.take() {
                tracing::warn!(endpoint = %dropped.endpoint(), "Chain connection lost");
                dropped.close().await;
                metrics::record_chain_connected(false);
            }
            endpoint
        };

        let connection = match self.connector.connect(&endpoint).await {
            Ok(connection) => connection,
            Err(e) => {
                metrics::record_chain_reconnect(false);
                return Some(Err(e));
            }
        };

        let mut state = self.state.write().await;
        if state.target.as_deref() != Some(endpoint.as_str()) || state.live.is_some() {
            drop(state);
            connection.close().await;
            return None;
        }
        state.live = Some(connection);
        metrics::record_chain_connected(true);
        metrics::record_chain_reconnect(true);
        tracing::info!(endpoint = %endpoint, "Chain connection restored");
        Some(Ok(()))
    }

    /// Check the connection every `check_interval_ms`, and reopen it with
    /// exponential backoff whenever it is missing, until `shutdown`.
    pub fn supervise(
        self: Arc<Self>,
        policy: ReconnectConfig,
        shutdown: &Shutdown,
    ) -> JoinHandle<()> {
        let mut shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let mut attempt: u32 = 0;

            loop {
                let delay = match attempt {
                    0 => Duration::from_millis(policy.check_interval_ms),
                    n => reconnect_delay(n, &policy),
                };

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.recv() => {
                        tracing::debug!("Connection supervisor stopped");
                        break;
                    }
                }

                match self.restore().await {
                    None | Some(Ok(())) => attempt = 0,
                    Some(Err(e)) => {
                        attempt = attempt.saturating_add(1);
                        tracing::warn!(attempt = attempt, error = %e, "Chain reconnect failed");
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for ConnectionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSlot").finish_non_exhaustive()
    }
}
