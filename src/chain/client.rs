//! WebSocket JSON-RPC client for the node.
//!
//! # Responsibilities
//! - Hold one WebSocket connection to the node
//! - Multiplex requests by JSON-RPC id
//! - Apply the configured timeout to every request
//! - Fail pending requests when the socket closes

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use crate::chain::connection::{ChainConnection, ChainConnector};
use crate::chain::types::{ChainError, ChainResult, RuntimeVersion, SignedExtrinsic, TxHash};

type Pending = Arc<DashMap<u64, oneshot::Sender<ChainResult<Value>>>>;

/// JSON-RPC client over a single WebSocket.
pub struct RpcClient {
    endpoint: String,
    outgoing: mpsc::UnboundedSender<Message>,
    pending: Pending,
    next_id: AtomicU64,
    closed: Arc<AtomicBool>,
    timeout_secs: u64,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RpcClient {
    /// Open a connection to `endpoint`.
    pub async fn connect(endpoint: &str, timeout_secs: u64) -> ChainResult<Self> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|e| ChainError::Connect(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        let handshake = tokio_tungstenite::connect_async(url.as_str());
        let (stream, _) = timeout(Duration::from_secs(timeout_secs), handshake)
            .await
            .map_err(|_| ChainError::Timeout(timeout_secs))?
            .map_err(|e| ChainError::Connect(e.to_string()))?;

        let (mut sink, mut source) = stream.split();
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<Message>();
        let pending: Pending = Arc::new(DashMap::new());
        let closed = Arc::new(AtomicBool::new(false));

        let writer_pending = pending.clone();
        let writer_closed = closed.clone();
        let writer = tokio::spawn(async move {
            while let Some(message) = outgoing_rx.recv().await {
                let is_close = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    tracing::warn!(error = %e, "WebSocket write failed");
                    writer_closed.store(true, Ordering::SeqCst);
                    let detail = e.to_string();
                    fail_pending(&writer_pending, || ChainError::Rpc(detail.clone()));
                    break;
                }
                if is_close {
                    break;
                }
            }
        });

        let reader_pending = pending.clone();
        let reader_closed = closed.clone();
        let reader_endpoint = endpoint.to_string();
        let reader = tokio::spawn(async move {
            let mut failure = None;
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => dispatch(&reader_pending, text.as_str()),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(endpoint = %reader_endpoint, error = %e, "WebSocket read failed");
                        failure = Some(e.to_string());
                        break;
                    }
                }
            }
            reader_closed.store(true, Ordering::SeqCst);
            fail_pending(&reader_pending, || match &failure {
                Some(detail) => ChainError::Rpc(detail.clone()),
                None => ChainError::Closed,
            });
            tracing::debug!(endpoint = %reader_endpoint, "WebSocket reader stopped");
        });

        tracing::info!(endpoint = %endpoint, "Chain connection opened");

        Ok(Self {
            endpoint: endpoint.to_string(),
            outgoing,
            pending,
            next_id: AtomicU64::new(1),
            closed,
            timeout_secs,
            tasks: Mutex::new(vec![writer, reader]),
        })
    }

    /// Issue a request and decode its `result`.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ChainResult<T> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChainError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        // The reader may have drained `pending` between the check and the insert.
        if self.closed.load(Ordering::SeqCst) {
            self.pending.remove(&id);
            return Err(ChainError::Closed);
        }

        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        if self.outgoing.send(Message::text(body.to_string())).is_err() {
            self.pending.remove(&id);
            return Err(ChainError::Closed);
        }

        let response = match timeout(Duration::from_secs(self.timeout_secs), rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(ChainError::Closed),
            Err(_) => {
                self.pending.remove(&id);
                tracing::warn!(method = method, "RPC timeout");
                return Err(ChainError::Timeout(self.timeout_secs));
            }
        };

        let value = response.map_err(|e| match e {
            ChainError::Rejected { code, message, .. } => ChainError::Rejected {
                method: method.to_string(),
                code,
                message,
            },
            other => other,
        })?;

        serde_json::from_value(value).map_err(|e| ChainError::Decode {
            method: method.to_string(),
            detail: e.to_string(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

fn dispatch(pending: &Pending, text: &str) {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed RPC frame");
            return;
        }
    };

    // Subscription notifications carry no id.
    let Some(id) = value.get("id").and_then(Value::as_u64) else {
        return;
    };
    let Some((_, tx)) = pending.remove(&id) else {
        return;
    };

    let result = match value.get("error") {
        Some(error) => Err(ChainError::Rejected {
            method: String::new(),
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
    };
    let _ = tx.send(result);
}

fn fail_pending(pending: &Pending, reason: impl Fn() -> ChainError) {
    let ids: Vec<u64> = pending.iter().map(|r| *r.key()).collect();
    for id in ids {
        if let Some((_, tx)) = pending.remove(&id) {
            let _ = tx.send(Err(reason()));
        }
    }
}

fn parse_hex_u64(method: &str, hex: &str) -> ChainResult<u64> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    u64::from_str_radix(digits, 16).map_err(|e| ChainError::Decode {
        method: method.to_string(),
        detail: format!("'{}': {}", hex, e),
    })
}

#[async_trait]
impl ChainConnection for RpcClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_alive(&self) -> bool {
        !self.is_closed()
    }

    async fn genesis_hash(&self) -> ChainResult<String> {
        self.request("chain_getBlockHash", json!([0])).await
    }

    async fn block_number(&self) -> ChainResult<u64> {
        let header: Value = self.request("chain_getHeader", json!([])).await?;
        let number = header
            .get("number")
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::Decode {
                method: "chain_getHeader".to_string(),
                detail: "missing number".to_string(),
            })?;
        parse_hex_u64("chain_getHeader", number)
    }

    async fn runtime_version(&self) -> ChainResult<RuntimeVersion> {
        self.request("state_getRuntimeVersion", json!([])).await
    }

    async fn account_nonce(&self, address: &str) -> ChainResult<u64> {
        self.request("system_accountNextIndex", json!([address])).await
    }

    async fn submit_extrinsic(&self, extrinsic: &SignedExtrinsic) -> ChainResult<TxHash> {
        self.request("author_submitExtrinsic", json!([extrinsic.0]))
            .await
            .map(TxHash)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.outgoing.send(Message::Close(None));
        fail_pending(&self.pending, || ChainError::Closed);

        let tasks = match self.tasks.lock() {
            Ok(mut tasks) => std::mem::take(&mut *tasks),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for task in tasks {
            task.abort();
        }
        tracing::info!(endpoint = %self.endpoint, "Chain connection closed");
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Opens [`RpcClient`] connections.
#[derive(Debug, Clone)]
pub struct WsConnector {
    timeout_secs: u64,
}

impl WsConnector {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

#[async_trait]
impl ChainConnector for WsConnector {
    async fn connect(&self, endpoint: &str) -> ChainResult<Arc<dyn ChainConnection>> {
        let client = RpcClient::connect(endpoint, self.timeout_secs).await?;
        Ok(Arc::new(client))
    }
}
