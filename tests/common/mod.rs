//! Shared fakes and backends for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use comstake::bridge::{BridgeSettings, Notification, Notifier, WalletBridge};
use comstake::chain::{
    ChainConnection, ChainConnector, ChainError, ChainResult, ConnectionSlot, RuntimeVersion,
    SignedExtrinsic, SignerPayload, TxHash,
};
use comstake::wallet::{
    Account, InjectedExtension, Signer, WalletError, WalletExtension, WalletResult,
};

pub const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
pub const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
pub const ENDPOINT: &str = "ws://node.test:9944";

/// Signer that records every payload and accepts or rejects it.
#[derive(Default)]
pub struct FakeSigner {
    pub reject: AtomicBool,
    /// Held before answering, to keep a submission in flight.
    pub delay: Mutex<Option<Duration>>,
    pub payloads: Mutex<Vec<SignerPayload>>,
}

impl FakeSigner {
    pub fn payloads(&self) -> Vec<SignerPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for FakeSigner {
    async fn sign_payload(&self, payload: &SignerPayload) -> WalletResult<SignedExtrinsic> {
        self.payloads.lock().unwrap().push(payload.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.reject.load(Ordering::SeqCst) {
            return Err(WalletError::Rejected("Cancelled".to_string()));
        }
        Ok(SignedExtrinsic(format!("0xsigned{}", payload.nonce)))
    }
}

/// Extension with a fixed account list and one shared signer.
pub struct FakeExtension {
    pub extensions: Vec<InjectedExtension>,
    pub accounts: Vec<Account>,
    pub signer: Arc<FakeSigner>,
}

impl FakeExtension {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            extensions: vec![InjectedExtension {
                name: "polkadot-js".to_string(),
                version: "0.44.1".to_string(),
            }],
            accounts,
            signer: Arc::new(FakeSigner::default()),
        }
    }

    /// No provider answers enable.
    pub fn absent() -> Self {
        Self {
            extensions: Vec::new(),
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl WalletExtension for FakeExtension {
    async fn enable(&self, _app_name: &str) -> WalletResult<Vec<InjectedExtension>> {
        Ok(self.extensions.clone())
    }

    async fn accounts(&self) -> WalletResult<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    async fn from_address(&self, _address: &str) -> WalletResult<Arc<dyn Signer>> {
        Ok(self.signer.clone())
    }
}

/// Node connection that accepts (or rejects) whatever is submitted.
pub struct FakeNode {
    pub endpoint: String,
    pub closed: AtomicBool,
    pub reject_submit: AtomicBool,
    pub nonce: AtomicU64,
    pub submitted: Mutex<Vec<SignedExtrinsic>>,
}

impl FakeNode {
    fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            closed: AtomicBool::new(false),
            reject_submit: AtomicBool::new(false),
            nonce: AtomicU64::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submitted(&self) -> Vec<SignedExtrinsic> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainConnection for FakeNode {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_alive(&self) -> bool {
        !self.is_closed()
    }

    async fn genesis_hash(&self) -> ChainResult<String> {
        Ok("0xgenesis".to_string())
    }

    async fn block_number(&self) -> ChainResult<u64> {
        Ok(1_000)
    }

    async fn runtime_version(&self) -> ChainResult<RuntimeVersion> {
        Ok(RuntimeVersion {
            spec_version: 120,
            transaction_version: 1,
        })
    }

    async fn account_nonce(&self, _address: &str) -> ChainResult<u64> {
        Ok(self.nonce.load(Ordering::SeqCst))
    }

    async fn submit_extrinsic(&self, extrinsic: &SignedExtrinsic) -> ChainResult<TxHash> {
        if self.is_closed() {
            return Err(ChainError::Closed);
        }
        if self.reject_submit.load(Ordering::SeqCst) {
            return Err(ChainError::Rejected {
                method: "author_submitExtrinsic".to_string(),
                code: 1010,
                message: "Invalid Transaction: Inability to pay some fees".to_string(),
            });
        }

        self.submitted.lock().unwrap().push(extrinsic.clone());
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(TxHash(format!("0xhash{nonce}")))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Hands out [`FakeNode`]s and remembers them in order.
#[derive(Default)]
pub struct FakeConnector {
    pub nodes: Mutex<Vec<Arc<FakeNode>>>,
}

impl FakeConnector {
    pub fn node(&self, index: usize) -> Arc<FakeNode> {
        self.nodes.lock().unwrap()[index].clone()
    }

    pub fn latest(&self) -> Arc<FakeNode> {
        self.nodes.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ChainConnector for FakeConnector {
    async fn connect(&self, endpoint: &str) -> ChainResult<Arc<dyn ChainConnection>> {
        if endpoint.contains("unreachable") {
            return Err(ChainError::Connect(format!("{endpoint}: connection refused")));
        }
        let node = Arc::new(FakeNode::new(endpoint));
        self.nodes.lock().unwrap().push(node.clone());
        Ok(node)
    }
}

/// Notifier that keeps everything it is given, optionally passing it on.
#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
    pub forward: Option<Arc<dyn Notifier>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification.clone());
        if let Some(forward) = &self.forward {
            forward.notify(notification);
        }
    }
}

/// A bridge wired to fakes.
pub struct TestBridge {
    pub bridge: Arc<WalletBridge>,
    pub extension: Arc<FakeExtension>,
    pub connector: Arc<FakeConnector>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestBridge {
    pub fn new(extension: FakeExtension) -> Self {
        Self::forwarding(extension, None)
    }

    /// Like [`TestBridge::new`], with notifications also sent to `forward`.
    pub fn forwarding(extension: FakeExtension, forward: Option<Arc<dyn Notifier>>) -> Self {
        let extension = Arc::new(extension);
        let connector = Arc::new(FakeConnector::default());
        let notifier = Arc::new(RecordingNotifier {
            seen: Mutex::new(Vec::new()),
            forward,
        });
        let bridge = Arc::new(WalletBridge::new(
            BridgeSettings {
                app_name: "ComAISwap".to_string(),
                net_id: 0,
            },
            extension.clone(),
            Arc::new(ConnectionSlot::new(connector.clone())),
            notifier.clone(),
        ));

        Self {
            bridge,
            extension,
            connector,
            notifier,
        }
    }

    /// Connected to [`ENDPOINT`] with [`ALICE`] selected.
    pub async fn ready() -> Self {
        let harness = Self::new(FakeExtension::new(vec![
            Account::new(ALICE, "alice"),
            Account::new(BOB, "bob"),
        ]));
        harness.bridge.reconnect(ENDPOINT).await.unwrap();
        harness.bridge.connect().await.unwrap();
        harness.bridge.select_account(ALICE).unwrap();
        harness
    }

    pub fn signer(&self) -> &FakeSigner {
        &self.extension.signer
    }
}

/// A request as seen by a programmable backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> &str {
        self.target.split_once('?').map(|(_, q)| q).unwrap_or_default()
    }
}

/// Start a backend whose responses are computed per request. Returns its address.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();
    Some(RecordedRequest {
        method,
        target,
        body,
    })
}

/// Poll `check` until it holds or a second passes.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
