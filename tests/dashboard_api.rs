//! Dashboard API over a live listener, with a programmable stats backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use comstake::bridge::ToastFeed;
use comstake::chain::ChainCall;
use comstake::config::{PresentationConfig, StatsConfig};
use comstake::dashboard::{self, AppState};
use comstake::lifecycle::Shutdown;
use comstake::stats::{StatsClient, StatsHub};
use comstake::wallet::Account;

mod common;
use common::{FakeExtension, RecordedRequest, TestBridge, ALICE, ENDPOINT};

const FEATURED: &str = "5Featured";
const VERIFIED: &str = "5Verified";

fn stats_response(request: &RecordedRequest) -> (u16, String) {
    let body = match request.path() {
        "/stats/" => json!({
            "price": 0.5,
            "circulating_supply": 1234567.891,
            "marketcap": 617283.9455,
            "daily_emission": 250000,
            "total_modules": 8000,
            "total_stake": 1000.0,
            "total_stakers": 12000,
            "total_subnets": 30,
            "block_number": 1000
        }),
        "/validators/" => json!({
            "validators": [
                { "key": "5Plain", "name": "plain", "stake": 1e9, "apy": 10.0 },
                { "key": VERIFIED, "name": "verified", "stake": 2e9, "apy": 11.0 },
                { "key": FEATURED, "name": "featured", "stake": 50e9, "apy": 12.3456, "delegation_fee": 5.0 }
            ]
        }),
        "/validators/5Featured" => json!({
            "key": FEATURED,
            "name": "featured",
            "stake": 50e9,
            "apy": 12.3456,
            "delegation_fee": 5.0,
            "total_stakers": 321
        }),
        "/balance/" => json!({ "balance": 2.5e12, "staked": 1e9 }),
        _ => return (404, "{}".to_string()),
    };
    (200, body.to_string())
}

struct Dashboard {
    base: String,
    harness: TestBridge,
    toasts: Arc<ToastFeed>,
    stats_requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Shutdown,
    client: reqwest::Client,
}

impl Dashboard {
    async fn start() -> Self {
        let stats_requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let log = stats_requests.clone();
        let stats_addr = common::start_programmable_backend(move |request| {
            log.lock().unwrap().push(request.clone());
            async move { stats_response(&request) }
        })
        .await;

        let toasts = Arc::new(ToastFeed::default());
        let harness = TestBridge::forwarding(
            FakeExtension::new(vec![Account::new(ALICE, "alice"), Account::new("ABC", "abc")]),
            Some(toasts.clone()),
        );
        harness.bridge.reconnect(ENDPOINT).await.unwrap();

        let stats_config = StatsConfig {
            base_url: format!("http://{stats_addr}"),
            ..Default::default()
        };
        let shutdown = Shutdown::new();
        let (stats, _tasks) = StatsHub::spawn(
            Arc::new(StatsClient::new(&stats_config).unwrap()),
            &stats_config,
            FEATURED,
            &shutdown,
        );

        let state = AppState {
            bridge: harness.bridge.clone(),
            stats,
            presentation: Arc::new(PresentationConfig {
                featured_validator: FEATURED.to_string(),
                verified_validators: vec![VERIFIED.to_string()],
            }),
            toasts: toasts.clone(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(dashboard::serve(listener, state, shutdown.clone()));

        Self {
            base,
            harness,
            toasts,
            stats_requests,
            shutdown,
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    /// GET until `data` is present.
    async fn get_data(&self, path: &str) -> Value {
        for _ in 0..100 {
            let (status, body) = self.get(path).await;
            assert_eq!(status, StatusCode::OK);
            if !body["data"].is_null() {
                return body["data"].clone();
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("{path} never produced data");
    }

    async fn select(&self, address: &str) {
        let (status, _) = self.post("/api/wallet/connect", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = self
            .post("/api/wallet/select", json!({ "address": address }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

#[tokio::test]
async fn test_status_reports_connection_and_selection() {
    let d = Dashboard::start().await;

    let (status, body) = d.get("/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chain_connected"], true);
    assert_eq!(body["endpoint"], ENDPOINT);
    assert_eq!(body["wallet_connected"], false);
    assert!(body["selected_account"].is_null());

    d.select(ALICE).await;

    let (_, body) = d.get("/api/status").await;
    assert_eq!(body["wallet_connected"], true);
    assert_eq!(body["accounts"], 2);
    assert_eq!(body["selected_account"]["address"], ALICE);
    assert_eq!(body["selected_account"]["meta"]["name"], "alice");
}

#[tokio::test]
async fn test_status_reports_dropped_node() {
    let d = Dashboard::start().await;
    d.harness
        .connector
        .node(0)
        .closed
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let (_, body) = d.get("/api/status").await;
    assert_eq!(body["chain_connected"], false);
    assert_eq!(body["endpoint"], ENDPOINT);
}

#[tokio::test]
async fn test_stats_with_display_values() {
    let d = Dashboard::start().await;

    let data = d.get_data("/api/stats").await;
    assert_eq!(data["price"], 0.5);
    assert_eq!(data["display"]["price"], "$0.5");
    assert_eq!(data["display"]["circulating_supply"], "1,234,567.89");
    assert_eq!(data["display"]["total_modules"], "8,000");
    assert_eq!(data["display"]["total_stakers"], "12,000");
}

#[tokio::test]
async fn test_validators_featured_first_with_verified_flag() {
    let d = Dashboard::start().await;

    let rows = d.get_data("/api/validators").await;
    let rows = rows.as_array().unwrap();
    let keys: Vec<&str> = rows.iter().map(|r| r["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec![FEATURED, "5Plain", VERIFIED]);

    assert_eq!(rows[0]["featured"], true);
    assert_eq!(rows[0]["stake"], "50.00");
    assert_eq!(rows[0]["apy"], "12.35%");
    assert_eq!(rows[2]["verified"], true);
    assert_eq!(rows[1]["verified"], false);
}

#[tokio::test]
async fn test_featured_card_stake_share() {
    let d = Dashboard::start().await;

    // The share needs chain stats as well.
    d.get_data("/api/stats").await;
    let card = d.get_data("/api/featured").await;
    assert_eq!(card["key"], FEATURED);
    assert_eq!(card["apy"], "12.35%");
    assert_eq!(card["delegation_fee"], "5%");
    assert_eq!(card["total_staked"], "50.00");
    assert_eq!(card["stake_share"], "5.000%");
    assert_eq!(card["total_stakers"], 321);
}

#[tokio::test]
async fn test_balance_lookup_in_tokens_and_usd() {
    let d = Dashboard::start().await;
    d.get_data("/api/stats").await;

    let data = d.get_data("/api/balance/ABC").await;
    assert_eq!(data["wallet"], "ABC");
    assert_eq!(data["balance"]["tokens"], "2,500.00");
    assert_eq!(data["balance"]["usd"], "$1,250.00");
    assert_eq!(data["staked"]["tokens"], "1.00");
    assert_eq!(data["staked"]["usd"], "$0.50");

    let requests = d.stats_requests.lock().unwrap().clone();
    let balance_queries: Vec<&str> = requests
        .iter()
        .filter(|r| r.path() == "/balance/")
        .map(|r| r.query())
        .collect();
    assert_eq!(balance_queries, vec!["wallet=ABC"]);
}

#[tokio::test]
async fn test_transfer_five_to_abc() {
    let d = Dashboard::start().await;
    d.select(ALICE).await;

    let (status, body) = d
        .post("/api/tx/transfer", json!({ "to": "ABC", "amount": "5" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tx_hash"], "0xhash0");

    let payloads = d.harness.signer().payloads();
    assert_eq!(
        payloads[0].call,
        ChainCall::Transfer {
            dest: "ABC".to_string(),
            value: 5_000_000_000,
        }
    );

    let toasts = d.toasts.recent();
    assert_eq!(toasts.len(), 1);

    let (_, feed) = d.get("/api/notifications").await;
    assert_eq!(feed[0]["notification"]["level"], "success");
    assert_eq!(feed[0]["notification"]["message"], "Transaction Done");
}

#[tokio::test]
async fn test_restake_request_shape() {
    let d = Dashboard::start().await;
    d.select(ALICE).await;

    let (status, _) = d
        .post(
            "/api/tx/restake",
            json!({ "validator_from": "5Plain", "validator_to": FEATURED, "amount": "0.5" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        d.harness.signer().payloads()[0].call,
        ChainCall::TransferStake {
            net_id: 0,
            module_key: "5Plain".to_string(),
            new_module_key: FEATURED.to_string(),
            amount: 500_000_000,
        }
    );
}

#[tokio::test]
async fn test_error_bodies_carry_stable_codes() {
    let d = Dashboard::start().await;

    let (status, body) = d
        .post("/api/tx/stake", json!({ "validator": FEATURED, "amount": "1" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "MISSING_PREREQUISITE");

    d.select(ALICE).await;

    let (status, body) = d
        .post("/api/tx/unstake", json!({ "validator": FEATURED, "amount": "lots" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_AMOUNT");

    let (status, body) = d
        .post("/api/wallet/select", json!({ "address": "5Nobody" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "UNKNOWN_ACCOUNT");

    d.harness.signer().reject.store(true, std::sync::atomic::Ordering::SeqCst);
    let (status, body) = d
        .post("/api/tx/stake", json!({ "validator": FEATURED, "amount": "1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SIGNATURE_REJECTED");

    // Only the submission that reached the signer raised a toast.
    assert_eq!(d.toasts.recent().len(), 1);
}

#[tokio::test]
async fn test_disconnect_clears_selection() {
    let d = Dashboard::start().await;
    d.select(ALICE).await;

    let res = d
        .client
        .post(format!("{}/api/wallet/disconnect", d.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, body) = d.get("/api/status").await;
    assert_eq!(body["wallet_connected"], false);
    assert_eq!(body["accounts"], 0);
}
