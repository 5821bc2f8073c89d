//! Route handlers.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::bridge::{
    BridgeError, StakeArgs, Toast, TransferArgs, TransferStakeArgs,
};
use crate::chain::TxHash;
use crate::dashboard::view::{
    validator_rows, BalanceView, FeaturedCard, QueryView, StatsView, ValidatorRow,
};
use crate::dashboard::AppState;
use crate::stats::KeyedQuery;
use crate::stats::WalletBalance;
use crate::wallet::Account;

/// How long a balance request waits for a fresh fetch.
const BALANCE_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub chain_connected: bool,
    pub endpoint: Option<String>,
    pub wallet_connected: bool,
    pub accounts: usize,
    pub selected_account: Option<Account>,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct StakeRequest {
    pub validator: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct RestakeRequest {
    pub validator_from: String,
    pub validator_to: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub to: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct TxResponse {
    pub tx_hash: TxHash,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// Bridge failures as JSON error bodies.
#[derive(Debug)]
pub struct ApiError(pub BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            BridgeError::NoExtensionFound => StatusCode::SERVICE_UNAVAILABLE,
            BridgeError::MissingPrerequisite(_) | BridgeError::SubmissionInFlight(_) => {
                StatusCode::CONFLICT
            }
            BridgeError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BridgeError::UnknownAccount(_) => StatusCode::NOT_FOUND,
            BridgeError::SignatureRejected(_) => StatusCode::BAD_REQUEST,
            BridgeError::TransactionFailed(_)
            | BridgeError::Extension(_)
            | BridgeError::Connection(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: self.0.code(),
            message: self.0.to_string(),
        };
        (status, Json(serde_json::json!({ "error": body }))).into_response()
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let connection = state.bridge.connection();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        chain_connected: connection.is_connected().await,
        endpoint: connection.endpoint().await,
        wallet_connected: state.bridge.is_connected(),
        accounts: state.bridge.accounts().len(),
        selected_account: state.bridge.selected_account().map(|a| a.as_ref().clone()),
    })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<QueryView<StatsView>> {
    Json(QueryView::from_handle(&state.stats.chain, |stats| StatsView::from(stats)))
}

pub async fn get_validators(State(state): State<AppState>) -> Json<QueryView<Vec<ValidatorRow>>> {
    let presentation = &state.presentation;
    Json(QueryView::from_handle(&state.stats.validators, |list| {
        validator_rows(list, presentation)
    }))
}

pub async fn get_featured(State(state): State<AppState>) -> Json<QueryView<FeaturedCard>> {
    let chain = state.stats.chain.latest();
    let key = state.stats.featured.key();
    Json(QueryView::from_keyed(&state.stats.featured, &key, |validator| {
        FeaturedCard::new(validator, chain.as_deref())
    }))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Json<QueryView<BalanceView>> {
    let query = &state.stats.balance;
    query.set_key(&wallet);
    query.wait_for(&wallet, BALANCE_WAIT).await;

    let price = state
        .stats
        .chain
        .latest()
        .map(|stats| stats.price)
        .unwrap_or_default();
    Json(QueryView::from_keyed(query, &wallet, |balance| {
        BalanceView::new(&wallet, balance, price)
    }))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Toast>> {
    Json(state.toasts.recent())
}

pub async fn connect_wallet(
    State(state): State<AppState>,
) -> Result<Json<AccountsResponse>, ApiError> {
    let accounts = state.bridge.connect().await?;
    Ok(Json(AccountsResponse { accounts }))
}

pub async fn select_account(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<Account>, ApiError> {
    let account = state.bridge.select_account(&req.address)?;
    state.stats.balance.set_key(&account.address);
    Ok(Json(account))
}

pub async fn disconnect_wallet(State(state): State<AppState>) -> StatusCode {
    state.bridge.disconnect();
    state.stats.balance.set_key("");
    StatusCode::NO_CONTENT
}

pub async fn stake(
    State(state): State<AppState>,
    Json(req): Json<StakeRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let args = StakeArgs::new(req.validator, req.amount)
        .with_callback(refresh_balance(&state.stats.balance));
    let tx_hash = state.bridge.add_stake(args).await?;
    Ok(Json(TxResponse { tx_hash }))
}

pub async fn unstake(
    State(state): State<AppState>,
    Json(req): Json<StakeRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let args = StakeArgs::new(req.validator, req.amount)
        .with_callback(refresh_balance(&state.stats.balance));
    let tx_hash = state.bridge.remove_stake(args).await?;
    Ok(Json(TxResponse { tx_hash }))
}

pub async fn restake(
    State(state): State<AppState>,
    Json(req): Json<RestakeRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let args = TransferStakeArgs::new(req.validator_from, req.validator_to, req.amount)
        .with_callback(refresh_balance(&state.stats.balance));
    let tx_hash = state.bridge.transfer_stake(args).await?;
    Ok(Json(TxResponse { tx_hash }))
}

pub async fn transfer(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let args = TransferArgs::new(req.to, req.amount)
        .with_callback(refresh_balance(&state.stats.balance));
    let tx_hash = state.bridge.transfer(args).await?;
    Ok(Json(TxResponse { tx_hash }))
}

/// Completion callback: refetch the balance of the current wallet.
fn refresh_balance(balance: &KeyedQuery<WalletBalance>) -> impl FnOnce(&TxHash) + Send + 'static {
    let balance = balance.clone();
    move |_| balance.refetch()
}
