//! HTTP client for the stats API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::StatsConfig;
use crate::stats::types::{TotalStats, Validator, ValidatorList, WalletBalance};

/// Errors from the stats API.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stats API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type for stats queries.
pub type StatsResult<T> = Result<T, StatsError>;

/// Read-only queries the polling layer issues.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn total_stats(&self) -> StatsResult<TotalStats>;

    async fn validators(&self) -> StatsResult<ValidatorList>;

    async fn validator(&self, key: &str, wallet: &str) -> StatsResult<Validator>;

    async fn balance(&self, wallet: &str) -> StatsResult<WalletBalance>;
}

/// [`StatsSource`] backed by the HTTP stats API.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(config: &StatsConfig) -> StatsResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> StatsResult<T> {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StatsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl StatsSource for StatsClient {
    async fn total_stats(&self) -> StatsResult<TotalStats> {
        self.get("/stats/", &[]).await
    }

    async fn validators(&self) -> StatsResult<ValidatorList> {
        self.get("/validators/", &[]).await
    }

    async fn validator(&self, key: &str, wallet: &str) -> StatsResult<Validator> {
        self.get(&format!("/validators/{}", key), &[("wallet", wallet)])
            .await
    }

    async fn balance(&self, wallet: &str) -> StatsResult<WalletBalance> {
        self.get("/balance/", &[("wallet", wallet)]).await
    }
}
