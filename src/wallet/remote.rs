//! HTTP signer bridge standing in for the browser extension.
//!
//! Wire protocol:
//! - `POST /enable` `{"origin": app}` → `[{"name", "version"}]`
//! - `GET /accounts` → `[{"address", "meta": {...}}]`
//! - `POST /sign` `{"address", "payload"}` → `{"signed": "0x..."}`
//!
//! A 401/403 from `/sign` means the user refused.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::chain::types::{SignedExtrinsic, SignerPayload};
use crate::wallet::extension::{Signer, WalletExtension};
use crate::wallet::types::{Account, InjectedExtension, WalletError, WalletResult};

#[derive(Serialize)]
struct EnableRequest<'a> {
    origin: &'a str,
}

#[derive(Serialize)]
struct SignRequest<'a> {
    address: &'a str,
    payload: &'a SignerPayload,
}

#[derive(Deserialize)]
struct SignResponse {
    signed: String,
}

/// Extension reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteExtension {
    client: Client,
    base_url: String,
}

impl RemoteExtension {
    pub fn new(base_url: &str) -> WalletResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(e: reqwest::Error) -> WalletError {
    WalletError::Transport(e.to_string())
}

async fn expect_success(res: reqwest::Response) -> WalletResult<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(WalletError::Transport(format!("status {}: {}", status, body)))
}

#[async_trait]
impl WalletExtension for RemoteExtension {
    async fn enable(&self, app_name: &str) -> WalletResult<Vec<InjectedExtension>> {
        let res = self
            .client
            .post(self.url("/enable"))
            .json(&EnableRequest { origin: app_name })
            .send()
            .await
            .map_err(|e| {
                // An unreachable bridge is the same as no extension installed.
                if e.is_connect() {
                    WalletError::NoExtensionFound
                } else {
                    transport(e)
                }
            })?;

        let extensions: Vec<InjectedExtension> = expect_success(res)
            .await?
            .json()
            .await
            .map_err(|e| WalletError::Protocol(e.to_string()))?;

        tracing::debug!(count = extensions.len(), app = %app_name, "Extensions enabled");
        Ok(extensions)
    }

    async fn accounts(&self) -> WalletResult<Vec<Account>> {
        let res = self
            .client
            .get(self.url("/accounts"))
            .send()
            .await
            .map_err(transport)?;

        expect_success(res)
            .await?
            .json()
            .await
            .map_err(|e| WalletError::Protocol(e.to_string()))
    }

    async fn from_address(&self, address: &str) -> WalletResult<Arc<dyn Signer>> {
        Ok(Arc::new(RemoteSigner {
            extension: self.clone(),
            address: address.to_string(),
        }))
    }
}

/// Signer bound to one address on a [`RemoteExtension`].
#[derive(Debug)]
pub struct RemoteSigner {
    extension: RemoteExtension,
    address: String,
}

#[async_trait]
impl Signer for RemoteSigner {
    async fn sign_payload(&self, payload: &SignerPayload) -> WalletResult<SignedExtrinsic> {
        // No timeout: approval waits on the user.
        let res = self
            .extension
            .client
            .post(self.extension.url("/sign"))
            .json(&SignRequest {
                address: &self.address,
                payload,
            })
            .send()
            .await
            .map_err(transport)?;

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let reason = res.text().await.unwrap_or_default();
                let reason = if reason.is_empty() {
                    "Cancelled".to_string()
                } else {
                    reason
                };
                Err(WalletError::Rejected(reason))
            }
            _ => {
                let signed: SignResponse = expect_success(res)
                    .await?
                    .json()
                    .await
                    .map_err(|e| WalletError::Protocol(e.to_string()))?;
                Ok(SignedExtrinsic(signed.signed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let ext = RemoteExtension::new("http://127.0.0.1:9944/").unwrap();
        assert_eq!(ext.url("/accounts"), "http://127.0.0.1:9944/accounts");
    }

    #[tokio::test]
    async fn test_unreachable_bridge_means_no_extension() {
        let ext = RemoteExtension::new("http://127.0.0.1:1").unwrap();
        let err = ext.enable("ComAISwap").await.unwrap_err();
        assert!(matches!(err, WalletError::NoExtensionFound));
    }
}
