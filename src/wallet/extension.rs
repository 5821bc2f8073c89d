//! Wallet extension seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::types::{SignedExtrinsic, SignerPayload};
use crate::wallet::types::{Account, InjectedExtension, WalletResult};

/// The wallet extension: discovery, accounts, and per-address signers.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    /// Ask every installed extension to authorize `app_name`.
    async fn enable(&self, app_name: &str) -> WalletResult<Vec<InjectedExtension>>;

    /// Accounts visible to this application.
    async fn accounts(&self) -> WalletResult<Vec<Account>>;

    /// Signer for the extension that owns `address`.
    async fn from_address(&self, address: &str) -> WalletResult<Arc<dyn Signer>>;
}

/// Signs payloads on behalf of one account.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign_payload(&self, payload: &SignerPayload) -> WalletResult<SignedExtrinsic>;
}
