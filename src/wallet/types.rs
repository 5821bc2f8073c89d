//! Account and extension types, error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An account exposed by the wallet extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(default)]
    pub meta: AccountMeta,
}

impl Account {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            meta: AccountMeta {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }

    /// Name if the extension supplied one, otherwise the address.
    pub fn display_name(&self) -> &str {
        self.meta.name.as_deref().unwrap_or(&self.address)
    }
}

/// Display metadata attached by the extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMeta {
    pub name: Option<String>,
    #[serde(default)]
    pub source: String,
    pub genesis_hash: Option<String>,
}

/// A provider that answered an enable request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectedExtension {
    pub name: String,
    pub version: String,
}

/// Errors raised by the wallet extension.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No compatible extension answered.
    #[error("No wallet extension found")]
    NoExtensionFound,

    /// The user (or extension) refused to sign.
    #[error("Signature rejected: {0}")]
    Rejected(String),

    /// The extension could not be reached.
    #[error("Extension transport error: {0}")]
    Transport(String),

    /// The extension answered with something unexpected.
    #[error("Extension protocol error: {0}")]
    Protocol(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
