//! Chain-specific types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::call::ChainCall;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// WebSocket handshake or endpoint error.
    #[error("Connection error: {0}")]
    Connect(String),

    /// Transport-level RPC failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error object.
    #[error("Node rejected {method}: {message} (code {code})")]
    Rejected {
        method: String,
        code: i64,
        message: String,
    },

    /// The connection was closed while the request was pending.
    #[error("Connection closed")]
    Closed,

    /// The response did not have the expected shape.
    #[error("Unexpected response to {method}: {detail}")]
    Decode { method: String, detail: String },
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Hash returned by the node when an extrinsic is accepted into the pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Runtime versions a signer needs to produce a valid extrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    pub spec_version: u32,
    pub transaction_version: u32,
}

/// Everything the extension needs to sign one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerPayload {
    pub address: String,
    pub pallet: String,
    pub call: ChainCall,
    pub nonce: u64,
    pub genesis_hash: String,
    pub block_number: u64,
    pub spec_version: u32,
    pub transaction_version: u32,
}

/// Hex-encoded extrinsic produced by the signer, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedExtrinsic(pub String);
