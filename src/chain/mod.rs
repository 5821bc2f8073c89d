//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! config (ws endpoint, net id)
//!     → connection.rs (owned slot, open/close lifecycle, reopen on loss)
//!     → client.rs (WebSocket JSON-RPC with timeouts)
//!     → transaction.rs (payload, extension signature, broadcast)
//! ```
//!
//! Signing keys never enter this process; the wallet extension signs.

pub mod backoff;
pub mod call;
pub mod client;
pub mod connection;
pub mod transaction;
pub mod types;

pub use call::ChainCall;
pub use client::{RpcClient, WsConnector};
pub use connection::{ChainConnection, ChainConnector, ConnectionSlot};
pub use transaction::{SubmitError, TxBuilder};
pub use types::{
    ChainError, ChainResult, RuntimeVersion, SignedExtrinsic, SignerPayload, TxHash,
};
