//! Wallet/transaction bridge.
//!
//! # Data Flow
//! ```text
//! connect() → extension enable + accounts
//! select_account(address) → selected slot
//! add_stake / remove_stake / transfer_stake / transfer
//!     → prerequisites (connection + account) or MissingPrerequisite
//!     → amount × 10^9
//!     → per-account in-flight claim
//!     → TxBuilder::sign_and_send
//!     → one notification, callback on success
//! ```

pub mod error;
pub mod guard;
pub mod intent;
pub mod notify;
pub mod service;

pub use error::{BridgeError, BridgeResult, Prerequisite};
pub use intent::{
    to_base_units, StakeArgs, TransferArgs, TransferStakeArgs, TxIntent, TxKind,
    BASE_UNIT_FACTOR, TOKEN_DECIMALS,
};
pub use notify::{Notification, Notifier, Toast, ToastFeed, SUCCESS_MESSAGE};
pub use service::{BridgeSettings, WalletBridge};
