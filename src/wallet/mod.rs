//! Wallet extension subsystem.
//!
//! # Data Flow
//! ```text
//! enable(app name) → accounts() → user picks one
//!     → from_address(address) → Signer
//!     → Signer::sign_payload(payload) → signed extrinsic
//! ```

pub mod extension;
pub mod remote;
pub mod types;

pub use extension::{Signer, WalletExtension};
pub use remote::RemoteExtension;
pub use types::{Account, AccountMeta, InjectedExtension, WalletError, WalletResult};
