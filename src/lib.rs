//! Commune AI staking dashboard.
//!
//! Wallet/transaction bridge for staking calls, polled chain statistics
//! and a JSON API over both.

pub mod bridge;
pub mod chain;
pub mod config;
pub mod dashboard;
pub mod lifecycle;
pub mod observability;
pub mod stats;
pub mod wallet;

pub use bridge::{BridgeError, WalletBridge};
pub use config::DashboardConfig;
pub use lifecycle::Shutdown;
pub use stats::StatsHub;
