//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the staking dashboard.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP API listener.
    pub server: ServerConfig,

    /// Chain connection settings.
    pub chain: ChainConfig,

    /// Wallet extension settings.
    pub wallet: WalletConfig,

    /// Stats API polling settings.
    pub stats: StatsConfig,

    /// Featured/verified validator presentation.
    pub dashboard: PresentationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP API listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ChainConfig {
    /// WebSocket JSON-RPC endpoint of the node.
    pub ws_endpoint: String,

    /// Subnet identifier passed to every staking call.
    pub net_id: u16,

    /// RPC request timeout in seconds. Does not apply to signing.
    pub rpc_timeout_secs: u64,

    /// Liveness checks and reopen backoff for a dropped connection.
    pub reconnect: ReconnectConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            ws_endpoint: "wss://commune-api-node-1.communeai.net".to_string(),
            net_id: 0,
            rpc_timeout_secs: 10,
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// `[chain.reconnect]`: how a lost connection is noticed and reopened.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReconnectConfig {
    /// How often a healthy connection is checked, in milliseconds.
    pub check_interval_ms: u64,

    /// Delay before the first reopen attempt, doubled per failure.
    pub base_delay_ms: u64,

    /// Upper bound on the reopen delay.
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 5_000,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

/// Wallet extension configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WalletConfig {
    /// Application name presented to the extension on enable.
    pub app_name: String,

    /// Base URL of the signer bridge.
    pub signer_url: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            app_name: "ComAISwap".to_string(),
            signer_url: "http://127.0.0.1:9944".to_string(),
        }
    }
}

/// Stats API polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Base URL of the stats API.
    pub base_url: String,

    /// Validator list polling interval in seconds.
    pub validators_interval_secs: u64,

    /// Aggregate chain stats polling interval in seconds.
    pub chain_stats_interval_secs: u64,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.comstats.org".to_string(),
            validators_interval_secs: 300,
            chain_stats_interval_secs: 8,
            request_timeout_secs: 15,
        }
    }
}

/// Validator presentation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PresentationConfig {
    /// Validator key shown as the featured/default selection.
    pub featured_validator: String,

    /// Validator keys rendered with a verified badge.
    pub verified_validators: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
