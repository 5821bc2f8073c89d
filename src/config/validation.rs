//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected
//! rather than stopping at the first one.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::DashboardConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }

    match url::Url::parse(&config.chain.ws_endpoint) {
        Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
        Ok(url) => errors.push(ValidationError::new(
            "chain.ws_endpoint",
            format!("scheme '{}' is not ws or wss", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("chain.ws_endpoint", e.to_string())),
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be > 0"));
    }

    let reconnect = &config.chain.reconnect;
    if reconnect.check_interval_ms == 0 {
        errors.push(ValidationError::new(
            "chain.reconnect.check_interval_ms",
            "must be > 0",
        ));
    }
    if reconnect.base_delay_ms == 0 || reconnect.base_delay_ms > reconnect.max_delay_ms {
        errors.push(ValidationError::new(
            "chain.reconnect.base_delay_ms",
            format!("must be > 0 and <= max_delay_ms ({})", reconnect.max_delay_ms),
        ));
    }

    if config.wallet.app_name.trim().is_empty() {
        errors.push(ValidationError::new("wallet.app_name", "must not be empty"));
    }

    for (field, value) in [
        ("wallet.signer_url", &config.wallet.signer_url),
        ("stats.base_url", &config.stats.base_url),
    ] {
        match url::Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                field,
                format!("scheme '{}' is not http or https", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(field, e.to_string())),
        }
    }

    if config.stats.validators_interval_secs == 0 {
        errors.push(ValidationError::new(
            "stats.validators_interval_secs",
            "must be > 0",
        ));
    }
    if config.stats.chain_stats_interval_secs == 0 {
        errors.push(ValidationError::new(
            "stats.chain_stats_interval_secs",
            "must be > 0",
        ));
    }
    if config.stats.request_timeout_secs == 0 {
        errors.push(ValidationError::new("stats.request_timeout_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
