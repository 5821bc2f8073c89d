//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, env overrides)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → main loop reconnects the chain if the endpoint moved
//! ```

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ChainConfig, DashboardConfig, ObservabilityConfig, PresentationConfig, ReconnectConfig,
    ServerConfig, StatsConfig, WalletConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::{ConfigChange, ConfigWatcher};
