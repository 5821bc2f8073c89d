//! Polling data layer.
//!
//! # Data Flow
//! ```text
//! StatsSource (HTTP stats API)
//!     → query.rs (interval or keyed fetch, last-good snapshot)
//!     → hub.rs (chain stats 8 s, validators 300 s, featured once, balance on demand)
//!     → dashboard handlers read snapshots
//! ```

pub mod client;
pub mod hub;
pub mod query;
pub mod types;

pub use client::{StatsClient, StatsError, StatsResult, StatsSource};
pub use hub::StatsHub;
pub use query::{spawn_keyed, spawn_polling, Keyed, KeyedQuery, QueryHandle};
pub use types::{TotalStats, Validator, ValidatorList, WalletBalance};
