//! The four dashboard queries, spawned together.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::StatsConfig;
use crate::lifecycle::Shutdown;
use crate::stats::client::StatsSource;
use crate::stats::query::{spawn_keyed, spawn_polling, KeyedQuery, QueryHandle};
use crate::stats::types::{TotalStats, Validator, ValidatorList, WalletBalance};

/// Live handles to every stats query.
#[derive(Clone)]
pub struct StatsHub {
    /// Aggregate chain stats, polled every `chain_stats_interval_secs`.
    pub chain: QueryHandle<TotalStats>,
    /// Validator list, polled every `validators_interval_secs`.
    pub validators: QueryHandle<ValidatorList>,
    /// Featured validator detail, fetched once and on refetch.
    pub featured: KeyedQuery<Validator>,
    /// Balance of the current wallet, fetched on demand.
    pub balance: KeyedQuery<WalletBalance>,
}

impl StatsHub {
    /// Spawn all queries. They stop when `shutdown` triggers.
    pub fn spawn(
        source: Arc<dyn StatsSource>,
        config: &StatsConfig,
        featured_validator: &str,
        shutdown: &Shutdown,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let chain_source = source.clone();
        let (chain, chain_task) = spawn_polling(
            "chain_stats",
            Duration::from_secs(config.chain_stats_interval_secs),
            move || {
                let source = chain_source.clone();
                async move { source.total_stats().await }
            },
            shutdown.subscribe(),
        );

        let validators_source = source.clone();
        let (validators, validators_task) = spawn_polling(
            "validators",
            Duration::from_secs(config.validators_interval_secs),
            move || {
                let source = validators_source.clone();
                async move { source.validators().await }
            },
            shutdown.subscribe(),
        );

        let featured_source = source.clone();
        let (featured, featured_task) = spawn_keyed(
            "featured_validator",
            featured_validator,
            move |key: String| {
                let source = featured_source.clone();
                async move { source.validator(&key, "").await }
            },
            shutdown.subscribe(),
        );

        let (balance, balance_task) = spawn_keyed(
            "wallet_balance",
            "",
            move |wallet: String| {
                let source = source.clone();
                async move { source.balance(&wallet).await }
            },
            shutdown.subscribe(),
        );

        let hub = Self {
            chain,
            validators,
            featured,
            balance,
        };
        (hub, vec![chain_task, validators_task, featured_task, balance_task])
    }
}
