//! Presentation models derived from stats snapshots.

use serde::Serialize;

use crate::config::PresentationConfig;
use crate::dashboard::format::{
    format_amount, format_token_price, number_with_commas, to_tokens, truncate_wallet_address,
};
use crate::stats::{KeyedQuery, QueryHandle, TotalStats, Validator, ValidatorList, WalletBalance};

/// A query snapshot with its flags.
#[derive(Debug, Clone, Serialize)]
pub struct QueryView<T> {
    pub loading: bool,
    pub fetching: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> QueryView<T> {
    pub fn from_handle<S>(handle: &QueryHandle<S>, project: impl FnOnce(&S) -> T) -> Self {
        Self {
            loading: handle.is_loading(),
            fetching: handle.is_fetching(),
            error: handle.last_error().map(|e| e.to_string()),
            data: handle.latest().map(|value| project(value.as_ref())),
        }
    }

    /// Only a value fetched for `key` counts.
    pub fn from_keyed<S>(query: &KeyedQuery<S>, key: &str, project: impl FnOnce(&S) -> T) -> Self {
        let handle = query.handle();
        Self {
            loading: query.latest_for(key).is_none() && handle.is_fetching(),
            fetching: handle.is_fetching(),
            error: handle.last_error().map(|e| e.to_string()),
            data: query.latest_for(key).map(|keyed| project(&keyed.value)),
        }
    }
}

/// Chain stats with display strings.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    #[serde(flatten)]
    pub raw: TotalStats,
    pub display: StatsDisplay,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsDisplay {
    pub price: String,
    pub circulating_supply: String,
    pub marketcap: String,
    pub daily_emission: String,
    pub total_modules: String,
    pub total_stake: String,
    pub total_stakers: String,
    pub total_subnets: String,
    pub avg_apy: String,
}

impl From<&TotalStats> for StatsView {
    fn from(stats: &TotalStats) -> Self {
        Self {
            raw: stats.clone(),
            display: StatsDisplay {
                price: format!("${}", stats.price),
                circulating_supply: format_amount(stats.circulating_supply),
                marketcap: format!("${}", format_amount(stats.marketcap)),
                daily_emission: number_with_commas(stats.daily_emission),
                total_modules: number_with_commas(stats.total_modules),
                total_stake: format_amount(stats.total_stake),
                total_stakers: number_with_commas(stats.total_stakers),
                total_subnets: number_with_commas(stats.total_subnets),
                avg_apy: format!("{:.2}%", stats.avg_apy),
            },
        }
    }
}

/// One row of the validator table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorRow {
    pub key: String,
    pub name: String,
    pub address: String,
    pub short_address: String,
    pub stake: String,
    pub apy: String,
    pub delegation_fee: String,
    pub total_stakers: String,
    pub verified: bool,
    pub featured: bool,
}

impl ValidatorRow {
    pub fn new(validator: &Validator, presentation: &PresentationConfig) -> Self {
        Self {
            key: validator.key.clone(),
            name: validator.name.clone(),
            address: validator.address.clone(),
            short_address: truncate_wallet_address(&validator.address),
            stake: number_with_commas(format_token_price(validator.stake)),
            apy: format!("{:.2}%", validator.apy),
            delegation_fee: format!("{}%", validator.delegation_fee),
            total_stakers: number_with_commas(validator.total_stakers),
            verified: presentation
                .verified_validators
                .iter()
                .any(|key| key == &validator.key),
            featured: !presentation.featured_validator.is_empty()
                && validator.key == presentation.featured_validator,
        }
    }
}

/// Most rows the validator table shows.
pub const MAX_VALIDATOR_ROWS: usize = 1000;

/// Table rows with the featured validator first, otherwise in API order,
/// capped at [`MAX_VALIDATOR_ROWS`].
pub fn validator_rows(list: &ValidatorList, presentation: &PresentationConfig) -> Vec<ValidatorRow> {
    let mut rows: Vec<ValidatorRow> = list
        .validators
        .iter()
        .map(|v| ValidatorRow::new(v, presentation))
        .collect();
    rows.sort_by_key(|row| !row.featured);
    rows.truncate(MAX_VALIDATOR_ROWS);
    rows
}

/// Summary card for the featured validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedCard {
    pub key: String,
    pub short_key: String,
    pub name: String,
    pub apy: String,
    pub delegation_fee: String,
    pub total_staked: String,
    /// Percent of all stake on the chain; absent until chain stats arrive.
    pub stake_share: Option<String>,
    pub total_stakers: u64,
}

impl FeaturedCard {
    pub fn new(validator: &Validator, chain: Option<&TotalStats>) -> Self {
        let stake_share = chain
            .filter(|stats| stats.total_stake > 0.0)
            // A true percentage, not the raw stake / total ratio.
            .map(|stats| to_tokens(validator.stake) / stats.total_stake * 100.0)
            .map(|share| format!("{share:.3}%"));

        Self {
            key: validator.key.clone(),
            short_key: truncate_wallet_address(&validator.key),
            name: validator.name.clone(),
            apy: format!("{:.2}%", validator.apy),
            delegation_fee: format!("{}%", validator.delegation_fee),
            total_staked: number_with_commas(format_token_price(validator.stake)),
            stake_share,
            total_stakers: validator.total_stakers,
        }
    }
}

/// A token amount with its USD value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub tokens: String,
    pub usd: String,
}

impl Amount {
    fn new(base_units: f64, price: f64) -> Self {
        let tokens = to_tokens(base_units);
        Self {
            tokens: format_amount(tokens),
            usd: format!("${}", format_amount(tokens * price)),
        }
    }
}

/// Balance of a searched wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceView {
    pub wallet: String,
    pub balance: Amount,
    pub staked: Amount,
}

impl BalanceView {
    pub fn new(wallet: &str, balance: &WalletBalance, price: f64) -> Self {
        Self {
            wallet: wallet.to_string(),
            balance: Amount::new(balance.balance, price),
            staked: Amount::new(balance.staked, price),
        }
    }
}
