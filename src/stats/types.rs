//! Stats API response types.
//!
//! Stake and balance fields are base units; `total_stake` and
//! `circulating_supply` are whole tokens, as the API reports them.

use serde::{Deserialize, Serialize};

/// One validator (module) as listed by the stats API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validator {
    pub key: String,
    pub name: String,
    pub address: String,
    pub stake: f64,
    pub apy: f64,
    pub delegation_fee: f64,
    pub total_stakers: u64,
    pub subnet_id: u16,
    /// Stake the queried wallet holds with this validator, if asked.
    pub wallet_staked: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorList {
    pub validators: Vec<Validator>,
}

/// Aggregate chain statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalStats {
    pub price: f64,
    pub circulating_supply: f64,
    pub marketcap: f64,
    pub daily_emission: f64,
    pub total_modules: u64,
    pub total_stake: f64,
    pub total_stakers: u64,
    pub total_subnets: u64,
    pub avg_apy: f64,
    pub block_number: u64,
}

/// Free and staked balance of one wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletBalance {
    pub balance: f64,
    pub staked: f64,
}
