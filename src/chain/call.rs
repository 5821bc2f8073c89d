//! Call shapes submitted to the chain.

use serde::{Deserialize, Serialize};

/// Pallet holding the staking calls.
pub const STAKING_PALLET: &str = "SubspaceModule";
/// Pallet holding plain token transfers.
pub const BALANCES_PALLET: &str = "Balances";

/// One of the four calls the dashboard can submit. Amounts are base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ChainCall {
    AddStake {
        net_id: u16,
        module_key: String,
        amount: u64,
    },
    RemoveStake {
        net_id: u16,
        module_key: String,
        amount: u64,
    },
    TransferStake {
        net_id: u16,
        module_key: String,
        new_module_key: String,
        amount: u64,
    },
    Transfer {
        dest: String,
        value: u64,
    },
}

impl ChainCall {
    pub fn pallet(&self) -> &'static str {
        match self {
            Self::AddStake { .. } | Self::RemoveStake { .. } | Self::TransferStake { .. } => {
                STAKING_PALLET
            }
            Self::Transfer { .. } => BALANCES_PALLET,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::AddStake { .. } => "add_stake",
            Self::RemoveStake { .. } => "remove_stake",
            Self::TransferStake { .. } => "transfer_stake",
            Self::Transfer { .. } => "transfer",
        }
    }

    /// Amount moved by the call, in base units.
    pub fn amount(&self) -> u64 {
        match self {
            Self::AddStake { amount, .. }
            | Self::RemoveStake { amount, .. }
            | Self::TransferStake { amount, .. } => *amount,
            Self::Transfer { value, .. } => *value,
        }
    }
}
