//! Transaction intents and amount scaling.

use std::fmt;

use crate::chain::{ChainCall, TxHash};

/// Decimals of the native token.
pub const TOKEN_DECIMALS: u32 = 9;

/// Base units per whole token (10^9).
pub const BASE_UNIT_FACTOR: u64 = 10u64.pow(TOKEN_DECIMALS);

/// Invoked once with the hash after the node accepts a submission.
pub type Callback = Box<dyn FnOnce(&TxHash) + Send + 'static>;

/// Parse a human decimal amount and scale it to base units.
///
/// Exact decimal arithmetic; no floats. `"5"` → `5_000_000_000`.
pub fn to_base_units(amount: &str) -> Result<u64, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("amount is required".to_string());
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("'{}' is not a number", amount));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("'{}' is not a positive decimal number", amount));
    }
    if fraction.len() > TOKEN_DECIMALS as usize {
        return Err(format!(
            "'{}' has more than {} decimal places",
            amount, TOKEN_DECIMALS
        ));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("'{}' is too large", amount))?
    };
    let padded = format!("{:0<width$}", fraction, width = TOKEN_DECIMALS as usize);
    let fraction: u64 = padded
        .parse()
        .map_err(|_| format!("'{}' is not a number", amount))?;

    let units = whole
        .checked_mul(BASE_UNIT_FACTOR)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| format!("'{}' is too large", amount))?;

    if units == 0 {
        return Err("amount must be greater than zero".to_string());
    }
    Ok(units)
}

/// Arguments of the stake and unstake forms.
pub struct StakeArgs {
    pub validator: String,
    pub amount: String,
    pub callback: Option<Callback>,
}

impl StakeArgs {
    pub fn new(validator: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            amount: amount.into(),
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnOnce(&TxHash) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// Arguments of the restake form.
pub struct TransferStakeArgs {
    pub validator_from: String,
    pub validator_to: String,
    pub amount: String,
    pub callback: Option<Callback>,
}

impl TransferStakeArgs {
    pub fn new(
        validator_from: impl Into<String>,
        validator_to: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            validator_from: validator_from.into(),
            validator_to: validator_to.into(),
            amount: amount.into(),
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnOnce(&TxHash) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// Arguments of the transfer form.
pub struct TransferArgs {
    pub to: String,
    pub amount: String,
    pub callback: Option<Callback>,
}

impl TransferArgs {
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnOnce(&TxHash) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// What the user asked for, with the amount already in base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxIntent {
    AddStake { validator: String, amount: u64 },
    RemoveStake { validator: String, amount: u64 },
    TransferStake { from: String, to: String, amount: u64 },
    Transfer { to: String, amount: u64 },
}

impl TxIntent {
    pub fn kind(&self) -> TxKind {
        match self {
            Self::AddStake { .. } => TxKind::AddStake,
            Self::RemoveStake { .. } => TxKind::RemoveStake,
            Self::TransferStake { .. } => TxKind::TransferStake,
            Self::Transfer { .. } => TxKind::Transfer,
        }
    }

    /// The chain call for this intent on subnet `net_id`.
    pub fn into_call(self, net_id: u16) -> ChainCall {
        match self {
            Self::AddStake { validator, amount } => ChainCall::AddStake {
                net_id,
                module_key: validator,
                amount,
            },
            Self::RemoveStake { validator, amount } => ChainCall::RemoveStake {
                net_id,
                module_key: validator,
                amount,
            },
            Self::TransferStake { from, to, amount } => ChainCall::TransferStake {
                net_id,
                module_key: from,
                new_module_key: to,
                amount,
            },
            Self::Transfer { to, amount } => ChainCall::Transfer {
                dest: to,
                value: amount,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    AddStake,
    RemoveStake,
    TransferStake,
    Transfer,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddStake => "add_stake",
            Self::RemoveStake => "remove_stake",
            Self::TransferStake => "transfer_stake",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
