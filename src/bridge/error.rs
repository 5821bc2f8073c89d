//! Bridge error taxonomy.

use std::fmt;

use thiserror::Error;

use crate::chain::{ChainError, SubmitError};
use crate::wallet::WalletError;

/// What a submission was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    ChainConnection,
    SelectedAccount,
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChainConnection => f.write_str("no chain connection"),
            Self::SelectedAccount => f.write_str("no selected account"),
        }
    }
}

/// Errors returned by the wallet/transaction bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("No wallet extension found")]
    NoExtensionFound,

    #[error("Signature rejected: {0}")]
    SignatureRejected(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Cannot submit: {0}")]
    MissingPrerequisite(Prerequisite),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("A submission for {0} is already in flight")]
    SubmissionInFlight(String),

    #[error("Wallet extension error: {0}")]
    Extension(String),

    #[error("Chain connection failed: {0}")]
    Connection(#[from] ChainError),
}

impl BridgeError {
    /// Stable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoExtensionFound => "NO_EXTENSION_FOUND",
            Self::SignatureRejected(_) => "SIGNATURE_REJECTED",
            Self::TransactionFailed(_) => "TRANSACTION_FAILED",
            Self::MissingPrerequisite(_) => "MISSING_PREREQUISITE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::SubmissionInFlight(_) => "SUBMISSION_IN_FLIGHT",
            Self::Extension(_) => "EXTENSION_ERROR",
            Self::Connection(_) => "CONNECTION_FAILED",
        }
    }
}

impl From<WalletError> for BridgeError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NoExtensionFound => Self::NoExtensionFound,
            WalletError::Rejected(reason) => Self::SignatureRejected(reason),
            other => Self::Extension(other.to_string()),
        }
    }
}

impl From<SubmitError> for BridgeError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Signer(WalletError::Rejected(reason)) => Self::SignatureRejected(reason),
            other => Self::TransactionFailed(other.to_string()),
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
