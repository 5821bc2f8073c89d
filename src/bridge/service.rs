//! The wallet/transaction bridge.
//!
//! # Responsibilities
//! - Discover extension accounts and hold the selected one
//! - Own the chain connection through a [`ConnectionSlot`]
//! - Turn form input into signed, broadcast calls
//! - Report every submission outcome as exactly one notification

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use uuid::Uuid;

use crate::bridge::error::{BridgeError, BridgeResult, Prerequisite};
use crate::bridge::guard::InFlight;
use crate::bridge::intent::{
    to_base_units, Callback, StakeArgs, TransferArgs, TransferStakeArgs, TxIntent,
};
use crate::bridge::notify::{Notification, Notifier, SUCCESS_MESSAGE};
use crate::chain::{ChainConnection, ConnectionSlot, TxBuilder, TxHash};
use crate::observability::metrics;
use crate::wallet::{Account, WalletExtension};

/// Static settings of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Name presented to the extension on enable.
    pub app_name: String,
    /// Subnet for staking calls.
    pub net_id: u16,
}

/// Wallet/transaction bridge.
pub struct WalletBridge {
    settings: BridgeSettings,
    extension: Arc<dyn WalletExtension>,
    connection: Arc<ConnectionSlot>,
    notifier: Arc<dyn Notifier>,
    accounts: ArcSwap<Vec<Account>>,
    selected: ArcSwapOption<Account>,
    in_flight: InFlight,
}

impl WalletBridge {
    pub fn new(
        settings: BridgeSettings,
        extension: Arc<dyn WalletExtension>,
        connection: Arc<ConnectionSlot>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            extension,
            connection,
            notifier,
            accounts: ArcSwap::from_pointee(Vec::new()),
            selected: ArcSwapOption::empty(),
            in_flight: InFlight::new(),
        }
    }

    /// Enable the extension and load its accounts for selection.
    pub async fn connect(&self) -> BridgeResult<Vec<Account>> {
        let extensions = self.extension.enable(&self.settings.app_name).await?;
        if extensions.is_empty() {
            tracing::warn!(app = %self.settings.app_name, "No wallet extension answered");
            return Err(BridgeError::NoExtensionFound);
        }

        let accounts = self.extension.accounts().await?;
        tracing::info!(
            extensions = extensions.len(),
            accounts = accounts.len(),
            "Wallet extension enabled"
        );

        self.accounts.store(Arc::new(accounts.clone()));
        Ok(accounts)
    }

    /// Select one of the discovered accounts, replacing any previous choice.
    pub fn select_account(&self, address: &str) -> BridgeResult<Account> {
        let account = self
            .accounts
            .load()
            .iter()
            .find(|a| a.address == address)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownAccount(address.to_string()))?;

        tracing::info!(address = %account.address, name = %account.display_name(), "Account selected");
        self.selected.store(Some(Arc::new(account.clone())));
        Ok(account)
    }

    /// Forget the selection and the discovered accounts.
    pub fn disconnect(&self) {
        self.selected.store(None);
        self.accounts.store(Arc::new(Vec::new()));
        tracing::info!("Wallet disconnected");
    }

    pub fn accounts(&self) -> Arc<Vec<Account>> {
        self.accounts.load_full()
    }

    pub fn selected_account(&self) -> Option<Arc<Account>> {
        self.selected.load_full()
    }

    /// True once an account is selected.
    pub fn is_connected(&self) -> bool {
        self.selected.load().is_some()
    }

    pub fn connection(&self) -> &ConnectionSlot {
        &self.connection
    }

    /// Open (or reopen) the chain connection against `endpoint`.
    pub async fn reconnect(&self, endpoint: &str) -> BridgeResult<()> {
        self.connection.open(endpoint).await?;
        Ok(())
    }

    /// Release the chain connection.
    pub async fn shutdown(&self) {
        self.connection.close().await;
    }

    pub async fn add_stake(&self, args: StakeArgs) -> BridgeResult<TxHash> {
        let StakeArgs {
            validator,
            amount,
            callback,
        } = args;
        self.submit(&amount, callback, |amount| TxIntent::AddStake { validator, amount })
            .await
    }

    pub async fn remove_stake(&self, args: StakeArgs) -> BridgeResult<TxHash> {
        let StakeArgs {
            validator,
            amount,
            callback,
        } = args;
        self.submit(&amount, callback, |amount| TxIntent::RemoveStake { validator, amount })
            .await
    }

    pub async fn transfer_stake(&self, args: TransferStakeArgs) -> BridgeResult<TxHash> {
        let TransferStakeArgs {
            validator_from,
            validator_to,
            amount,
            callback,
        } = args;
        self.submit(&amount, callback, |amount| TxIntent::TransferStake {
            from: validator_from,
            to: validator_to,
            amount,
        })
        .await
    }

    pub async fn transfer(&self, args: TransferArgs) -> BridgeResult<TxHash> {
        let TransferArgs {
            to,
            amount,
            callback,
        } = args;
        self.submit(&amount, callback, |amount| TxIntent::Transfer { to, amount })
            .await
    }

    async fn prerequisites(&self) -> BridgeResult<(Arc<dyn ChainConnection>, Arc<Account>)> {
        let connection = self
            .connection
            .current()
            .await
            .ok_or(BridgeError::MissingPrerequisite(Prerequisite::ChainConnection))?;
        let account = self
            .selected_account()
            .ok_or(BridgeError::MissingPrerequisite(Prerequisite::SelectedAccount))?;
        Ok((connection, account))
    }

    async fn submit(
        &self,
        amount: &str,
        callback: Option<Callback>,
        intent: impl FnOnce(u64) -> TxIntent,
    ) -> BridgeResult<TxHash> {
        // Nothing is issued and nothing is shown until both are present.
        let (connection, account) = self.prerequisites().await?;
        let amount = to_base_units(amount).map_err(BridgeError::InvalidAmount)?;

        let intent = intent(amount);
        let kind = intent.kind();
        let submission = Uuid::new_v4();

        let _guard = self
            .in_flight
            .try_claim(&account.address, submission)
            .ok_or_else(|| BridgeError::SubmissionInFlight(account.address.clone()))?;

        tracing::info!(
            submission = %submission,
            kind = %kind,
            from = %account.address,
            amount = amount,
            endpoint = %connection.endpoint(),
            "Submitting transaction"
        );

        let call = intent.into_call(self.settings.net_id);
        let result = async {
            let signer = self.extension.from_address(&account.address).await?;
            let hash = TxBuilder::new(connection.as_ref())
                .sign_and_send(&account.address, call, signer.as_ref())
                .await?;
            Ok::<_, BridgeError>(hash)
        }
        .await;

        metrics::record_submission(kind.as_str(), result.is_ok());

        match result {
            Ok(hash) => {
                tracing::info!(submission = %submission, tx_hash = %hash, "Transaction done");
                self.notifier
                    .notify(Notification::Success(SUCCESS_MESSAGE.to_string()));
                if let Some(callback) = callback {
                    callback(&hash);
                }
                Ok(hash)
            }
            Err(e) => {
                tracing::warn!(submission = %submission, kind = %kind, error = %e, "Transaction failed");
                self.notifier.notify(Notification::Failure(e.to_string()));
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for WalletBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletBridge")
            .field("settings", &self.settings)
            .field("accounts", &self.accounts.load().len())
            .field(
                "selected",
                &self.selected.load().as_ref().map(|a| a.address.clone()),
            )
            .finish()
    }
}
