//! Transaction building, signing, and broadcast.
//!
//! # Responsibilities
//! - Gather nonce, genesis hash, head and runtime versions for a payload
//! - Hand the payload to the extension signer
//! - Broadcast the signed extrinsic
//!
//! No retry: one failure ends the submission.

use thiserror::Error;

use crate::chain::call::ChainCall;
use crate::chain::connection::ChainConnection;
use crate::chain::types::{ChainError, SignerPayload, TxHash};
use crate::wallet::{Signer, WalletError};

/// Failure while signing or broadcasting.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Signer(#[from] WalletError),
}

/// Builds and submits calls over a borrowed connection.
pub struct TxBuilder<'a> {
    connection: &'a dyn ChainConnection,
}

impl<'a> TxBuilder<'a> {
    pub fn new(connection: &'a dyn ChainConnection) -> Self {
        Self { connection }
    }

    /// Assemble the payload the signer needs for `call` from `address`.
    pub async fn build(&self, address: &str, call: ChainCall) -> Result<SignerPayload, ChainError> {
        let (nonce, genesis_hash, block_number, version) = tokio::try_join!(
            self.connection.account_nonce(address),
            self.connection.genesis_hash(),
            self.connection.block_number(),
            self.connection.runtime_version(),
        )?;

        Ok(SignerPayload {
            address: address.to_string(),
            pallet: call.pallet().to_string(),
            call,
            nonce,
            genesis_hash,
            block_number,
            spec_version: version.spec_version,
            transaction_version: version.transaction_version,
        })
    }

    /// Build, sign through `signer`, and broadcast.
    pub async fn sign_and_send(
        &self,
        address: &str,
        call: ChainCall,
        signer: &dyn Signer,
    ) -> Result<TxHash, SubmitError> {
        let payload = self.build(address, call).await?;

        tracing::debug!(
            address = %address,
            pallet = %payload.pallet,
            method = payload.call.method(),
            nonce = payload.nonce,
            "Requesting signature"
        );

        let signed = signer.sign_payload(&payload).await?;
        let hash = self.connection.submit_extrinsic(&signed).await?;

        tracing::info!(tx_hash = %hash, method = payload.call.method(), "Extrinsic accepted");
        Ok(hash)
    }
}
