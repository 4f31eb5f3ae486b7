//! The transfer flow: validate, anchor, build, sign, submit.

use std::time::Duration;

use seed_keys::Keypair;
use sol_wire::{address, Envelope};
use tracing::{debug, info};

use crate::error::TransferError;
use crate::provider::{AnchorProvider, BalanceQuery, SubmissionSink};
use crate::rpc::RpcClient;

/// Build, sign, and submit a native SOL transfer.
///
/// Steps, in order:
/// 1. Validate `recipient` and `lamports` — both checked before any network
///    round trip.
/// 2. Fetch a fresh anchor from `anchor_provider`. One anchor per transfer;
///    reusing a fetched anchor across transfers risks collision on the
///    network's duplicate-signature check.
/// 3. Build the transfer envelope with the sender as fee payer.
/// 4. Sign the message bytes and seal the envelope. The seal verifies the
///    signature, so malformed key material surfaces here as
///    [`TransferError::SigningFailure`].
/// 5. Submit and return the network-assigned signature. This is initial
///    acceptance into the pending pool, not settlement.
///
/// On [`TransferError::AnchorExpired`] the caller should re-invoke this
/// function (fresh anchor, fresh signature) rather than resubmit anything.
pub async fn build_and_send(
    keypair: &Keypair,
    recipient: &str,
    lamports: u64,
    anchor_provider: &dyn AnchorProvider,
    sink: &dyn SubmissionSink,
) -> Result<String, TransferError> {
    let to = address::decode(recipient)
        .map_err(|e| TransferError::InvalidTransferParameters(e.to_string()))?;
    if lamports == 0 {
        return Err(TransferError::InvalidTransferParameters(
            "amount must be greater than zero".into(),
        ));
    }

    let anchor = anchor_provider.recent_anchor().await?;
    debug!(
        last_valid_block_height = anchor.last_valid_block_height,
        "anchor fetched"
    );

    let from = keypair.public_key();
    let envelope = Envelope::native_transfer(&from, &to, lamports, &anchor.blockhash)?;

    let signature = keypair.sign(&envelope.message_bytes());
    let signed = envelope.into_signed(&signature, &from)?;

    let tx_signature = sink.submit(&signed).await?;
    info!(signature = %tx_signature, lamports, "transfer accepted");

    Ok(tx_signature)
}

/// Convenience client wiring one [`RpcClient`] into the transfer flow as
/// both anchor provider and submission sink.
#[derive(Debug, Clone)]
pub struct TransferClient {
    rpc: RpcClient,
}

impl TransferClient {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, TransferError> {
        Ok(Self {
            rpc: RpcClient::new(rpc_url, timeout)?,
        })
    }

    /// See [`build_and_send`].
    pub async fn send_transfer(
        &self,
        keypair: &Keypair,
        recipient: &str,
        lamports: u64,
    ) -> Result<String, TransferError> {
        build_and_send(keypair, recipient, lamports, &self.rpc, &self.rpc).await
    }

    /// Lamport balance of `address`.
    pub async fn balance(&self, address: &str) -> Result<u64, TransferError> {
        self.rpc.balance(address).await
    }

    /// Confirmation level of a submitted transaction, if the network has
    /// seen it.
    pub async fn confirmation_status(
        &self,
        signature: &str,
    ) -> Result<Option<String>, TransferError> {
        self.rpc.signature_status(signature).await
    }
}
