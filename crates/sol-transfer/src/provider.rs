//! Collaborator interfaces for the transfer flow.
//!
//! The signer never talks to a node directly; it goes through these traits,
//! so tests run against in-process fakes and production runs against
//! [`crate::rpc::RpcClient`], which implements all three.

use async_trait::async_trait;
use sol_wire::SignedEnvelope;

use crate::error::TransferError;

/// A recent network anchor: the freshness token every transaction carries.
///
/// Valid for a short window; a transaction anchored on an expired blockhash
/// is rejected by the network. Fetch one per transfer and never reuse it
/// across unrelated transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub blockhash: [u8; 32],
    /// Last block height at which a transaction carrying this blockhash is
    /// still accepted.
    pub last_valid_block_height: u64,
}

/// Read-only source of recent anchors.
#[async_trait]
pub trait AnchorProvider: Send + Sync {
    async fn recent_anchor(&self) -> Result<Anchor, TransferError>;
}

/// Accepts signed envelopes into the network's pending pool.
///
/// Returns the transaction signature on initial acceptance. Acceptance is
/// not settlement; confirmation is queried separately.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, envelope: &SignedEnvelope) -> Result<String, TransferError>;
}

/// Lamport balance lookup for an address. Consumed by glue layers (balance
/// endpoints), not by the transfer flow itself.
#[async_trait]
pub trait BalanceQuery: Send + Sync {
    async fn balance(&self, address: &str) -> Result<u64, TransferError>;
}
