//! Native SOL transfer signing and submission.
//!
//! Orchestrates the pieces from `seed-keys` (keypair) and `sol-wire`
//! (envelope) into one flow: validate parameters, fetch a recent blockhash
//! from an [`AnchorProvider`], build and sign the transfer envelope, and
//! hand it to a [`SubmissionSink`]. The node is reached through
//! [`RpcClient`], a JSON-RPC 2.0 client with a bounded per-request timeout.
//!
//! Concurrency: each transfer owns its keypair reference and its anchor for
//! the duration of the flow; nothing is shared or locked across the two
//! network round trips. The network itself serializes account state, so
//! concurrent transfers from one sender need no application-level mutual
//! exclusion.

pub mod error;
pub mod provider;
pub mod rpc;
pub mod signer;

pub use error::TransferError;
pub use provider::{Anchor, AnchorProvider, BalanceQuery, SubmissionSink};
pub use rpc::RpcClient;
pub use signer::{build_and_send, TransferClient};
