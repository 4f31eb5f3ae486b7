//! Solana wire format: addresses, transaction envelopes, and sealing.
//!
//! Implements the compact binary transaction layout by hand rather than
//! pulling in `solana-sdk` and its dependency tree. Signing itself happens
//! elsewhere: this crate serializes the message to sign and verifies the
//! detached signature when sealing, so no secret key material ever enters
//! this crate.

pub mod address;
pub mod envelope;
pub mod error;

pub use envelope::{
    encode_compact_u16, AccountMeta, CompiledInstruction, Envelope, Instruction, SignedEnvelope,
    SYSTEM_PROGRAM_ID,
};
pub use error::WireError;
