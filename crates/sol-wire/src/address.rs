//! Solana address encoding.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte Ed25519 public
//! key. There is no hashing or checksum step.

use crate::error::WireError;

/// Encode a 32-byte public key as a Base58 address string.
pub fn encode(pubkey: &[u8; 32]) -> String {
    bs58::encode(pubkey).into_string()
}

/// Decode an address string back to its 32-byte public key.
///
/// Fails if the string is not valid Base58 or does not decode to exactly
/// 32 bytes.
pub fn decode(address: &str) -> Result<[u8; 32], WireError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| WireError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        WireError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Whether a string is a syntactically valid Solana address.
pub fn is_valid(address: &str) -> bool {
    decode(address).is_ok()
}
