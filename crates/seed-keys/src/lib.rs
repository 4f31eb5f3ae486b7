//! Deterministic Ed25519 key derivation from BIP-39 seed phrases.
//!
//! A seed phrase plus an account index maps to exactly one keypair on the
//! Solana path `m/44'/501'/{index}'/0'` via SLIP-0010. Derivation is a pure
//! computation: no I/O, no shared state, safe to call from any thread.
//!
//! Secret key material never leaves this crate. [`Keypair`] owns its 32-byte
//! secret, zeroizes it on drop, and exposes only a signing operation.

pub mod derivation;
pub mod error;
pub mod keypair;
pub mod mnemonic;

pub use derivation::derive_keypair;
pub use error::KeyError;
pub use keypair::Keypair;
pub use mnemonic::{generate_phrase, phrase_to_seed, validate_phrase};
