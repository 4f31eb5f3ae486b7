use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::KeyError;

/// Generate a new 12-word BIP-39 mnemonic (128 bits of entropy).
pub fn generate_phrase() -> Result<String, KeyError> {
    let mut entropy = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| KeyError::InvalidSeedPhrase(e.to_string()))?;
    entropy.zeroize();
    Ok(mnemonic.to_string())
}

/// Check whether a phrase parses and checksums as valid BIP-39.
pub fn validate_phrase(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// Stretch a mnemonic into its 64-byte BIP-39 seed (empty passphrase).
///
/// Caller MUST zeroize the returned seed when done with it.
pub fn phrase_to_seed(phrase: &str) -> Result<Vec<u8>, KeyError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| KeyError::InvalidSeedPhrase(e.to_string()))?;

    let seed = mnemonic.to_seed("");
    Ok(seed.to_vec())
}
