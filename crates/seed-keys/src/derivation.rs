use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::error::KeyError;
use crate::keypair::Keypair;
use crate::mnemonic;

type HmacSha512 = Hmac<Sha512>;

/// Child indices with the hardened bit set are not addressable: the bit is
/// applied during derivation, so an index at or above 2^31 would alias a
/// lower one.
const HARDENED_BIT: u32 = 0x8000_0000;

/// Solana derivation path: `m/44'/501'/{account}'/0'`, hardened at every
/// level (SLIP-0010 Ed25519 only supports hardened children).
fn derivation_path(account: u32) -> String {
    format!("m/44'/501'/{account}'/0'")
}

/// Derive the Ed25519 keypair at `account_index` from a BIP-39 seed phrase.
///
/// Deterministic: the same (phrase, index) pair always yields the same
/// keypair. Distinct indices yield independent keypairs per SLIP-0010.
pub fn derive_keypair(phrase: &str, account_index: u32) -> Result<Keypair, KeyError> {
    if account_index >= HARDENED_BIT {
        return Err(KeyError::InvalidIndex(format!(
            "index {account_index} exceeds the hardened derivation range (max {})",
            HARDENED_BIT - 1
        )));
    }

    let mut seed = mnemonic::phrase_to_seed(phrase)?;
    let result = derive_from_seed(&seed, account_index);
    seed.zeroize();
    result
}

/// SLIP-0010 Ed25519 derivation from raw seed bytes.
///
/// Master key: HMAC-SHA512(key="ed25519 seed", data=seed), then one
/// hardened-child HMAC round per path component.
fn derive_from_seed(seed: &[u8], account_index: u32) -> Result<Keypair, KeyError> {
    let path = derivation_path(account_index);

    let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
        .map_err(|e| KeyError::InvalidSeedPhrase(e.to_string()))?;
    mac.update(seed);
    let digest = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&digest[..32]);
    chain_code.copy_from_slice(&digest[32..]);

    for child_index in [44u32, 501, account_index, 0] {
        let mut mac = HmacSha512::new_from_slice(&chain_code)
            .map_err(|e| KeyError::InvalidSeedPhrase(e.to_string()))?;
        // Hardened child: 0x00 || key || (index | hardened bit)
        mac.update(&[0x00]);
        mac.update(&key);
        mac.update(&(child_index | HARDENED_BIT).to_be_bytes());
        let digest = mac.finalize().into_bytes();

        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
    }

    let signing_key = ed25519_dalek::SigningKey::from_bytes(&key);
    let public = signing_key.verifying_key().to_bytes();

    let keypair = Keypair::new(key, public, path);

    key.zeroize();
    chain_code.zeroize();

    Ok(keypair)
}
