use ed25519_dalek::Signer;
use zeroize::Zeroize;

/// A derived Ed25519 keypair.
///
/// The 32-byte secret stays inside this struct for its whole lifetime: it is
/// never returned, never printed, and is zeroized on drop. Callers that need
/// a signature go through [`Keypair::sign`].
pub struct Keypair {
    secret: [u8; 32],
    public: [u8; 32],
    derivation_path: String,
}

impl Keypair {
    pub(crate) fn new(secret: [u8; 32], public: [u8; 32], derivation_path: String) -> Self {
        Self {
            secret,
            public,
            derivation_path,
        }
    }

    /// The 32-byte Ed25519 public key (the Solana address bytes).
    pub fn public_key(&self) -> [u8; 32] {
        self.public
    }

    /// The path this keypair was derived on, e.g. `m/44'/501'/0'/0'`.
    pub fn derivation_path(&self) -> &str {
        &self.derivation_path
    }

    /// Sign arbitrary message bytes, returning the 64-byte Ed25519 signature.
    ///
    /// Ed25519 signing is deterministic: the same message under the same key
    /// always yields the same signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let mut seed = self.secret;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();

        signing_key.sign(message).to_bytes()
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &self.public)
            .field("derivation_path", &self.derivation_path)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, VerifyingKey};

    fn test_keypair() -> Keypair {
        let secret = [0x42u8; 32];
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&secret);
        let public = signing_key.verifying_key().to_bytes();
        Keypair::new(secret, public, "m/44'/501'/0'/0'".into())
    }

    #[test]
    fn signature_verifies_under_public_key() {
        let kp = test_keypair();
        let msg = b"hello solana";
        let sig_bytes = kp.sign(msg);

        let vk = VerifyingKey::from_bytes(&kp.public_key()).unwrap();
        let sig = Signature::from_bytes(&sig_bytes);
        assert!(vk.verify_strict(msg, &sig).is_ok());
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = test_keypair();
        let sig1 = kp.sign(b"same message");
        let sig2 = kp.sign(b"same message");
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn different_messages_different_signatures() {
        let kp = test_keypair();
        assert_ne!(kp.sign(b"message a"), kp.sign(b"message b"));
    }

    #[test]
    fn debug_redacts_secret() {
        let kp = test_keypair();
        let debug = format!("{kp:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("66, 66, 66")); // 0x42 bytes must not leak
    }
}
