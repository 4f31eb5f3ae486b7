use thiserror::Error;

/// Key derivation errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid seed phrase: {0}")]
    InvalidSeedPhrase(String),

    #[error("invalid account index: {0}")]
    InvalidIndex(String),
}
