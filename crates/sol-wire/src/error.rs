use thiserror::Error;

/// Wire-format and signing errors.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("envelope build error: {0}")]
    EnvelopeBuild(String),

    #[error("signature invalid: {0}")]
    SignatureInvalid(String),
}
