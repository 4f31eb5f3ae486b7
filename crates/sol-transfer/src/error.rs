use sol_wire::WireError;
use thiserror::Error;

/// Transfer signing and submission errors.
///
/// Only two kinds are retry-eligible, and both by the caller, never
/// internally: [`TransferError::NetworkUnavailable`] (retry with backoff)
/// and [`TransferError::AnchorExpired`] (refetch an anchor and re-sign; the
/// stale envelope must not be resubmitted). Everything else is terminal.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Bad recipient address or non-positive amount. Raised before any
    /// network call.
    #[error("invalid transfer parameters: {0}")]
    InvalidTransferParameters(String),

    /// The transaction's blockhash fell out of its validity window before
    /// the network accepted it.
    #[error("anchor expired: {0}")]
    AnchorExpired(String),

    /// Malformed key material or a signature that does not verify.
    #[error("signing failure: {0}")]
    SigningFailure(String),

    /// The node rejected the transaction (insufficient balance, duplicate
    /// signature, failed preflight).
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// Transport-level failure or timeout. Transient.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
}

impl TransferError {
    /// Whether the caller may retry the whole transfer flow.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::NetworkUnavailable(_) | TransferError::AnchorExpired(_)
        )
    }
}

impl From<WireError> for TransferError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::InvalidAddress(msg) => {
                TransferError::InvalidTransferParameters(format!("invalid address: {msg}"))
            }
            WireError::EnvelopeBuild(msg) => TransferError::InvalidTransferParameters(msg),
            WireError::SignatureInvalid(msg) => TransferError::SigningFailure(msg),
        }
    }
}
