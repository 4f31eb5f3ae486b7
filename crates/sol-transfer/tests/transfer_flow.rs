//! Cross-crate integration tests exercising the full transfer flow:
//! seed phrase -> derive keypair -> build envelope -> sign -> submit,
//! against in-process anchor and submission fakes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use seed_keys::derive_keypair;
use sol_transfer::{build_and_send, Anchor, AnchorProvider, SubmissionSink, TransferError};
use sol_wire::{address, Envelope, SignedEnvelope};

const TEST_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

const RECIPIENT: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

const TEST_BLOCKHASH: [u8; 32] = [0xD4; 32];

struct FixedAnchor {
    fetches: AtomicUsize,
}

impl FixedAnchor {
    fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AnchorProvider for FixedAnchor {
    async fn recent_anchor(&self) -> Result<Anchor, TransferError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Anchor {
            blockhash: TEST_BLOCKHASH,
            last_valid_block_height: 1_000,
        })
    }
}

/// Records every submitted envelope and returns its Base58 signature.
struct RecordingSink {
    submissions: Mutex<Vec<SignedEnvelope>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(&self, envelope: &SignedEnvelope) -> Result<String, TransferError> {
        let signature = envelope.signature_base58();
        self.submissions.lock().unwrap().push(envelope.clone());
        Ok(signature)
    }
}

/// A sink that always fails with the given error constructor.
struct FailingSink(fn() -> TransferError);

#[async_trait]
impl SubmissionSink for FailingSink {
    async fn submit(&self, _envelope: &SignedEnvelope) -> Result<String, TransferError> {
        Err((self.0)())
    }
}

struct UnreachableAnchor;

#[async_trait]
impl AnchorProvider for UnreachableAnchor {
    async fn recent_anchor(&self) -> Result<Anchor, TransferError> {
        Err(TransferError::NetworkUnavailable("connection refused".into()))
    }
}

// --- the fixed end-to-end scenario -----------------------------------------

#[tokio::test]
async fn end_to_end_transfer_from_derived_key() {
    use ed25519_dalek::{Signature, VerifyingKey};

    // Index 0 and 1 derive distinct keypairs from the same phrase.
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();
    let k1 = derive_keypair(TEST_PHRASE, 1).unwrap();
    assert_ne!(k0.public_key(), k1.public_key());

    let anchor = FixedAnchor::new();
    let sink = RecordingSink::new();

    let tx_id = build_and_send(&k0, RECIPIENT, 1_000_000, &anchor, &sink)
        .await
        .unwrap();

    // Well-formed identifier: Base58 of a 64-byte signature.
    let id_bytes = bs58::decode(&tx_id).into_vec().unwrap();
    assert_eq!(id_bytes.len(), 64);

    // Exactly one submission.
    let submissions = sink.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    let wire = submissions[0].as_bytes();

    // The submitted message equals a transfer of exactly 1,000,000 lamports
    // from K0 to the recipient, anchored on the provided blockhash.
    let expected = Envelope::native_transfer(
        &k0.public_key(),
        &address::decode(RECIPIENT).unwrap(),
        1_000_000,
        &TEST_BLOCKHASH,
    )
    .unwrap()
    .message_bytes();
    assert_eq!(&wire[65..], &expected[..]);

    // The signature verifies under K0's public key.
    let sig = Signature::from_bytes(&wire[1..65].try_into().unwrap());
    let vk = VerifyingKey::from_bytes(&k0.public_key()).unwrap();
    assert!(vk.verify_strict(&wire[65..], &sig).is_ok());
}

#[tokio::test]
async fn repeated_flow_is_deterministic_up_to_submission() {
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();

    let anchor = FixedAnchor::new();
    let sink_a = RecordingSink::new();
    let sink_b = RecordingSink::new();

    build_and_send(&k0, RECIPIENT, 500, &anchor, &sink_a)
        .await
        .unwrap();
    build_and_send(&k0, RECIPIENT, 500, &anchor, &sink_b)
        .await
        .unwrap();

    // Same key, amount, and anchor produce identical signed bytes.
    let a = sink_a.submissions.lock().unwrap();
    let b = sink_b.submissions.lock().unwrap();
    assert_eq!(a[0], b[0]);
}

// --- parameter validation happens before any network call -------------------

#[tokio::test]
async fn zero_amount_fails_before_network() {
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();
    let anchor = FixedAnchor::new();
    let sink = RecordingSink::new();

    let result = build_and_send(&k0, RECIPIENT, 0, &anchor, &sink).await;
    assert!(matches!(
        result,
        Err(TransferError::InvalidTransferParameters(_))
    ));

    assert_eq!(anchor.fetches.load(Ordering::SeqCst), 0);
    assert!(sink.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_recipient_fails_before_network() {
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();
    let anchor = FixedAnchor::new();
    let sink = RecordingSink::new();

    let result = build_and_send(&k0, "not-an-address!!!", 1_000, &anchor, &sink).await;
    assert!(matches!(
        result,
        Err(TransferError::InvalidTransferParameters(_))
    ));
    assert_eq!(anchor.fetches.load(Ordering::SeqCst), 0);
}

// --- error propagation ------------------------------------------------------

#[tokio::test]
async fn expired_anchor_surfaces_as_anchor_expired() {
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();
    let anchor = FixedAnchor::new();
    let sink = FailingSink(|| {
        TransferError::AnchorExpired("Transaction simulation failed: Blockhash not found".into())
    });

    let result = build_and_send(&k0, RECIPIENT, 1_000, &anchor, &sink).await;
    match result {
        Err(err @ TransferError::AnchorExpired(_)) => assert!(err.is_retryable()),
        other => panic!("expected AnchorExpired, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_submission_surfaces_as_rejection() {
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();
    let anchor = FixedAnchor::new();
    let sink = FailingSink(|| {
        TransferError::SubmissionRejected(
            "duplicate transaction signature: already been processed".into(),
        )
    });

    let result = build_and_send(&k0, RECIPIENT, 1_000, &anchor, &sink).await;
    match result {
        Err(err @ TransferError::SubmissionRejected(_)) => assert!(!err.is_retryable()),
        other => panic!("expected SubmissionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn anchor_fetch_failure_propagates_without_submission() {
    let k0 = derive_keypair(TEST_PHRASE, 0).unwrap();
    let sink = RecordingSink::new();

    let result = build_and_send(&k0, RECIPIENT, 1_000, &UnreachableAnchor, &sink).await;
    assert!(matches!(result, Err(TransferError::NetworkUnavailable(_))));
    assert!(sink.submissions.lock().unwrap().is_empty());
}
