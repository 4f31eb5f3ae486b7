//! Solana transaction envelope: wire format, compilation, and sealing.
//!
//! The wire layout is Solana's compact binary format:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (program index, account indices, data)
//! ```
//!
//! An [`Envelope`] is the mutable pre-signature stage. Sealing it with
//! [`Envelope::into_signed`] consumes it and verifies the signature against
//! the message bytes, so a [`SignedEnvelope`] can only exist for bytes that
//! actually verify, and the signed content cannot be mutated afterwards.

use ed25519_dalek::{Signature, VerifyingKey};

use crate::error::WireError;

/// The Solana System Program public key: 32 zero bytes
/// (`11111111111111111111111111111111` in Base58).
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

/// Encode a `u16` in Solana's compact-u16 format (1-3 bytes, 7 bits per
/// byte, high bit marks continuation).
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// One account reference inside an instruction.
#[derive(Debug, Clone)]
pub struct AccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

/// An instruction before compilation into an envelope.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction after compilation: account references replaced by u8
/// indices into the envelope's account key list.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// An unsigned transaction envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Account keys in canonical order: writable signers (fee payer first),
    /// read-only signers, writable non-signers, read-only non-signers.
    account_keys: Vec<[u8; 32]>,
    num_required_signatures: u8,
    num_readonly_signed: u8,
    num_readonly_unsigned: u8,
    recent_blockhash: [u8; 32],
    instructions: Vec<CompiledInstruction>,
}

impl Envelope {
    /// Build a native SOL transfer: debit `from`, credit `to`, for
    /// `lamports`, anchored on `recent_blockhash`. The sender is the fee
    /// payer and sole signer.
    pub fn native_transfer(
        from: &[u8; 32],
        to: &[u8; 32],
        lamports: u64,
        recent_blockhash: &[u8; 32],
    ) -> Result<Self, WireError> {
        if lamports == 0 {
            return Err(WireError::EnvelopeBuild("lamports must be > 0".into()));
        }

        let instruction = system_transfer_instruction(from, to, lamports);
        Self::compile(&[instruction], from, recent_blockhash)
    }

    /// Compile instructions into an envelope with a single fee payer.
    ///
    /// The fee payer is always the first signer, at account index 0.
    pub fn compile(
        instructions: &[Instruction],
        fee_payer: &[u8; 32],
        recent_blockhash: &[u8; 32],
    ) -> Result<Self, WireError> {
        // Instruction account lists are tiny, so plain Vec lookup beats
        // dragging in a map.
        struct AccountEntry {
            pubkey: [u8; 32],
            is_signer: bool,
            is_writable: bool,
        }

        let mut entries: Vec<AccountEntry> = Vec::new();

        let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
            if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
                entry.is_signer |= signer;
                entry.is_writable |= writable;
            } else {
                entries.push(AccountEntry {
                    pubkey,
                    is_signer: signer,
                    is_writable: writable,
                });
            }
        };

        // Fee payer is always signer + writable.
        upsert(*fee_payer, true, true);

        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            // Program IDs are non-signer, read-only accounts.
            upsert(ix.program_id, false, false);
        }

        // Stable sort into canonical order, preserving insertion order
        // within each category so the fee payer stays first.
        fn rank(e: &AccountEntry) -> u8 {
            match (e.is_signer, e.is_writable) {
                (true, true) => 0,
                (true, false) => 1,
                (false, true) => 2,
                (false, false) => 3,
            }
        }
        entries.sort_by_key(rank);

        let num_required_signatures = entries.iter().filter(|e| e.is_signer).count() as u8;
        let num_readonly_signed = entries
            .iter()
            .filter(|e| e.is_signer && !e.is_writable)
            .count() as u8;
        let num_readonly_unsigned = entries
            .iter()
            .filter(|e| !e.is_signer && !e.is_writable)
            .count() as u8;

        let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();

        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            let program_id_index = account_keys
                .iter()
                .position(|k| *k == ix.program_id)
                .ok_or_else(|| WireError::EnvelopeBuild("program_id not in account keys".into()))?
                as u8;

            let mut account_indices = Vec::with_capacity(ix.accounts.len());
            for meta in &ix.accounts {
                let idx = account_keys
                    .iter()
                    .position(|k| *k == meta.pubkey)
                    .ok_or_else(|| {
                        WireError::EnvelopeBuild("account not in account keys".into())
                    })? as u8;
                account_indices.push(idx);
            }

            compiled.push(CompiledInstruction {
                program_id_index,
                account_indices,
                data: ix.data.clone(),
            });
        }

        Ok(Self {
            account_keys,
            num_required_signatures,
            num_readonly_signed,
            num_readonly_unsigned,
            recent_blockhash: *recent_blockhash,
            instructions: compiled,
        })
    }

    /// The fee payer (first signer) public key.
    pub fn fee_payer(&self) -> [u8; 32] {
        self.account_keys[0]
    }

    pub fn account_keys(&self) -> &[[u8; 32]] {
        &self.account_keys
    }

    pub fn num_required_signatures(&self) -> u8 {
        self.num_required_signatures
    }

    pub fn recent_blockhash(&self) -> [u8; 32] {
        self.recent_blockhash
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        &self.instructions
    }

    /// Serialize the message: exactly the bytes that get signed.
    pub fn message_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&encode_compact_u16(self.account_keys.len() as u16));
        for key in &self.account_keys {
            buf.extend_from_slice(key);
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&encode_compact_u16(self.instructions.len() as u16));
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&encode_compact_u16(ix.account_indices.len() as u16));
            buf.extend_from_slice(&ix.account_indices);

            buf.extend_from_slice(&encode_compact_u16(ix.data.len() as u16));
            buf.extend_from_slice(&ix.data);
        }

        buf
    }

    /// Seal the envelope with a detached signature from the fee payer.
    ///
    /// The signature is verified against [`Envelope::message_bytes`] under
    /// `signer_pubkey` before any wire bytes are assembled, and the signer
    /// must be the fee payer. Consumes the envelope; the result is
    /// immutable.
    pub fn into_signed(
        self,
        signature: &[u8; 64],
        signer_pubkey: &[u8; 32],
    ) -> Result<SignedEnvelope, WireError> {
        if self.num_required_signatures != 1 {
            return Err(WireError::SignatureInvalid(format!(
                "envelope requires {} signatures, only single-signer sealing is supported",
                self.num_required_signatures
            )));
        }
        if self.fee_payer() != *signer_pubkey {
            return Err(WireError::SignatureInvalid(
                "signer is not the envelope's fee payer".into(),
            ));
        }

        let message = self.message_bytes();

        let vk = VerifyingKey::from_bytes(signer_pubkey)
            .map_err(|e| WireError::SignatureInvalid(format!("malformed public key: {e}")))?;
        let sig = Signature::from_bytes(signature);
        vk.verify_strict(&message, &sig)
            .map_err(|_| WireError::SignatureInvalid("signature does not verify".into()))?;

        let mut wire = Vec::with_capacity(1 + 64 + message.len());
        wire.extend_from_slice(&encode_compact_u16(self.num_required_signatures as u16));
        wire.extend_from_slice(signature);
        wire.extend_from_slice(&message);

        Ok(SignedEnvelope { bytes: wire })
    }
}

/// A fully signed, immutable transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    bytes: Vec<u8>,
}

impl SignedEnvelope {
    /// The complete wire bytes, ready for `sendTransaction`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The fee payer's 64-byte signature, which doubles as the transaction
    /// identifier on Solana.
    pub fn signature(&self) -> [u8; 64] {
        // Wire always starts with compact-u16 num_signatures; for <= 127
        // signers that is a single byte.
        self.bytes[1..65].try_into().expect("wire has 64-byte signature slot")
    }

    /// The transaction identifier: Base58 of the fee payer's signature.
    pub fn signature_base58(&self) -> String {
        bs58::encode(self.signature()).into_string()
    }
}

/// Build a System Program `Transfer` instruction.
fn system_transfer_instruction(from: &[u8; 32], to: &[u8; 32], lamports: u64) -> Instruction {
    // Data: u32 LE instruction index (2 = Transfer) + u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}
