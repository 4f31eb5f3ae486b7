//! JSON-RPC 2.0 client for a Solana-compatible node.
//!
//! Implements [`AnchorProvider`], [`SubmissionSink`], and [`BalanceQuery`]
//! over HTTP with a caller-supplied timeout. A timed-out or unreachable
//! node surfaces as `NetworkUnavailable`; node-side rejections are
//! classified into the transfer error taxonomy in [`classify_submit_error`].

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use sol_wire::SignedEnvelope;
use tracing::debug;

use crate::error::TransferError;
use crate::provider::{Anchor, AnchorProvider, BalanceQuery, SubmissionSink};

/// HTTP JSON-RPC client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Build a client for `url`. Every request (connect + body) is bounded
    /// by `timeout`; on expiry the operation reports `NetworkUnavailable`
    /// instead of hanging.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransferError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransferError::NetworkUnavailable(format!("http client build: {e}")))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, TransferError> {
        debug!(method, "rpc request");

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let payload: Value = response.json().await.map_err(transport_error)?;

        if let Some(err) = payload.get("error") {
            return Err(if method == "sendTransaction" {
                classify_submit_error(err)
            } else {
                TransferError::NetworkUnavailable(rpc_error_message(err).to_string())
            });
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| {
                TransferError::NetworkUnavailable("rpc response missing result".into())
            })
    }

    /// Confirmation level of a previously submitted transaction:
    /// `processed`, `confirmed`, or `finalized`. `None` while the network
    /// has not seen the signature yet.
    pub async fn signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<String>, TransferError> {
        let result = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;

        #[derive(Deserialize)]
        struct Statuses {
            value: Vec<Option<StatusValue>>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct StatusValue {
            confirmation_status: Option<String>,
        }

        let statuses: Statuses = serde_json::from_value(result)
            .map_err(|e| TransferError::NetworkUnavailable(format!("malformed status: {e}")))?;

        Ok(statuses
            .value
            .into_iter()
            .next()
            .flatten()
            .and_then(|s| s.confirmation_status))
    }
}

#[async_trait]
impl AnchorProvider for RpcClient {
    async fn recent_anchor(&self) -> Result<Anchor, TransferError> {
        let result = self
            .call("getLatestBlockhash", json!([{"commitment": "confirmed"}]))
            .await?;

        #[derive(Deserialize)]
        struct BlockhashResult {
            value: BlockhashValue,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct BlockhashValue {
            blockhash: String,
            last_valid_block_height: u64,
        }

        let parsed: BlockhashResult = serde_json::from_value(result)
            .map_err(|e| TransferError::NetworkUnavailable(format!("malformed blockhash: {e}")))?;

        let bytes = bs58::decode(&parsed.value.blockhash)
            .into_vec()
            .map_err(|e| {
                TransferError::NetworkUnavailable(format!("blockhash decode failed: {e}"))
            })?;
        let blockhash: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            TransferError::NetworkUnavailable(format!(
                "blockhash expected 32 bytes, got {}",
                v.len()
            ))
        })?;

        Ok(Anchor {
            blockhash,
            last_valid_block_height: parsed.value.last_valid_block_height,
        })
    }
}

#[async_trait]
impl SubmissionSink for RpcClient {
    async fn submit(&self, envelope: &SignedEnvelope) -> Result<String, TransferError> {
        let encoded = BASE64.encode(envelope.as_bytes());

        let result = self
            .call(
                "sendTransaction",
                json!([encoded, {"encoding": "base64", "preflightCommitment": "confirmed"}]),
            )
            .await?;

        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| {
                TransferError::SubmissionRejected("node returned a non-string signature".into())
            })
    }
}

#[async_trait]
impl BalanceQuery for RpcClient {
    async fn balance(&self, address: &str) -> Result<u64, TransferError> {
        let result = self
            .call("getBalance", json!([address, {"commitment": "confirmed"}]))
            .await?;

        #[derive(Deserialize)]
        struct BalanceResult {
            value: u64,
        }

        let parsed: BalanceResult = serde_json::from_value(result)
            .map_err(|e| TransferError::NetworkUnavailable(format!("malformed balance: {e}")))?;

        Ok(parsed.value)
    }
}

fn transport_error(e: reqwest::Error) -> TransferError {
    if e.is_timeout() {
        TransferError::NetworkUnavailable(format!("request timed out: {e}"))
    } else {
        TransferError::NetworkUnavailable(e.to_string())
    }
}

fn rpc_error_message(err: &Value) -> &str {
    err.get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown rpc error")
}

/// Map a `sendTransaction` node error onto the transfer taxonomy.
///
/// The node reports an expired anchor as a blockhash-not-found preflight
/// failure (or block-height-exceeded at confirmation), and a resubmitted
/// transaction as an already-processed signature. Both must stay
/// distinguishable from generic rejection.
fn classify_submit_error(err: &Value) -> TransferError {
    let message = rpc_error_message(err);

    if message.contains("Blockhash not found") || message.contains("block height exceeded") {
        TransferError::AnchorExpired(message.to_string())
    } else if message.contains("already been processed") {
        TransferError::SubmissionRejected(format!("duplicate transaction signature: {message}"))
    } else {
        TransferError::SubmissionRejected(message.to_string())
    }
}
