//! Ledger adapter: reads the registry contract over JSON-RPC.
//!
//! The authoritative record for a parcel is obtained with a single
//! `eth_call` at the `latest` block. The contract's getter takes the parcel
//! id as a `string` and returns `(string contentId, string digest, ...)`.
//! A reverted call or empty return data means the parcel is not registered.

use async_trait::async_trait;
use landreg_core::{ContentId, RecordKey};
use landreg_integrity::{LedgerError, LedgerReader, LedgerRecord};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::abi;
use crate::error::{truncate_body, ClientError};

const ENDPOINT: &str = "eth_call";

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallParams<'a>, &'static str),
}

#[derive(Debug, Serialize)]
struct CallParams<'a> {
    to: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn is_revert(&self) -> bool {
        self.message.to_ascii_lowercase().contains("revert")
    }
}

/// [`LedgerReader`] backed by a node's JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcLedgerReader {
    http: reqwest::Client,
    rpc_url: Url,
    contract: String,
    selector: [u8; 4],
}

impl RpcLedgerReader {
    pub(crate) fn new(http: reqwest::Client, rpc_url: Url, contract: String, selector: [u8; 4]) -> Self {
        Self {
            http,
            rpc_url,
            contract,
            selector,
        }
    }

    async fn call(&self, key: &RecordKey) -> Result<RpcResponse, ClientError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_call",
            params: (
                CallParams {
                    to: &self.contract,
                    data: format!(
                        "0x{}",
                        hex::encode(abi::encode_string_call(self.selector, key.as_str()))
                    ),
                },
                "latest",
            ),
        };

        let resp = crate::retry::retry_send(ENDPOINT, || {
            self.http.post(self.rpc_url.clone()).json(&request).send()
        })
        .await
        .map_err(|e| ClientError::Http {
            endpoint: ENDPOINT.into(),
            source: e.without_url(),
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint: ENDPOINT.into(),
                status,
                body: truncate_body(body),
            });
        }

        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: ENDPOINT.into(),
            source: e.without_url(),
        })
    }
}

#[async_trait]
impl LedgerReader for RpcLedgerReader {
    async fn authoritative(&self, key: &RecordKey) -> Result<LedgerRecord, LedgerError> {
        let response = self.call(key).await.map_err(|e| match e {
            ClientError::Deserialization { .. } => LedgerError::Malformed(e.to_string()),
            _ => LedgerError::Transport(e.to_string()),
        })?;

        if let Some(err) = response.error {
            if err.is_revert() {
                tracing::debug!(record_key = %key, message = %err.message, "ledger call reverted");
                return Err(LedgerError::NotFound(key.clone()));
            }
            return Err(LedgerError::Transport(format!(
                "JSON-RPC error {}: {}",
                err.code, err.message
            )));
        }

        let result = response
            .result
            .ok_or_else(|| LedgerError::Malformed("response has neither result nor error".into()))?;
        let body = result.strip_prefix("0x").unwrap_or(&result);
        if body.is_empty() {
            return Err(LedgerError::NotFound(key.clone()));
        }
        let data = hex::decode(body)
            .map_err(|e| LedgerError::Malformed(format!("result is not hex: {e}")))?;
        let (content_id, digest) =
            abi::decode_string_pair(&data).map_err(|e| LedgerError::Malformed(e.to_string()))?;

        tracing::debug!(record_key = %key, content_id = %content_id, "ledger record read");
        Ok(LedgerRecord {
            content_id: ContentId::from(content_id),
            digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(rpc_url: &str) -> RpcLedgerReader {
        RpcLedgerReader::new(
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_millis(200))
                .build()
                .unwrap(),
            Url::parse(rpc_url).unwrap(),
            "0x00000000000000000000000000000000000000aa".into(),
            [0x12, 0x34, 0x56, 0x78],
        )
    }

    #[tokio::test]
    async fn transport_error_does_not_reveal_rpc_url() {
        // Port 1 is closed; the path stands in for a hosted-node project key.
        let err = reader("http://127.0.0.1:1/v3/projectkey0123")
            .authoritative(&RecordKey::new("LHR-001").unwrap())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, LedgerError::Transport(_)), "{msg}");
        assert!(!msg.contains("projectkey0123"), "{msg}");
        assert!(!msg.contains("127.0.0.1"), "{msg}");
    }

    #[test]
    fn revert_detection_is_case_insensitive() {
        let e = RpcError {
            code: 3,
            message: "Execution Reverted".into(),
        };
        assert!(e.is_revert());
        let e = RpcError {
            code: -32005,
            message: "limit exceeded".into(),
        };
        assert!(!e.is_revert());
    }
}
