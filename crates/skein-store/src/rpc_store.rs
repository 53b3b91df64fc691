//! JSON-RPC client for a data-availability node's blob API.
//!
//! Speaks JSON-RPC 2.0 over HTTP with bearer-token auth:
//!
//! - `blob.Submit([blob], options) -> height`
//! - `blob.Get(height, namespace, commitment) -> blob`
//! - `blob.GetAll(height, [namespace]) -> [blob]`
//!
//! Byte fields travel base64-encoded. The node computes commitments itself;
//! after a submit the client lists the blobs at the returned height and
//! takes the commitment of the one whose data matches.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use skein_types::{Commitment, Namespace};
use tracing::{debug, trace, warn};

use crate::error::StoreError;
use crate::traits::{BlobStore, Submitted};

/// Share version used for every submitted blob.
const SHARE_VERSION_ZERO: u32 = 0;

/// Client for a node's blob JSON-RPC API.
pub struct RpcBlobStore {
    http: reqwest::Client,
    url: Url,
    auth_token: Option<String>,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Blob as the node encodes it.
#[derive(Debug, Serialize, Deserialize)]
struct WireBlob {
    namespace: String,
    data: String,
    share_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    commitment: Option<String>,
}

impl WireBlob {
    fn namespace(&self) -> Result<Namespace, StoreError> {
        Namespace::from_bytes(&decode_b64("namespace", &self.namespace)?)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }

    fn data(&self) -> Result<Vec<u8>, StoreError> {
        decode_b64("data", &self.data)
    }

    fn commitment(&self) -> Result<Commitment, StoreError> {
        let raw = self
            .commitment
            .as_deref()
            .ok_or_else(|| StoreError::MalformedResponse("blob has no commitment".into()))?;
        Commitment::new(decode_b64("commitment", raw)?)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }
}

fn decode_b64(field: &str, value: &str) -> Result<Vec<u8>, StoreError> {
    STANDARD
        .decode(value)
        .map_err(|e| StoreError::MalformedResponse(format!("bad base64 in {field}: {e}")))
}

fn is_not_found(message: &str) -> bool {
    message.to_ascii_lowercase().contains("not found")
}

impl RpcBlobStore {
    /// Create a client for the node at `url`.
    pub fn new(url: &str, auth_token: Option<String>) -> Result<Self, StoreError> {
        let url = Url::parse(url)
            .map_err(|e| StoreError::Rejected(format!("invalid rpc url {url:?}: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            url,
            auth_token: auth_token.filter(|t| !t.is_empty()),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, StoreError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let mut builder = self.http.post(self.url.clone()).json(&request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Rejected(format!("{method}: http {status}: {body}")));
        }

        let envelope: RpcResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::MalformedResponse(format!("{method}: {e}")))?;
        if let Some(err) = envelope.error {
            return Err(StoreError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = envelope.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map_err(|e| StoreError::MalformedResponse(format!("{method}: {e}")))
    }

    fn encode_namespace(namespace: &Namespace) -> String {
        STANDARD.encode(namespace.to_bytes())
    }

    /// Find the commitment of `data` among the blobs committed at `height`.
    async fn resolve_commitment(
        &self,
        height: u64,
        namespace: &Namespace,
        data: &[u8],
    ) -> Result<Commitment, StoreError> {
        let blobs: Option<Vec<WireBlob>> = self
            .call(
                "blob.GetAll",
                json!([height, [Self::encode_namespace(namespace)]]),
            )
            .await?;

        // Other blobs at this height are not ours to validate; skip any that
        // fail to decode or sit in a different namespace.
        for blob in blobs.unwrap_or_default() {
            match blob.namespace() {
                Ok(ns) if ns == *namespace => {}
                Ok(ns) => {
                    trace!(height, %ns, "skipping blob from other namespace");
                    continue;
                }
                Err(e) => {
                    debug!(height, error = %e, "skipping undecodable blob");
                    continue;
                }
            }
            match blob.data() {
                Ok(bytes) if bytes == data => return blob.commitment(),
                Ok(_) => {}
                Err(e) => debug!(height, error = %e, "skipping undecodable blob"),
            }
        }
        Err(StoreError::CommitmentUnresolved(height))
    }
}

#[async_trait::async_trait]
impl BlobStore for RpcBlobStore {
    async fn submit(&self, namespace: &Namespace, data: Bytes) -> Result<Submitted, StoreError> {
        let blob = WireBlob {
            namespace: Self::encode_namespace(namespace),
            data: STANDARD.encode(&data),
            share_version: SHARE_VERSION_ZERO,
            commitment: None,
        };

        debug!(%namespace, size = data.len(), "submitting blob to node");
        let height: u64 = self.call("blob.Submit", json!([[blob], {}])).await?;
        if height == 0 {
            // Nothing was committed, so there is no commitment to resolve.
            warn!(%namespace, "node reported height 0 for submission");
            return Ok(Submitted {
                commitment: Commitment::from([0u8; 32]),
                height,
            });
        }

        let commitment = self.resolve_commitment(height, namespace, &data).await?;
        Ok(Submitted { commitment, height })
    }

    async fn get(
        &self,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> Result<Bytes, StoreError> {
        let params = json!([
            height,
            Self::encode_namespace(namespace),
            STANDARD.encode(commitment.as_bytes())
        ]);

        let blob: Option<WireBlob> = match self.call("blob.Get", params).await {
            Ok(blob) => blob,
            Err(StoreError::Rpc { message, .. }) if is_not_found(&message) => None,
            Err(e) => return Err(e),
        };

        let blob = blob.ok_or_else(|| StoreError::NotFound {
            height,
            namespace: *namespace,
            commitment: commitment.clone(),
        })?;
        Ok(Bytes::from(blob.data()?))
    }
}
