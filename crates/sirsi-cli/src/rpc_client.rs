// crates/sirsi-cli/src/rpc_client.rs
//
// Lightweight client for the daemon's Connect-style JSON surface:
// `POST <base>/<service>/<method>` with the request as the JSON body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error half of the server's response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    pub code: String,
    pub message: String,
}

/// Mirrors the server's JsonRpcResponse envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The daemon answered with `success: false`.
    #[error("{code}: {message}")]
    Rpc { code: String, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl JsonRpcResponse {
    /// Unwrap the envelope into its `result` payload or the remote error.
    pub fn into_result(self) -> Result<serde_json::Value, ClientError> {
        if self.success {
            return Ok(self.result.unwrap_or(serde_json::Value::Null));
        }
        match self.error {
            Some(e) => Err(ClientError::Rpc {
                code: e.code,
                message: e.message,
            }),
            None => Err(ClientError::Decode(
                "failure envelope without an error body".to_string(),
            )),
        }
    }
}

/// Handle on one daemon endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    base_url: String,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url_for(&self, service: &str, method: &str) -> String {
        format!("{}/{}/{}", self.base_url, service, method)
    }

    /// Call a method and return the raw `result` value.
    pub async fn call_value<Req: Serialize>(
        &self,
        service: &str,
        method: &str,
        request: &Req,
    ) -> Result<serde_json::Value, ClientError> {
        let resp = self
            .http
            .post(self.url_for(service, method))
            .json(request)
            .send()
            .await?;

        // Error statuses still carry the envelope, so the body is parsed
        // regardless of the status code.
        let envelope: JsonRpcResponse = resp.json().await?;
        envelope.into_result()
    }

    /// Call a method and decode `result` into a typed response.
    pub async fn call<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        service: &str,
        method: &str,
        request: &Req,
    ) -> Result<Resp, ClientError> {
        let value = self.call_value(service, method, request).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
