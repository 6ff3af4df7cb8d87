//! JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 to the execution network endpoint
//! - Handle timeouts and network errors gracefully
//! - Fall through to failover endpoints when the primary is unreachable

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;
use uuid::Uuid;

use crate::config::schema::NetworkConfig;
use crate::observability::metrics;
use crate::rpc::types::{
    AccountEntry, GetTransactionResponse, HealthResponse, RpcError, RpcResult, SendResponse,
    SimulateResponse,
};

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: Uuid,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC client wrapper with failover support.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    /// List of endpoints (primary + failovers).
    endpoints: Vec<url::Url>,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// The primary URL must parse; invalid failover URLs are skipped with a
    /// warning rather than failing construction.
    pub fn new(config: &NetworkConfig) -> RpcResult<Self> {
        let mut endpoints = Vec::new();

        let primary: url::Url = config
            .rpc_url
            .parse()
            .map_err(|_| RpcError::InvalidUrl(config.rpc_url.clone()))?;
        endpoints.push(primary);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                endpoints.push(url);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoints,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Issue a JSON-RPC call, trying each endpoint in order.
    ///
    /// Transport failures and timeouts fall through to the next endpoint.
    /// A JSON-RPC error object is a definitive server answer and is returned
    /// immediately without trying further endpoints.
    async fn call<R: DeserializeOwned>(&self, method: &str, params: Option<Value>) -> RpcResult<R> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: Uuid::new_v4(),
            method,
            params,
        };

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            let fut = self.http.post(endpoint.clone()).json(&request).send();
            let response = match timeout(self.timeout_duration, fut).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                    metrics::record_rpc_failure(method);
                    continue;
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                    metrics::record_rpc_failure(method);
                    continue;
                }
            };

            if !response.status().is_success() {
                tracing::warn!(
                    endpoint_idx = i,
                    method,
                    status = %response.status(),
                    "RPC endpoint returned non-success status"
                );
                metrics::record_rpc_failure(method);
                continue;
            }

            let body: JsonRpcResponse<R> = response
                .json()
                .await
                .map_err(|e| RpcError::Decode(e.to_string()))?;

            if let Some(err) = body.error {
                return Err(RpcError::Call {
                    code: err.code,
                    message: err.message,
                });
            }
            return body
                .result
                .ok_or_else(|| RpcError::Decode("response carried neither result nor error".to_string()));
        }

        Err(RpcError::Transport(format!(
            "All RPC endpoints failed for '{}'",
            method
        )))
    }

    /// Query network health.
    pub async fn get_health(&self) -> RpcResult<HealthResponse> {
        self.call("getHealth", None).await
    }

    /// Fetch an account entry by address.
    pub async fn get_account(&self, account_id: &str) -> RpcResult<AccountEntry> {
        self.call(
            "getAccount",
            Some(serde_json::json!({ "address": account_id })),
        )
        .await
    }

    /// Dry-run a transaction against current network state.
    pub async fn simulate_transaction(&self, envelope_b64: &str) -> RpcResult<SimulateResponse> {
        self.call(
            "simulateTransaction",
            Some(serde_json::json!({ "transaction": envelope_b64 })),
        )
        .await
    }

    /// Submit a signed transaction.
    pub async fn send_transaction(&self, envelope_b64: &str) -> RpcResult<SendResponse> {
        self.call(
            "sendTransaction",
            Some(serde_json::json!({ "transaction": envelope_b64 })),
        )
        .await
    }

    /// Fetch the inclusion status of a transaction by hash.
    pub async fn get_transaction(&self, hash: &str) -> RpcResult<GetTransactionResponse> {
        self.call("getTransaction", Some(serde_json::json!({ "hash": hash })))
            .await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoints", &self.endpoints.len())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
