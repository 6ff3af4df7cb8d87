//! RPC wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// No configured endpoint produced a response.
    #[error("RPC error: {0}")]
    Transport(String),

    /// The server answered with a JSON-RPC error object.
    #[error("RPC call failed ({code}): {message}")]
    Call { code: i64, message: String },

    /// The response body did not match the expected shape.
    #[error("RPC decode error: {0}")]
    Decode(String),

    /// Endpoint URL could not be parsed.
    #[error("Invalid RPC URL '{0}'")]
    InvalidUrl(String),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Network health report.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub latest_ledger: u32,
}

/// On-ledger account entry. Only the sequence number is consumed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub account_id: String,
    /// Sequence number, 64-bit carried as a string on the wire.
    pub sequence: String,
}

impl AccountEntry {
    pub fn sequence_number(&self) -> Result<i64, RpcError> {
        self.sequence
            .parse()
            .map_err(|_| RpcError::Decode(format!("bad account sequence '{}'", self.sequence)))
    }
}

/// One host-function result from a simulated transaction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateHostResult {
    /// Encoded return value.
    pub xdr: String,
    #[serde(default)]
    pub auth: Vec<String>,
}

/// Response to a transaction simulation.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    /// Present when the dry-run execution was rejected.
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub results: Vec<SimulateHostResult>,

    /// Simulation-derived resource footprint, opaque to the caller.
    #[serde(default)]
    pub transaction_data: Option<String>,

    #[serde(default)]
    pub min_resource_fee: Option<String>,

    #[serde(default)]
    pub latest_ledger: Option<u32>,
}

impl SimulateResponse {
    /// A simulation succeeded when it carries no error and produced a result.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.results.is_empty()
    }

    /// The encoded return value of the first (only) host function.
    pub fn return_value(&self) -> Option<&str> {
        self.results.first().map(|r| r.xdr.as_str())
    }
}

/// Disposition of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

/// Response to a transaction submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub status: SendStatus,
    pub hash: String,
    #[serde(default)]
    pub error_result: Option<String>,
    #[serde(default)]
    pub latest_ledger: Option<u32>,
}

/// Inclusion status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    NotFound,
    Success,
    Failed,
}

/// Response to a transaction-status fetch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: TransactionStatus,
    #[serde(default)]
    pub ledger: Option<u32>,
    #[serde(default)]
    pub result_xdr: Option<String>,
}
