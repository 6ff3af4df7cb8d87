//! Execution network RPC subsystem.
//!
//! # Data Flow
//! ```text
//! Config (endpoint URLs, timeout)
//!     → client.rs (JSON-RPC 2.0 transport with timeouts and failover)
//!     → types.rs (typed request/response shapes)
//! ```
//!
//! Wire schemas beyond the JSON-RPC envelope belong to the upstream network;
//! only the fields this client consumes are modeled.

pub mod client;
pub mod types;

pub use client::RpcClient;
pub use types::{
    AccountEntry, GetTransactionResponse, HealthResponse, RpcError, RpcResult, SendResponse,
    SendStatus, SimulateResponse, TransactionStatus,
};
