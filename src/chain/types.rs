//! Chain-facing types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::envelope::{stroops_to_xlm, CodecError};
use crate::rpc::types::RpcError;
use crate::wallet::adapter::WalletError;

/// Campaign state as returned by the contract, in fixed-point base units.
///
/// Field names follow the contract's status record. The two flags are
/// computed by the contract against its own ledger view; they are never
/// derived client-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(default)]
    pub total_raised: i128,
    #[serde(default)]
    pub target_amount: i128,
    #[serde(default)]
    pub deadline: u32,
    #[serde(default)]
    pub deadline_passed: bool,
    #[serde(default)]
    pub target_reached: bool,
    #[serde(default)]
    pub is_finalized: bool,
}

/// Campaign state in display units (whole tokens).
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignStatus {
    pub total_raised: f64,
    pub target_amount: f64,
    /// Deadline as a ledger height.
    pub deadline: u32,
    pub deadline_passed: bool,
    pub target_reached: bool,
    pub is_finalized: bool,
}

impl CampaignStatus {
    /// The documented default served when the contract cannot be read.
    pub fn fallback(fallback_target: f64) -> Self {
        Self {
            total_raised: 0.0,
            target_amount: fallback_target,
            deadline: 0,
            deadline_passed: false,
            target_reached: false,
            is_finalized: false,
        }
    }

    /// Convert a contract record to display units.
    ///
    /// A zero target is replaced by the configured fallback, matching the
    /// contract's uninitialized-state reads.
    pub fn from_record(record: &StatusRecord, fallback_target: f64) -> Self {
        let target_amount = if record.target_amount == 0 {
            fallback_target
        } else {
            stroops_to_xlm(record.target_amount)
        };

        Self {
            total_raised: stroops_to_xlm(record.total_raised),
            target_amount,
            deadline: record.deadline,
            deadline_passed: record.deadline_passed,
            target_reached: record.target_reached,
            is_finalized: record.is_finalized,
        }
    }

    /// Funding progress in percent, clamped to [0, 100].
    pub fn percent_funded(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.total_raised / self.target_amount * 100.0).clamp(0.0, 100.0)
    }
}

/// Outcome of a confirmed donation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Transaction hash, as reported by the network.
    pub hash: String,
    /// Ledger the transaction was included in, when reported.
    pub ledger: Option<u32>,
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC transport or call failure.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The dry-run execution rejected the transaction.
    #[error("Transaction simulation failed: {0}")]
    SimulationFailed(String),

    /// The wallet failed or refused to sign.
    #[error("Signing failed: {0}")]
    Signing(#[from] WalletError),

    /// The network refused the submission outright.
    #[error("Transaction submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction was included but did not execute successfully.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The transaction was not observed within the confirmation window.
    #[error("Transaction not confirmed within {0} seconds")]
    ConfirmationTimeout(u64),

    /// The confirmation wait was cancelled by shutdown.
    #[error("Confirmation wait cancelled")]
    Cancelled,

    /// An envelope or return value failed to encode or decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
