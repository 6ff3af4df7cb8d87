//! Transaction envelope model and wire codec.
//!
//! The network's exact binary envelope encoding is upstream property; on the
//! wire this client carries envelopes as base64 over canonical JSON. Every
//! layer except this module treats an encoded envelope as an opaque string.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::rpc::types::SimulateResponse;

/// Base units per whole token (7 decimal places).
pub const STROOPS_PER_UNIT: i128 = 10_000_000;

/// Fixed fee attached to every transaction, in base units.
pub const BASE_FEE: u32 = 100_000;

/// Validity window for read-only simulated calls, in seconds.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Validity window for submitted transactions, in seconds.
pub const SUBMIT_TIMEOUT_SECS: u64 = 300;

/// Unfunded placeholder source for read-only simulations. Never submitted,
/// so it needs no balance and no signature.
pub const SIMULATION_SOURCE: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// Errors from the envelope codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("envelope encode failed: {0}")]
    Encode(String),

    #[error("envelope decode failed: {0}")]
    Decode(String),
}

/// Convert whole tokens to base units, truncating toward zero.
pub fn xlm_to_stroops(amount: f64) -> i128 {
    (amount * STROOPS_PER_UNIT as f64).trunc() as i128
}

/// Convert base units to whole tokens for display.
pub fn stroops_to_xlm(stroops: i128) -> f64 {
    stroops as f64 / STROOPS_PER_UNIT as f64
}

/// A typed argument to a contract invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v", rename_all = "snake_case")]
pub enum ContractValue {
    I128(i128),
    U32(u32),
    Bool(bool),
    Address(String),
    Symbol(String),
}

/// One invoke-contract operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub contract_id: String,
    pub function: String,
    pub args: Vec<ContractValue>,
}

/// A transaction envelope: one invocation plus its frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub source_account: String,
    pub sequence: i64,
    /// Fee in base units.
    pub fee: u32,
    /// Validity window in seconds.
    pub time_bound_secs: u64,
    pub operation: Invocation,

    /// Simulation-derived resource footprint, opaque pass-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_fee: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<String>,
}

impl TransactionEnvelope {
    /// Build a read-only call from the placeholder account. Only ever
    /// simulated, never submitted.
    pub fn read_call(contract_id: &str, function: &str, args: Vec<ContractValue>) -> Self {
        Self {
            source_account: SIMULATION_SOURCE.to_string(),
            sequence: 0,
            fee: BASE_FEE,
            time_bound_secs: READ_TIMEOUT_SECS,
            operation: Invocation {
                contract_id: contract_id.to_string(),
                function: function.to_string(),
                args,
            },
            transaction_data: None,
            resource_fee: None,
            signatures: Vec::new(),
        }
    }

    /// Build an unsigned deposit invocation for the given contributor.
    pub fn deposit(
        contract_id: &str,
        contributor: &str,
        sequence: i64,
        amount_stroops: i128,
    ) -> Self {
        Self {
            source_account: contributor.to_string(),
            sequence,
            fee: BASE_FEE,
            time_bound_secs: SUBMIT_TIMEOUT_SECS,
            operation: Invocation {
                contract_id: contract_id.to_string(),
                function: "deposit".to_string(),
                args: vec![
                    ContractValue::Address(contributor.to_string()),
                    ContractValue::I128(amount_stroops),
                ],
            },
            transaction_data: None,
            resource_fee: None,
            signatures: Vec::new(),
        }
    }

    /// Merge simulation-derived footprint data into the envelope.
    pub fn assemble(mut self, simulation: &SimulateResponse) -> Self {
        self.transaction_data = simulation.transaction_data.clone();
        self.resource_fee = simulation.min_resource_fee.clone();
        self
    }

    /// Encode for transport.
    pub fn to_base64(&self) -> Result<String, CodecError> {
        let bytes = serde_json::to_vec(self).map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(BASE64.encode(bytes))
    }

    /// Decode from transport.
    pub fn from_base64(encoded: &str) -> Result<Self, CodecError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    /// Transaction hash: SHA-256 over the network id and the unsigned
    /// payload, hex-encoded. Signatures do not participate.
    pub fn hash(&self, network_passphrase: &str) -> Result<String, CodecError> {
        let mut unsigned = self.clone();
        unsigned.signatures.clear();
        let payload =
            serde_json::to_vec(&unsigned).map_err(|e| CodecError::Encode(e.to_string()))?;

        let network_id = Sha256::digest(network_passphrase.as_bytes());
        let mut hasher = Sha256::new();
        hasher.update(network_id);
        hasher.update(&payload);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Decode a simulated call's return value.
pub fn decode_return<T: DeserializeOwned>(encoded: &str) -> Result<T, CodecError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode a return value the way the network would carry it.
pub fn encode_return<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let bytes = serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroop_conversion_truncates() {
        assert_eq!(xlm_to_stroops(100.0), 1_000_000_000);
        assert_eq!(xlm_to_stroops(0.1234567), 1_234_567);
        assert_eq!(xlm_to_stroops(0.12345678), 1_234_567);
        assert_eq!(xlm_to_stroops(0.0), 0);
    }

    #[test]
    fn test_stroop_conversion_matches_floor_for_positive_amounts() {
        for amount in [0.0000001, 1.5, 99.9999999, 100.0, 12_345.6789] {
            assert_eq!(
                xlm_to_stroops(amount),
                (amount * 10_000_000.0).floor() as i128,
            );
        }
    }

    #[test]
    fn test_display_conversion() {
        assert_eq!(stroops_to_xlm(25_000_000_000), 2_500.0);
        assert_eq!(stroops_to_xlm(1), 0.0000001);
    }

    #[test]
    fn test_deposit_envelope_shape() {
        let envelope = TransactionEnvelope::deposit("CCONTRACT", "GCONTRIB", 42, 1_000_000_000);
        assert_eq!(envelope.source_account, "GCONTRIB");
        assert_eq!(envelope.fee, BASE_FEE);
        assert_eq!(envelope.time_bound_secs, SUBMIT_TIMEOUT_SECS);
        assert_eq!(envelope.operation.function, "deposit");
        assert_eq!(
            envelope.operation.args,
            vec![
                ContractValue::Address("GCONTRIB".to_string()),
                ContractValue::I128(1_000_000_000),
            ]
        );
    }

    #[test]
    fn test_read_call_uses_placeholder_source() {
        let envelope = TransactionEnvelope::read_call("CCONTRACT", "get_status", Vec::new());
        assert_eq!(envelope.source_account, SIMULATION_SOURCE);
        assert_eq!(envelope.sequence, 0);
        assert_eq!(envelope.time_bound_secs, READ_TIMEOUT_SECS);
        assert!(envelope.signatures.is_empty());
    }

    #[test]
    fn test_codec_round_trip() {
        let envelope = TransactionEnvelope::deposit("CCONTRACT", "GCONTRIB", 7, 5_000_000);
        let decoded = TransactionEnvelope::from_base64(&envelope.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TransactionEnvelope::from_base64("!!!not-base64!!!").is_err());
        let not_an_envelope = BASE64.encode(b"{\"answer\": 42}");
        assert!(TransactionEnvelope::from_base64(&not_an_envelope).is_err());
    }

    #[test]
    fn test_assemble_merges_footprint() {
        let simulation = SimulateResponse {
            transaction_data: Some("FOOTPRINT".to_string()),
            min_resource_fee: Some("557".to_string()),
            ..Default::default()
        };
        let envelope = TransactionEnvelope::deposit("C", "G", 1, 10).assemble(&simulation);
        assert_eq!(envelope.transaction_data.as_deref(), Some("FOOTPRINT"));
        assert_eq!(envelope.resource_fee.as_deref(), Some("557"));
    }

    #[test]
    fn test_hash_ignores_signatures_and_binds_network() {
        let unsigned = TransactionEnvelope::deposit("C", "G", 1, 10);
        let mut signed = unsigned.clone();
        signed.signatures.push("SIG".to_string());

        let passphrase = "Test SDF Network ; September 2015";
        assert_eq!(
            unsigned.hash(passphrase).unwrap(),
            signed.hash(passphrase).unwrap()
        );
        assert_ne!(
            unsigned.hash(passphrase).unwrap(),
            unsigned.hash("Public Global Stellar Network ; September 2015").unwrap()
        );
    }

    #[test]
    fn test_return_value_round_trip() {
        let encoded = encode_return(&42_i128).unwrap();
        let decoded: i128 = decode_return(&encoded).unwrap();
        assert_eq!(decoded, 42);
    }
}
