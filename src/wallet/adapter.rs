//! Wallet adapter boundary.
//!
//! # Responsibilities
//! - Define the trait the rest of the client signs through
//! - Decode the agent's historical reply shapes into plain `Result`s
//!
//! Agents have shipped two reply conventions over time: bare scalars
//! (`true`, `"GABC…"`) and objects carrying the value under a named key with
//! an optional `error` field. Both are accepted here and nowhere else;
//! downstream code only ever sees the decoded result.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur at the wallet boundary.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The agent process could not be reached.
    #[error("wallet agent unreachable: {0}")]
    Unreachable(String),

    /// The agent reported an error of its own.
    #[error("wallet error: {0}")]
    Agent(String),

    /// The reply matched neither known shape.
    #[error("malformed wallet reply: {0}")]
    Malformed(String),

    /// The user rejected the request or signing failed in the agent.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Signing and connection interface to the user's wallet.
///
/// All operations are asynchronous; `request_allow` and `sign` may suspend
/// for an unbounded time awaiting user interaction in the agent's own UI.
#[allow(async_fn_in_trait)]
pub trait WalletAdapter: Send + Sync {
    /// Whether the wallet agent is present at all.
    async fn is_installed(&self) -> Result<bool, WalletError>;

    /// Whether this client already holds a persisted permission grant.
    async fn is_allowed(&self) -> Result<bool, WalletError>;

    /// Request the permission grant, prompting the user if needed.
    async fn request_allow(&self) -> Result<bool, WalletError>;

    /// The connected account's public key.
    async fn public_key(&self) -> Result<String, WalletError>;

    /// The network the wallet is currently pointed at.
    async fn network(&self) -> Result<String, WalletError>;

    /// Sign a transaction envelope, returning the signed envelope.
    async fn sign(
        &self,
        envelope_b64: &str,
        network_passphrase: &str,
    ) -> Result<String, WalletError>;
}

/// A raw reply from the wallet agent, shape not yet known.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireReply {
    Flag(bool),
    Text(String),
    Object(serde_json::Map<String, Value>),
}

/// Decode a boolean reply carried either bare or under `key`.
pub fn decode_flag(reply: WireReply, key: &str) -> Result<bool, WalletError> {
    match reply {
        WireReply::Flag(b) => Ok(b),
        WireReply::Object(map) => {
            if let Some(message) = error_field(&map) {
                return Err(WalletError::Agent(message));
            }
            map.get(key)
                .and_then(Value::as_bool)
                .ok_or_else(|| WalletError::Malformed(format!("expected boolean '{}'", key)))
        }
        WireReply::Text(s) => Err(WalletError::Malformed(format!(
            "expected boolean, got string '{}'",
            s
        ))),
    }
}

/// Decode a string reply carried either bare or under `key`.
pub fn decode_text(reply: WireReply, key: &str) -> Result<String, WalletError> {
    match reply {
        WireReply::Text(s) => Ok(s),
        WireReply::Object(map) => {
            if let Some(message) = error_field(&map) {
                return Err(WalletError::Agent(message));
            }
            map.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| WalletError::Malformed(format!("expected string '{}'", key)))
        }
        WireReply::Flag(b) => Err(WalletError::Malformed(format!(
            "expected string, got boolean {}",
            b
        ))),
    }
}

/// Decode a sign reply: bare signed envelope, or an object with either a
/// signed envelope or an error message. An error message is terminal with
/// that message; a usable envelope missing entirely is terminal with a
/// generic one.
pub fn decode_sign(reply: WireReply) -> Result<String, WalletError> {
    match reply {
        WireReply::Text(xdr) => Ok(xdr),
        WireReply::Object(map) => {
            if let Some(xdr) = map.get("signedTxXdr").and_then(Value::as_str) {
                return Ok(xdr.to_string());
            }
            if let Some(message) = error_field(&map) {
                return Err(WalletError::Signing(message));
            }
            Err(WalletError::Signing(
                "wallet returned no signed transaction".to_string(),
            ))
        }
        WireReply::Flag(_) => Err(WalletError::Signing(
            "wallet returned no signed transaction".to_string(),
        )),
    }
}

fn error_field(map: &serde_json::Map<String, Value>) -> Option<String> {
    map.get("error").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> WireReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_flag_both_shapes() {
        assert!(decode_flag(reply("true"), "isConnected").unwrap());
        assert!(!decode_flag(reply(r#"{"isConnected": false}"#), "isConnected").unwrap());
    }

    #[test]
    fn test_flag_error_field_wins() {
        let err = decode_flag(reply(r#"{"error": "agent locked"}"#), "isAllowed").unwrap_err();
        assert!(matches!(err, WalletError::Agent(m) if m == "agent locked"));
    }

    #[test]
    fn test_text_both_shapes() {
        assert_eq!(decode_text(reply(r#""GABC""#), "publicKey").unwrap(), "GABC");
        assert_eq!(
            decode_text(reply(r#"{"publicKey": "GABC"}"#), "publicKey").unwrap(),
            "GABC"
        );
    }

    #[test]
    fn test_text_missing_key_is_malformed() {
        let err = decode_text(reply(r#"{"network": "TESTNET"}"#), "publicKey").unwrap_err();
        assert!(matches!(err, WalletError::Malformed(_)));
    }

    #[test]
    fn test_sign_bare_envelope() {
        assert_eq!(decode_sign(reply(r#""AAAAsigned""#)).unwrap(), "AAAAsigned");
    }

    #[test]
    fn test_sign_object_envelope() {
        assert_eq!(
            decode_sign(reply(r#"{"signedTxXdr": "AAAAsigned", "signerAddress": "GABC"}"#))
                .unwrap(),
            "AAAAsigned"
        );
    }

    #[test]
    fn test_sign_error_message_is_terminal() {
        let err = decode_sign(reply(r#"{"error": "User declined access"}"#)).unwrap_err();
        assert!(matches!(err, WalletError::Signing(m) if m == "User declined access"));
    }

    #[test]
    fn test_sign_empty_object_is_generic_failure() {
        let err = decode_sign(reply("{}")).unwrap_err();
        assert!(matches!(err, WalletError::Signing(m) if m.contains("no signed transaction")));
    }
}
