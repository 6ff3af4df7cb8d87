//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Execution network endpoint settings.
    pub network: NetworkConfig,

    /// Campaign contract identifiers.
    pub contract: ContractConfig,

    /// Wallet agent settings.
    pub wallet: WalletConfig,

    /// Poll intervals and deadlines.
    pub polling: PollingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Execution network endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Primary JSON-RPC endpoint.
    pub rpc_url: String,

    /// Fallback endpoints, tried in order when the primary fails.
    pub failover_urls: Vec<String>,

    /// Network passphrase used for signing and transaction hashing.
    pub network_passphrase: String,

    /// Per-request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://soroban-testnet.stellar.org".to_string(),
            failover_urls: Vec::new(),
            network_passphrase: "Test SDF Network ; September 2015".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Campaign contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed crowdfunding contract ID.
    pub contract_id: String,

    /// Token contract (native asset wrapper) the campaign collects.
    pub token_address: String,

    /// Target amount shown when the contract return value cannot be decoded.
    pub fallback_target: f64,

    /// Block explorer base URL for rendering transaction links.
    pub explorer_url: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            contract_id: "CBL7JXM2XHCHYYQEF2QKB4RS2O24CWXZ454Y7FRIXENVHQJIM4DUFZRT".to_string(),
            token_address: "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC".to_string(),
            fallback_target: 10_000.0,
            explorer_url: "https://stellar.expert/explorer/testnet".to_string(),
        }
    }
}

/// Wallet agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Local wallet agent endpoint.
    pub agent_url: String,

    /// Delay before the silent reconnect attempt on startup, in milliseconds.
    pub reconnect_delay_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            agent_url: "http://127.0.0.1:8315".to_string(),
            reconnect_delay_ms: 500,
        }
    }
}

/// Poll intervals and deadlines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Campaign status refresh interval in watch mode, in seconds.
    pub status_interval_secs: u64,

    /// Interval between transaction-status fetches while awaiting inclusion,
    /// in milliseconds.
    pub confirmation_interval_ms: u64,

    /// Wall-clock bound on the whole confirmation wait, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Grace period after a confirmed donation before re-reading campaign
    /// state, in seconds.
    pub post_donation_grace_secs: u64,

    /// Assumed ledger close time used for the remaining-time estimate,
    /// in seconds. An approximation, not a protocol guarantee.
    pub ledger_close_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_secs: 10,
            confirmation_interval_ms: 1_000,
            confirmation_timeout_secs: 60,
            post_donation_grace_secs: 3,
            ledger_close_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exporter (useful in watch mode).
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9095".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.network.rpc_timeout_secs, 10);
        assert_eq!(config.polling.status_interval_secs, 10);
        assert_eq!(config.polling.confirmation_interval_ms, 1_000);
        assert_eq!(config.polling.post_donation_grace_secs, 3);
        assert_eq!(config.contract.fallback_target, 10_000.0);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [network]
            rpc_url = "http://localhost:8000"

            [polling]
            status_interval_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.network.rpc_url, "http://localhost:8000");
        assert_eq!(config.network.rpc_timeout_secs, 10);
        assert_eq!(config.polling.status_interval_secs, 2);
        assert_eq!(config.polling.ledger_close_secs, 5);
    }
}
