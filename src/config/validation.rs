//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, URLs parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use crate::config::schema::ClientConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "network.rpc_url", &config.network.rpc_url);
    for (i, u) in config.network.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("network.failover_urls[{}]", i), u);
    }
    check_url(&mut errors, "wallet.agent_url", &config.wallet.agent_url);

    if config.network.network_passphrase.is_empty() {
        push(&mut errors, "network.network_passphrase", "must not be empty");
    }
    if config.network.rpc_timeout_secs == 0 {
        push(&mut errors, "network.rpc_timeout_secs", "must be greater than zero");
    }
    if config.contract.contract_id.is_empty() {
        push(&mut errors, "contract.contract_id", "must not be empty");
    }
    if config.contract.fallback_target < 0.0 {
        push(&mut errors, "contract.fallback_target", "must not be negative");
    }

    let polling = &config.polling;
    if polling.status_interval_secs == 0 {
        push(&mut errors, "polling.status_interval_secs", "must be greater than zero");
    }
    if polling.confirmation_interval_ms == 0 {
        push(&mut errors, "polling.confirmation_interval_ms", "must be greater than zero");
    }
    if polling.ledger_close_secs == 0 {
        push(&mut errors, "polling.ledger_close_secs", "must be greater than zero");
    }
    if polling.confirmation_timeout_secs.saturating_mul(1_000) < polling.confirmation_interval_ms {
        push(
            &mut errors,
            "polling.confirmation_timeout_secs",
            "must allow at least one confirmation poll",
        );
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        push(&mut errors, "observability.metrics_address", "not a valid socket address");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<url::Url>().is_err() {
        push(errors, field, "not a valid URL");
    }
}

fn push(errors: &mut Vec<ValidationError>, field: &str, message: &str) {
    errors.push(ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ClientConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.network.rpc_url = "not a url".to_string();
        config.contract.contract_id = String::new();
        config.polling.status_interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "network.rpc_url"));
        assert!(errors.iter().any(|e| e.field == "contract.contract_id"));
        assert!(errors.iter().any(|e| e.field == "polling.status_interval_secs"));
    }

    #[test]
    fn test_confirmation_timeout_must_cover_one_poll() {
        let mut config = ClientConfig::default();
        config.polling.confirmation_timeout_secs = 0;
        config.polling.confirmation_interval_ms = 1_000;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.field == "polling.confirmation_timeout_secs"));
    }
}
