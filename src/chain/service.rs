//! Chain access service: campaign reads and the donation workflow.

use std::time::Duration;

use tokio::time::{interval, timeout};

use crate::chain::envelope::{
    self, decode_return, xlm_to_stroops, ContractValue, TransactionEnvelope,
};
use crate::chain::types::{CampaignStatus, ChainError, ChainResult, DepositReceipt, StatusRecord};
use crate::config::schema::{ClientConfig, ContractConfig, PollingConfig};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::rpc::client::RpcClient;
use crate::rpc::types::{RpcError, SendStatus, SimulateResponse, TransactionStatus};
use crate::wallet::adapter::WalletAdapter;

/// Client-side access to the crowdfunding contract.
#[derive(Debug, Clone)]
pub struct ChainService {
    rpc: RpcClient,
    contract: ContractConfig,
    polling: PollingConfig,
    network_passphrase: String,
}

impl ChainService {
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self {
            rpc: RpcClient::new(&config.network)?,
            contract: config.contract.clone(),
            polling: config.polling.clone(),
            network_passphrase: config.network.network_passphrase.clone(),
        })
    }

    /// Read the campaign status.
    ///
    /// Never raises: any failure along the way (transport, simulation
    /// rejection, decode) is served as the documented default so rendering
    /// is never blocked by a read failure.
    pub async fn campaign_status(&self) -> CampaignStatus {
        match self.try_campaign_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Campaign status read failed, serving defaults");
                metrics::record_status_fallback("campaign_status");
                CampaignStatus::fallback(self.contract.fallback_target)
            }
        }
    }

    async fn try_campaign_status(&self) -> ChainResult<CampaignStatus> {
        let envelope =
            TransactionEnvelope::read_call(&self.contract.contract_id, "get_status", Vec::new());
        let simulation = self
            .rpc
            .simulate_transaction(&envelope.to_base64()?)
            .await?;

        let retval = simulation_return(&simulation)?;
        let record: StatusRecord = decode_return(retval)?;

        Ok(CampaignStatus::from_record(
            &record,
            self.contract.fallback_target,
        ))
    }

    /// Latest ledger height, or 0 on any failure. Never raises.
    pub async fn current_ledger(&self) -> u32 {
        match self.rpc.get_health().await {
            Ok(health) => health.latest_ledger,
            Err(e) => {
                tracing::warn!(error = %e, "Ledger height read failed, serving 0");
                metrics::record_status_fallback("current_ledger");
                0
            }
        }
    }

    /// Amount a contributor has deposited so far, in display units.
    /// 0 on any failure. Never raises.
    pub async fn contributor_deposit(&self, account: &str) -> f64 {
        match self.try_contributor_deposit(account).await {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(account, error = %e, "Deposit read failed, serving 0");
                metrics::record_status_fallback("contributor_deposit");
                0.0
            }
        }
    }

    async fn try_contributor_deposit(&self, account: &str) -> ChainResult<f64> {
        let envelope = TransactionEnvelope::read_call(
            &self.contract.contract_id,
            "get_deposit",
            vec![ContractValue::Address(account.to_string())],
        );
        let simulation = self
            .rpc
            .simulate_transaction(&envelope.to_base64()?)
            .await?;

        let retval = simulation_return(&simulation)?;
        let stroops: i128 = decode_return(retval)?;
        Ok(envelope::stroops_to_xlm(stroops))
    }

    /// Submit a donation and wait for its inclusion.
    ///
    /// Sequence: fetch account → build → simulate → assemble → sign →
    /// submit → poll. Every failure propagates; no step is retried. A caller
    /// that wants to retry re-invokes the whole sequence, producing a new
    /// transaction.
    pub async fn deposit<A: WalletAdapter>(
        &self,
        wallet: &A,
        contributor: &str,
        amount: f64,
        shutdown: &Shutdown,
    ) -> ChainResult<DepositReceipt> {
        let result = self
            .deposit_inner(wallet, contributor, amount, shutdown)
            .await;
        metrics::record_donation(match &result {
            Ok(_) => "confirmed",
            Err(e) => outcome_label(e),
        });
        result
    }

    async fn deposit_inner<A: WalletAdapter>(
        &self,
        wallet: &A,
        contributor: &str,
        amount: f64,
        shutdown: &Shutdown,
    ) -> ChainResult<DepositReceipt> {
        let account = self.rpc.get_account(contributor).await?;
        let sequence = account
            .sequence_number()
            .map_err(ChainError::Rpc)?
            .saturating_add(1);

        let stroops = xlm_to_stroops(amount);
        let envelope = TransactionEnvelope::deposit(
            &self.contract.contract_id,
            contributor,
            sequence,
            stroops,
        );
        tracing::debug!(contributor, stroops = %stroops, "Built deposit transaction");

        let simulation = self
            .rpc
            .simulate_transaction(&envelope.to_base64()?)
            .await?;
        simulation_return(&simulation)?;

        let prepared = envelope.assemble(&simulation);
        let signed = wallet
            .sign(&prepared.to_base64()?, &self.network_passphrase)
            .await?;

        let send = self.rpc.send_transaction(&signed).await?;
        if send.status == SendStatus::Error {
            return Err(ChainError::SubmissionRejected(
                send.error_result
                    .unwrap_or_else(|| "submission returned ERROR".to_string()),
            ));
        }

        tracing::info!(hash = %send.hash, "Transaction submitted, awaiting inclusion");
        self.wait_for_confirmation(&send.hash, shutdown).await
    }

    /// Poll transaction status until it leaves NOT_FOUND.
    ///
    /// Bounded by the configured confirmation timeout, and aborts between
    /// polls when the shutdown signal fires.
    async fn wait_for_confirmation(
        &self,
        hash: &str,
        shutdown: &Shutdown,
    ) -> ChainResult<DepositReceipt> {
        let timeout_secs = self.polling.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(self.polling.confirmation_interval_ms);
        let mut cancel = shutdown.subscribe();

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = cancel.recv() => return Err(ChainError::Cancelled),
                }

                let response = self.rpc.get_transaction(hash).await?;
                match response.status {
                    TransactionStatus::NotFound => {
                        tracing::debug!(hash, "Transaction pending");
                    }
                    TransactionStatus::Success => {
                        return Ok(DepositReceipt {
                            hash: hash.to_string(),
                            ledger: response.ledger,
                        })
                    }
                    TransactionStatus::Failed => {
                        return Err(ChainError::TransactionFailed(
                            response
                                .result_xdr
                                .unwrap_or_else(|| "execution failed".to_string()),
                        ))
                    }
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ChainError::ConfirmationTimeout(timeout_secs)),
        }
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.contract.explorer_url, hash)
    }
}

/// Extract the return value of a successful simulation, or its failure.
fn simulation_return(simulation: &SimulateResponse) -> ChainResult<&str> {
    if let Some(error) = &simulation.error {
        return Err(ChainError::SimulationFailed(error.clone()));
    }
    simulation
        .return_value()
        .ok_or_else(|| ChainError::SimulationFailed("no result returned".to_string()))
}

fn outcome_label(error: &ChainError) -> &'static str {
    match error {
        ChainError::Rpc(_) => "rpc_error",
        ChainError::SimulationFailed(_) => "simulation_failed",
        ChainError::Signing(_) => "signing_failed",
        ChainError::SubmissionRejected(_) => "submission_rejected",
        ChainError::TransactionFailed(_) => "failed",
        ChainError::ConfirmationTimeout(_) => "timeout",
        ChainError::Cancelled => "cancelled",
        ChainError::Codec(_) => "codec_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(
            outcome_label(&ChainError::SimulationFailed("x".to_string())),
            "simulation_failed"
        );
        assert_eq!(outcome_label(&ChainError::ConfirmationTimeout(60)), "timeout");
        assert_eq!(outcome_label(&ChainError::Cancelled), "cancelled");
    }

    #[test]
    fn test_explorer_url() {
        let service = ChainService::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            service.explorer_tx_url("abc123"),
            "https://stellar.expert/explorer/testnet/tx/abc123"
        );
    }
}
