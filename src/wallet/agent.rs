//! HTTP bridge to the local wallet agent.

use std::time::Duration;

use crate::config::schema::WalletConfig;
use crate::wallet::adapter::{
    decode_flag, decode_sign, decode_text, WalletAdapter, WalletError, WireReply,
};

/// How long to wait on calls that never involve user interaction.
const QUICK_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default `WalletAdapter` over HTTP to the local wallet agent.
///
/// Permission and signing requests carry no timeout: they surface a prompt in
/// the agent's own UI and stay open until the user acts.
#[derive(Clone)]
pub struct HttpWalletAgent {
    http: reqwest::Client,
    base: url::Url,
}

impl HttpWalletAgent {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        let base = config
            .agent_url
            .parse()
            .map_err(|_| WalletError::Unreachable(format!("invalid agent URL '{}'", config.agent_url)))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn route(&self, path: &str) -> Result<url::Url, WalletError> {
        self.base
            .join(path)
            .map_err(|e| WalletError::Unreachable(e.to_string()))
    }

    async fn get(&self, path: &str, bounded: bool) -> Result<WireReply, WalletError> {
        let mut request = self.http.get(self.route(path)?);
        if bounded {
            request = request.timeout(QUICK_CALL_TIMEOUT);
        }
        Self::read_reply(request.send().await).await
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<WireReply, WalletError> {
        let request = self.http.post(self.route(path)?).json(&body);
        Self::read_reply(request.send().await).await
    }

    async fn read_reply(
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<WireReply, WalletError> {
        let response = result.map_err(|e| WalletError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WalletError::Agent(format!(
                "agent returned status {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| WalletError::Malformed(e.to_string()))
    }
}

impl WalletAdapter for HttpWalletAgent {
    async fn is_installed(&self) -> Result<bool, WalletError> {
        // An unreachable agent is indistinguishable from an absent one.
        match self.get("connected", true).await {
            Ok(reply) => decode_flag(reply, "isConnected"),
            Err(WalletError::Unreachable(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn is_allowed(&self) -> Result<bool, WalletError> {
        decode_flag(self.get("allowed", true).await?, "isAllowed")
    }

    async fn request_allow(&self) -> Result<bool, WalletError> {
        // May prompt; unbounded.
        decode_flag(
            self.post("allowed", serde_json::json!({})).await?,
            "isAllowed",
        )
    }

    async fn public_key(&self) -> Result<String, WalletError> {
        decode_text(self.get("public-key", true).await?, "publicKey")
    }

    async fn network(&self) -> Result<String, WalletError> {
        decode_text(self.get("network", true).await?, "network")
    }

    async fn sign(
        &self,
        envelope_b64: &str,
        network_passphrase: &str,
    ) -> Result<String, WalletError> {
        // May prompt; unbounded.
        let reply = self
            .post(
                "sign",
                serde_json::json!({
                    "transaction": envelope_b64,
                    "networkPassphrase": network_passphrase,
                }),
            )
            .await?;
        decode_sign(reply)
    }
}

impl std::fmt::Debug for HttpWalletAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpWalletAgent")
            .field("base", &self.base.as_str())
            .finish()
    }
}
