//! Wallet connection state holder.
//!
//! Owns the connection snapshot for the lifetime of the process. The view
//! layer only reads it; all mutation happens through `connect`,
//! `try_reconnect`, and `disconnect`.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::{ArcSwap, ArcSwapOption};

use crate::wallet::adapter::{WalletAdapter, WalletError};

/// Snapshot of the wallet connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletConnection {
    pub connected: bool,
    pub public_key: Option<String>,
    pub network: Option<String>,
}

/// Process-wide holder of wallet-connection state.
pub struct WalletSession<A: WalletAdapter> {
    adapter: A,
    connection: ArcSwap<WalletConnection>,
    last_error: ArcSwapOption<String>,
}

impl<A: WalletAdapter> WalletSession<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            connection: ArcSwap::from_pointee(WalletConnection::default()),
            last_error: ArcSwapOption::empty(),
        }
    }

    /// Current connection snapshot.
    pub fn connection(&self) -> Arc<WalletConnection> {
        self.connection.load_full()
    }

    /// Human-readable message from the most recent failed connect, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.load_full().map(|s| (*s).clone())
    }

    /// Silent reconnect attempt for startup.
    ///
    /// Waits `delay`, then reconnects only if the agent is installed and a
    /// permission grant already exists; never prompts the user. Failures are
    /// logged at debug and leave the connection empty.
    pub async fn try_reconnect(&self, delay: Duration) {
        tokio::time::sleep(delay).await;

        let result = self.silent_reconnect().await;
        match result {
            Ok(true) => {
                let snapshot = self.connection();
                tracing::info!(
                    public_key = snapshot.public_key.as_deref().unwrap_or_default(),
                    "Auto-reconnected to wallet"
                );
            }
            Ok(false) => {}
            Err(e) => tracing::debug!(error = %e, "Auto-reconnect failed"),
        }
    }

    async fn silent_reconnect(&self) -> Result<bool, WalletError> {
        if !self.adapter.is_installed().await? {
            return Ok(false);
        }
        if !self.adapter.is_allowed().await? {
            return Ok(false);
        }

        let public_key = self.adapter.public_key().await?;
        let network = self.network_or_default().await;
        self.store_connected(public_key, network);
        Ok(true)
    }

    /// Connect, prompting for the permission grant when missing.
    ///
    /// On failure the returned message is also retained in `last_error` and
    /// the connection stays cleared. No network RPC traffic is involved.
    pub async fn connect(&self) -> Result<Arc<WalletConnection>, String> {
        self.last_error.store(None);

        match self.prompt_connect().await {
            Ok(connection) => Ok(connection),
            Err(message) => {
                self.connection
                    .store(Arc::new(WalletConnection::default()));
                self.last_error.store(Some(Arc::new(message.clone())));
                Err(message)
            }
        }
    }

    async fn prompt_connect(&self) -> Result<Arc<WalletConnection>, String> {
        let installed = self
            .adapter
            .is_installed()
            .await
            .map_err(|e| format!("Could not reach the wallet agent: {}", e))?;
        if !installed {
            return Err(
                "Wallet is not installed. Install the Freighter extension and its agent, then retry."
                    .to_string(),
            );
        }

        let allowed = match self.adapter.is_allowed().await {
            Ok(allowed) => allowed,
            Err(e) => return Err(format!("Could not check wallet permission: {}", e)),
        };
        if !allowed {
            match self.adapter.request_allow().await {
                Ok(true) => {}
                Ok(false) => return Err("Wallet connection was declined.".to_string()),
                Err(e) => return Err(format!("Wallet connection failed: {}", e)),
            }
        }

        let public_key = self
            .adapter
            .public_key()
            .await
            .map_err(|_| "Could not get public key from wallet.".to_string())?;
        let network = self.network_or_default().await;

        self.store_connected(public_key, network);
        Ok(self.connection())
    }

    /// Clear local connection state. The agent's permission grant persists.
    pub fn disconnect(&self) {
        self.connection.store(Arc::new(WalletConnection::default()));
        self.last_error.store(None);
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    async fn network_or_default(&self) -> String {
        // Older agents omit the network route; assume testnet like they did.
        self.adapter
            .network()
            .await
            .unwrap_or_else(|_| "TESTNET".to_string())
    }

    fn store_connected(&self, public_key: String, network: String) {
        self.connection.store(Arc::new(WalletConnection {
            connected: true,
            public_key: Some(public_key),
            network: Some(network),
        }));
    }
}
