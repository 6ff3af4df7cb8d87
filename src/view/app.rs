//! Application flows: watch loop, connect, donate.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::interval;

use crate::chain::service::ChainService;
use crate::chain::types::{ChainError, DepositReceipt};
use crate::lifecycle::Shutdown;
use crate::view::render;
use crate::wallet::adapter::WalletAdapter;
use crate::wallet::session::WalletSession;

/// Errors surfaced by the application flows.
#[derive(Debug, Error)]
pub enum AppError {
    /// Wallet connection failed; carries the user-facing message.
    #[error("{0}")]
    Wallet(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Application driver tying the chain service and wallet session together.
pub struct App<A: WalletAdapter> {
    chain: ChainService,
    session: WalletSession<A>,
    shutdown: Arc<Shutdown>,
    reconnect_delay: Duration,
}

impl<A: WalletAdapter> App<A> {
    pub fn new(
        chain: ChainService,
        session: WalletSession<A>,
        shutdown: Arc<Shutdown>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            chain,
            session,
            shutdown,
            reconnect_delay,
        }
    }

    pub fn session(&self) -> &WalletSession<A> {
        &self.session
    }

    /// Fetch campaign status and ledger height concurrently and render both.
    pub async fn refresh_once(&self) {
        let (status, ledger) = tokio::join!(self.chain.campaign_status(), self.chain.current_ledger());

        print!(
            "{}",
            render::render_status(&status, ledger, self.chain.polling().ledger_close_secs)
        );
        print!(
            "{}",
            render::render_connection(&self.session.connection(), self.session.last_error().as_deref())
        );
    }

    /// Poll and render on a fixed interval until shutdown.
    ///
    /// The first render happens immediately. A tick whose fetch outlasts the
    /// interval simply overlaps the next one; reads are idempotent, so
    /// overlapping refreshes are safe and are not deduplicated.
    pub async fn watch(&self) {
        self.session.try_reconnect(self.reconnect_delay).await;
        self.refresh_once().await;

        let mut ticker = interval(Duration::from_secs(
            self.chain.polling().status_interval_secs,
        ));
        ticker.tick().await; // consume the immediate first tick
        let mut stop = self.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    println!();
                    self.refresh_once().await;
                }
                _ = stop.recv() => {
                    tracing::info!("Watch loop stopped");
                    return;
                }
            }
        }
    }

    /// Connect the wallet, prompting if needed, and render the outcome.
    pub async fn connect(&self) -> Result<(), AppError> {
        self.session.try_reconnect(self.reconnect_delay).await;
        if self.session.connection().connected {
            print!("{}", render::render_connection(&self.session.connection(), None));
            return Ok(());
        }

        match self.session.connect().await {
            Ok(connection) => {
                print!("{}", render::render_connection(&connection, None));
                Ok(())
            }
            Err(message) => {
                println!("Connection failed: {}", message);
                Err(AppError::Wallet(message))
            }
        }
    }

    /// Run the donation flow: ensure a connection, submit, wait for
    /// inclusion, then re-render after a propagation grace period.
    ///
    /// Failures are rendered here as well as returned; a failed donation
    /// must be visible to the user.
    pub async fn donate(&self, amount: f64) -> Result<DepositReceipt, AppError> {
        if !self.session.connection().connected {
            self.session.try_reconnect(self.reconnect_delay).await;
        }
        if !self.session.connection().connected {
            if let Err(message) = self.session.connect().await {
                println!("Donation failed: {}", message);
                return Err(AppError::Wallet(message));
            }
        }

        let connection = self.session.connection();
        let contributor = connection
            .public_key
            .as_deref()
            .ok_or_else(|| AppError::Wallet("No public key available.".to_string()))?;

        println!(
            "Donating {:.2} XLM from {}; approve the transaction in your wallet",
            amount,
            render::abbreviate_key(contributor)
        );

        match self
            .chain
            .deposit(self.session.adapter(), contributor, amount, &self.shutdown)
            .await
        {
            Ok(receipt) => {
                println!("Donation confirmed.");
                println!("  hash: {}", receipt.hash);
                if let Some(ledger) = receipt.ledger {
                    println!("  ledger: {}", ledger);
                }
                println!("  {}", self.chain.explorer_tx_url(&receipt.hash));

                // Give ledger state a moment to propagate before re-reading.
                tokio::time::sleep(Duration::from_secs(
                    self.chain.polling().post_donation_grace_secs,
                ))
                .await;
                println!();
                self.refresh_once().await;

                Ok(receipt)
            }
            Err(e) => {
                println!("Donation failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Render the latest ledger height.
    pub async fn show_ledger(&self) {
        let ledger = self.chain.current_ledger().await;
        println!("Latest ledger: {}", ledger);
    }

    /// Render how much an account has contributed so far.
    pub async fn show_contributor_deposit(&self, account: &str) {
        let amount = self.chain.contributor_deposit(account).await;
        println!(
            "{} has contributed {:.2} XLM",
            render::abbreviate_key(account),
            amount
        );
    }
}
