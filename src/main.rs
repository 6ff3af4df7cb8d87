//! StellarPulse terminal client.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                   CLIENT                      │
//!                 │                                               │
//!   CLI command   │  ┌────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ──────────────┼─▶│  view  │──▶│  chain  │──▶│     rpc     │──┼──▶ execution
//!                 │  │  app   │   │ service │   │  JSON-RPC   │  │    network
//!                 │  └───┬────┘   └────┬────┘   └─────────────┘  │
//!                 │      │             │                          │
//!                 │      ▼             ▼                          │
//!                 │  ┌────────┐   ┌─────────┐                     │
//!                 │  │ wallet │──▶│ wallet  │──────────────────── ┼──▶ wallet
//!                 │  │session │   │ agent   │                     │    agent
//!                 │  └────────┘   └─────────┘                     │
//!                 │                                               │
//!                 │  ┌─────────────────────────────────────────┐  │
//!                 │  │  config · lifecycle · observability     │  │
//!                 │  └─────────────────────────────────────────┘  │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use stellarpulse::chain::ChainService;
use stellarpulse::config::loader;
use stellarpulse::lifecycle::{self, Shutdown};
use stellarpulse::observability::{logging, metrics};
use stellarpulse::view::App;
use stellarpulse::wallet::{HttpWalletAgent, WalletSession};

#[derive(Parser)]
#[command(name = "stellarpulse")]
#[command(about = "Terminal client for the StellarPulse crowdfunding campaign", long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "stellarpulse.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show campaign status once
    Status,
    /// Show the latest ledger height
    Ledger,
    /// Poll and render campaign status until interrupted
    Watch,
    /// Connect the wallet
    Connect,
    /// Donate to the campaign
    Donate {
        /// Amount in whole XLM
        #[arg(long)]
        amount: f64,
    },
    /// Show the amount an account has contributed
    DepositOf {
        /// Account public key
        #[arg(long)]
        account: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();
    let cli = Cli::parse();

    let config = loader::load_config_or_default(&cli.config)?;
    tracing::info!(
        rpc_url = %config.network.rpc_url,
        contract = %config.contract.contract_id,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let chain = ChainService::new(&config)?;
    let session = WalletSession::new(HttpWalletAgent::new(&config.wallet)?);
    let shutdown = Arc::new(Shutdown::new());
    lifecycle::listen_for_ctrl_c(Arc::clone(&shutdown));

    let app = App::new(
        chain,
        session,
        Arc::clone(&shutdown),
        Duration::from_millis(config.wallet.reconnect_delay_ms),
    );

    match cli.command {
        Commands::Status => app.refresh_once().await,
        Commands::Ledger => app.show_ledger().await,
        Commands::Watch => app.watch().await,
        Commands::Connect => {
            if app.connect().await.is_err() {
                std::process::exit(1);
            }
        }
        Commands::Donate { amount } => {
            if amount <= 0.0 {
                eprintln!("Donation amount must be positive");
                std::process::exit(2);
            }
            if app.donate(amount).await.is_err() {
                std::process::exit(1);
            }
        }
        Commands::DepositOf { account } => app.show_contributor_deposit(&account).await,
    }

    Ok(())
}
