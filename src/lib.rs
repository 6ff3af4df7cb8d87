//! StellarPulse crowdfunding client library.

pub mod chain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod rpc;
pub mod view;
pub mod wallet;

pub use chain::ChainService;
pub use config::ClientConfig;
pub use lifecycle::Shutdown;
pub use wallet::WalletSession;
