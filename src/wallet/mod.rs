//! Wallet integration subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet agent (external process, user-facing)
//!     → agent.rs (HTTP bridge, tolerant wire decoding)
//!     → adapter.rs (trait boundary + tagged reply decoding)
//!     → session.rs (connection state holder, connect/reconnect/disconnect)
//! ```
//!
//! # Constraints
//! - Agent replies arrive in two historical shapes (bare scalar or object
//!   with optional error); they are decoded exactly once, at this boundary
//! - Signing and permission prompts may block on user interaction for an
//!   unbounded time; no timeout is imposed on those calls

pub mod adapter;
pub mod agent;
pub mod session;

pub use adapter::{WalletAdapter, WalletError};
pub use agent::HttpWalletAgent;
pub use session::{WalletConnection, WalletSession};
