//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl-C / SIGINT → Shutdown::trigger
//!     → watch loop stops at the next tick
//!     → an in-flight confirmation wait aborts with a cancellation error
//! ```

pub mod shutdown;

pub use shutdown::{listen_for_ctrl_c, Shutdown};
