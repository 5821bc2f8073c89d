//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! ctrl-c (signals.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → polling tasks, config watcher loop, HTTP server stop
//!     → chain connection closed
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
