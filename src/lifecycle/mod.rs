//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Live server:
//!     Ctrl+C (signals.rs) → Shutdown::trigger → axum graceful shutdown
//!
//! Static export:
//!     data endpoint bring-up → render loop → Shutdown::trigger → endpoint task joined
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain, close
//! - One Shutdown per server instance, never global

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
