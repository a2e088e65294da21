//! Live server-side rendering over HTTP.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (add request ID)
//!     → server.rs  /api/* to the catalog data API
//!                  everything else: provider → render invoker → HTML
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
