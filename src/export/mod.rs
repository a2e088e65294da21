//! Static export subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint.rs   bring up temporary data API on the fixed port
//!     → orchestrator.rs  read template, load renderer + page source
//!     → pages.rs         enumerate PageDescriptors (home, 404, one per product)
//!     → orchestrator.rs  render each page in order via render::document
//!     → writer.rs        write the document, creating directories
//!     → endpoint.rs      close the endpoint (always, success or failure)
//! ```
//!
//! # Design Decisions
//! - Pages render strictly one after another against the one endpoint
//! - Any load/enumerate/render/write failure aborts the whole run
//! - Files written before a failure stay on disk

pub mod endpoint;
pub mod orchestrator;
pub mod pages;
pub mod writer;

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::render::RenderError;
use crate::routing::PatternError;

pub use endpoint::{CatalogEndpoint, EndpointLauncher, RunningEndpoint};
pub use orchestrator::{ExportReport, LoadedApp, RenderLoader, StaticExporter, StorefrontLoader};
pub use pages::{enumerate_pages, PageDescriptor};
pub use writer::write_document;

/// Fatal export errors. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to start data endpoint on {addr}: {source}")]
    BringUp {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid route table: {0}")]
    Routes(#[from] PatternError),

    #[error("failed to create page source: {0}")]
    Source(#[from] CatalogError),

    #[error("failed to enumerate pages: {0}")]
    Enumerate(#[source] CatalogError),

    #[error("product identifier `{0}` cannot be used as a directory name")]
    InvalidIdentifier(String),

    #[error("failed to render `{url}`: {source}")]
    Render {
        url: String,
        #[source]
        source: RenderError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to close data endpoint: {0}")]
    Teardown(String),
}
