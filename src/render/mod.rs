//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! (url, query)
//!     → provider.rs (template + renderer for the configured mode)
//!     → renderer.render(url, query) → RenderResult {html, head?, data?}
//!     → document.rs (strip stale data script, fill placeholders)
//!     → final HTML document
//! ```

pub mod document;
pub mod provider;

pub use document::{inject, render_document, HEAD_PLACEHOLDER, HTML_PLACEHOLDER};
pub use provider::{
    provider_for, LiveRenderProvider, Render, RenderError, RenderProvider, RenderResult,
    StaticRenderProvider,
};
