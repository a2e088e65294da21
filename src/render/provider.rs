//! Render capability and render providers.
//!
//! # Responsibilities
//! - Define the render contract: `(url, query) -> {html, head?, data?}`
//! - Supply the HTML template plus a renderer, per run mode
//!
//! # Design Decisions
//! - The renderer is opaque to this crate's core; anything implementing
//!   [`Render`] can be driven by the live server or the export pipeline
//! - The provider is picked once at startup from configuration
//! - Development re-reads the template on every load; production reads it
//!   once and caches it

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::catalog::CatalogError;
use crate::config::schema::{RenderConfig, RenderMode};
use crate::routing::QueryMap;

/// Output of one render call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Body fragment.
    pub html: String,
    /// Head fragment (title, meta).
    #[serde(default)]
    pub head: Option<String>,
    /// Initial data for client hydration.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RenderResult {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Errors surfaced by rendering. Never swallowed by the document invoker.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The HTML template could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer's data source failed.
    #[error("data source error while rendering: {0}")]
    Data(#[from] CatalogError),

    /// The renderer reported a failure.
    #[error("render failed for `{url}`: {message}")]
    Failed { url: String, message: String },
}

/// The render function: produces page fragments for a URL and query.
///
/// Implementations must be deterministic for the same inputs and data.
#[async_trait]
pub trait Render: Send + Sync {
    async fn render(&self, url: &str, query: &QueryMap) -> Result<RenderResult, RenderError>;
}

/// Supplies the template and renderer for one run mode.
#[async_trait]
pub trait RenderProvider: Send + Sync {
    /// Current HTML template.
    async fn template(&self) -> Result<String, RenderError>;

    /// The renderer used with that template.
    fn renderer(&self) -> Arc<dyn Render>;

    /// Both at once.
    async fn load(&self) -> Result<(String, Arc<dyn Render>), RenderError> {
        Ok((self.template().await?, self.renderer()))
    }
}

async fn read_template(path: &Path) -> Result<String, RenderError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RenderError::Template {
            path: path.to_path_buf(),
            source,
        })
}

/// Development provider: the source template is re-read on every load.
pub struct LiveRenderProvider {
    template_path: PathBuf,
    renderer: Arc<dyn Render>,
}

impl LiveRenderProvider {
    pub fn new(template_path: impl Into<PathBuf>, renderer: Arc<dyn Render>) -> Self {
        Self {
            template_path: template_path.into(),
            renderer,
        }
    }
}

#[async_trait]
impl RenderProvider for LiveRenderProvider {
    async fn template(&self) -> Result<String, RenderError> {
        read_template(&self.template_path).await
    }

    fn renderer(&self) -> Arc<dyn Render> {
        Arc::clone(&self.renderer)
    }
}

/// Production provider: the built template is read once.
pub struct StaticRenderProvider {
    template_path: PathBuf,
    renderer: Arc<dyn Render>,
    cached: OnceCell<String>,
}

impl StaticRenderProvider {
    pub fn new(template_path: impl Into<PathBuf>, renderer: Arc<dyn Render>) -> Self {
        Self {
            template_path: template_path.into(),
            renderer,
            cached: OnceCell::new(),
        }
    }
}

#[async_trait]
impl RenderProvider for StaticRenderProvider {
    async fn template(&self) -> Result<String, RenderError> {
        self.cached
            .get_or_try_init(|| read_template(&self.template_path))
            .await
            .cloned()
    }

    fn renderer(&self) -> Arc<dyn Render> {
        Arc::clone(&self.renderer)
    }
}

/// Pick the provider for `mode`.
pub fn provider_for(
    mode: RenderMode,
    config: &RenderConfig,
    renderer: Arc<dyn Render>,
) -> Arc<dyn RenderProvider> {
    match mode {
        RenderMode::Development => {
            tracing::info!(template = %config.template_path.display(), "Using live render provider");
            Arc::new(LiveRenderProvider::new(&config.template_path, renderer))
        }
        RenderMode::Production => {
            tracing::info!(template = %config.dist_template_path.display(), "Using static render provider");
            Arc::new(StaticRenderProvider::new(&config.dist_template_path, renderer))
        }
    }
}
