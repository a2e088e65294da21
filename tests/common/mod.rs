//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use storefront_render::catalog::Catalog;
use storefront_render::export::{
    CatalogEndpoint, EndpointLauncher, ExportError, LoadedApp, RenderLoader, RunningEndpoint,
    StorefrontLoader,
};
use storefront_render::render::{Render, RenderError, RenderResult};
use storefront_render::routing::QueryMap;

pub const TEMPLATE: &str = r#"<!doctype html><html><head><!--app-head--></head><body><div id="root"><!--app-html--></div><script type="module" src="/main.js"></script></body></html>"#;

/// Three products, listed in id order by the default price sort.
pub fn fixture_catalog() -> Catalog {
    Catalog::from_json(
        r#"[
            {"productId": "p1", "title": "Canvas Tote", "lprice": "10", "category1": "Bags", "category2": "Totes"},
            {"productId": "p2", "title": "Leather Tote", "lprice": "20", "category1": "Bags", "category2": "Totes"},
            {"productId": "p3", "title": "Wool Scarf", "lprice": "30", "category1": "Apparel", "category2": "Scarves"}
        ]"#,
    )
    .unwrap()
}

pub fn write_template(dist: &Path) {
    std::fs::write(dist.join("index.html"), TEMPLATE).unwrap();
}

/// Real catalog endpoint on an ephemeral port that counts starts and closes.
pub struct CountingLauncher {
    inner: CatalogEndpoint,
    pub starts: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl CountingLauncher {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: CatalogEndpoint::on_port(Arc::new(catalog), 0),
            starts: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl EndpointLauncher for CountingLauncher {
    async fn start(&self) -> Result<Box<dyn RunningEndpoint>, ExportError> {
        let inner = self.inner.start().await?;
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingEndpoint {
            inner,
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct CountingEndpoint {
    inner: Box<dyn RunningEndpoint>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl RunningEndpoint for CountingEndpoint {
    fn base_url(&self) -> String {
        self.inner.base_url()
    }

    async fn close(self: Box<Self>) -> Result<(), ExportError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close().await
    }
}

/// Delegates to the storefront renderer but fails on one URL.
pub struct FailingRenderer {
    inner: Arc<dyn Render>,
    fail_on: String,
}

#[async_trait]
impl Render for FailingRenderer {
    async fn render(&self, url: &str, query: &QueryMap) -> Result<RenderResult, RenderError> {
        if url == self.fail_on {
            return Err(RenderError::Failed {
                url: url.to_string(),
                message: "injected failure".to_string(),
            });
        }
        self.inner.render(url, query).await
    }
}

/// Storefront loader whose renderer fails on `fail_on`.
pub struct FailingLoader {
    inner: StorefrontLoader,
    fail_on: String,
}

impl FailingLoader {
    pub fn new(fail_on: &str) -> Self {
        Self {
            inner: StorefrontLoader::new("/"),
            fail_on: fail_on.to_string(),
        }
    }
}

#[async_trait]
impl RenderLoader for FailingLoader {
    async fn load(&self, endpoint_url: &str) -> Result<LoadedApp, ExportError> {
        let app = self.inner.load(endpoint_url).await?;
        Ok(LoadedApp {
            renderer: Arc::new(FailingRenderer {
                inner: app.renderer,
                fail_on: self.fail_on.clone(),
            }),
            source: app.source,
        })
    }
}
