//! Static export orchestration.
//!
//! # Responsibilities
//! - Bring the data endpoint up, render every page, tear the endpoint down
//! - Abort on the first failure, leaving already-written files in place
//!
//! # Design Decisions
//! - Teardown runs whether generation succeeded or not; a teardown failure
//!   is logged and never masks the generation outcome

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::app::StorefrontRenderer;
use crate::catalog::{CatalogClient, ProductSource};
use crate::config::ExportConfig;
use crate::export::endpoint::{EndpointLauncher, RunningEndpoint};
use crate::export::{enumerate_pages, write_document, ExportError};
use crate::observability::metrics;
use crate::render::{render_document, Render};

/// Outcome of a successful export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub pages_written: usize,
}

/// Renderer and page source bound to a running data endpoint.
pub struct LoadedApp {
    pub renderer: Arc<dyn Render>,
    pub source: Arc<dyn ProductSource>,
}

/// Builds the application against the endpoint's base URL.
#[async_trait]
pub trait RenderLoader: Send + Sync {
    async fn load(&self, endpoint_url: &str) -> Result<LoadedApp, ExportError>;
}

/// Loads the storefront renderer over HTTP from the data endpoint.
pub struct StorefrontLoader {
    base: String,
}

impl StorefrontLoader {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl RenderLoader for StorefrontLoader {
    async fn load(&self, endpoint_url: &str) -> Result<LoadedApp, ExportError> {
        let client: Arc<dyn ProductSource> =
            Arc::new(CatalogClient::new(endpoint_url)?);
        let renderer = StorefrontRenderer::new(&self.base, Arc::clone(&client))?;
        Ok(LoadedApp {
            renderer: Arc::new(renderer),
            source: client,
        })
    }
}

/// Runs one static export.
pub struct StaticExporter {
    config: ExportConfig,
    template_path: PathBuf,
    launcher: Arc<dyn EndpointLauncher>,
    loader: Arc<dyn RenderLoader>,
}

impl StaticExporter {
    pub fn new(
        config: ExportConfig,
        template_path: impl Into<PathBuf>,
        launcher: Arc<dyn EndpointLauncher>,
        loader: Arc<dyn RenderLoader>,
    ) -> Self {
        Self {
            config,
            template_path: template_path.into(),
            launcher,
            loader,
        }
    }

    pub async fn run(&self) -> Result<ExportReport, ExportError> {
        let endpoint = self.launcher.start().await?;
        let base_url = endpoint.base_url();

        let result = self.generate(&base_url).await;
        close(endpoint).await;

        match &result {
            Ok(report) => tracing::info!(
                pages = report.pages_written,
                dist = %self.config.dist_dir.display(),
                "Static export complete"
            ),
            Err(e) => tracing::error!(error = %e, "Static export failed"),
        }
        result
    }

    async fn generate(&self, endpoint_url: &str) -> Result<ExportReport, ExportError> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|source| ExportError::Template {
                path: self.template_path.clone(),
                source,
            })?;

        let app = self.loader.load(endpoint_url).await?;
        let pages = enumerate_pages(
            app.source.as_ref(),
            &self.config.dist_dir,
            self.config.page_limit,
        )
        .await?;

        let total = pages.len();
        tracing::info!(
            total,
            "Exporting 1 home + 1 404 + {} products",
            total.saturating_sub(2)
        );

        for (index, page) in pages.iter().enumerate() {
            let html = render_document(&template, &page.url, &page.query, app.renderer.as_ref())
                .await
                .map_err(|source| ExportError::Render {
                    url: page.url.clone(),
                    source,
                })?;
            write_document(&page.file_path, &html).await?;
            metrics::record_page_written();

            let done = index + 1;
            if done % self.config.progress_every.max(1) == 0 || done == total {
                tracing::info!(done, total, "Export progress");
            }
        }

        Ok(ExportReport {
            pages_written: total,
        })
    }
}

async fn close(endpoint: Box<dyn RunningEndpoint>) {
    if let Err(e) = endpoint.close().await {
        tracing::error!(error = %e, "Data endpoint teardown failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::sample;
    use crate::render::{RenderError, RenderResult};
    use crate::routing::QueryMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TEMPLATE: &str = "<head><!--app-head--></head><div><!--app-html--></div>";

    #[derive(Default)]
    struct Counts {
        started: AtomicUsize,
        closed: AtomicUsize,
    }

    struct FakeLauncher {
        counts: Arc<Counts>,
        fail: bool,
    }

    struct FakeEndpoint {
        counts: Arc<Counts>,
    }

    #[async_trait]
    impl EndpointLauncher for FakeLauncher {
        async fn start(&self) -> Result<Box<dyn RunningEndpoint>, ExportError> {
            if self.fail {
                return Err(ExportError::BringUp {
                    addr: "127.0.0.1:9999".parse().unwrap(),
                    source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
                });
            }
            self.counts.started.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeEndpoint {
                counts: Arc::clone(&self.counts),
            }))
        }
    }

    #[async_trait]
    impl RunningEndpoint for FakeEndpoint {
        fn base_url(&self) -> String {
            "http://fake".to_string()
        }

        async fn close(self: Box<Self>) -> Result<(), ExportError> {
            self.counts.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Echoes the URL, failing on one of them.
    struct UrlRenderer {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl Render for UrlRenderer {
        async fn render(&self, url: &str, _query: &QueryMap) -> Result<RenderResult, RenderError> {
            if self.fail_on == Some(url) {
                return Err(RenderError::Failed {
                    url: url.to_string(),
                    message: "boom".to_string(),
                });
            }
            Ok(RenderResult::new(format!("page:{url}")))
        }
    }

    struct FakeLoader {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl RenderLoader for FakeLoader {
        async fn load(&self, endpoint_url: &str) -> Result<LoadedApp, ExportError> {
            assert_eq!(endpoint_url, "http://fake");
            Ok(LoadedApp {
                renderer: Arc::new(UrlRenderer {
                    fail_on: self.fail_on,
                }),
                source: Arc::new(sample()),
            })
        }
    }

    fn exporter(dir: &std::path::Path, counts: Arc<Counts>, fail_on: Option<&'static str>) -> StaticExporter {
        std::fs::write(dir.join("index.html"), TEMPLATE).unwrap();
        let config = ExportConfig {
            dist_dir: dir.to_path_buf(),
            ..Default::default()
        };
        StaticExporter::new(
            config,
            dir.join("index.html"),
            Arc::new(FakeLauncher { counts, fail: false }),
            Arc::new(FakeLoader { fail_on }),
        )
    }

    #[tokio::test]
    async fn test_exports_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let counts = Arc::new(Counts::default());

        let report = exporter(dir.path(), counts.clone(), None).run().await.unwrap();

        assert_eq!(report.pages_written, 6);
        let home = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(home.contains("page:/"));
        assert!(dir.path().join("404.html").exists());
        for id in ["1", "2", "3", "4"] {
            let doc = std::fs::read_to_string(dir.path().join("product").join(id).join("index.html")).unwrap();
            assert!(doc.contains(&format!("page:/product/{id}/")));
        }
        assert_eq!(counts.started.load(Ordering::SeqCst), 1);
        assert_eq!(counts.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_render_failure_aborts_and_tears_down() {
        let dir = tempfile::tempdir().unwrap();
        let counts = Arc::new(Counts::default());

        let err = exporter(dir.path(), counts.clone(), Some("/product/2/"))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Render { ref url, .. } if url == "/product/2/"));
        // Listing order is price ascending: 4, 2, 3, 1.
        assert!(dir.path().join("product/4/index.html").exists());
        assert!(!dir.path().join("product/2/index.html").exists());
        assert!(!dir.path().join("product/3/index.html").exists());
        assert!(!dir.path().join("product/1/index.html").exists());
        assert_eq!(counts.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_template_still_tears_down() {
        let dir = tempfile::tempdir().unwrap();
        let counts = Arc::new(Counts::default());
        let exporter = StaticExporter::new(
            ExportConfig::default(),
            dir.path().join("missing.html"),
            Arc::new(FakeLauncher {
                counts: counts.clone(),
                fail: false,
            }),
            Arc::new(FakeLoader { fail_on: None }),
        );

        let err = exporter.run().await.unwrap_err();
        assert!(matches!(err, ExportError::Template { .. }));
        assert_eq!(counts.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bring_up_failure_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let counts = Arc::new(Counts::default());
        let exporter = StaticExporter::new(
            ExportConfig {
                dist_dir: dir.path().to_path_buf(),
                ..Default::default()
            },
            dir.path().join("index.html"),
            Arc::new(FakeLauncher {
                counts: counts.clone(),
                fail: true,
            }),
            Arc::new(FakeLoader { fail_on: None }),
        );

        let err = exporter.run().await.unwrap_err();
        assert!(matches!(err, ExportError::BringUp { .. }));
        assert!(!dir.path().join("404.html").exists());
        assert_eq!(counts.closed.load(Ordering::SeqCst), 0);
    }
}
