//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router: catalog data API under `/api`, render fallback
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener with graceful shutdown

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::{api_router, Catalog};
use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::render::{render_document, RenderError, RenderProvider};
use crate::routing::QueryMap;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RenderProvider>,
}

/// Live SSR server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServerConfig, provider: Arc<dyn RenderProvider>, catalog: Arc<Catalog>) -> Self {
        let router = Self::build_router(config, AppState { provider }, catalog);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState, catalog: Arc<Catalog>) -> Router {
        Router::new()
            .fallback(render_handler)
            .with_state(state)
            .nest("/api", api_router(catalog))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render every non-API path.
async fn render_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let query = QueryMap::parse(uri.query().unwrap_or(""));
    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    match render_page(&state, url, &query).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn render_page(state: &AppState, url: &str, query: &QueryMap) -> Result<String, RenderError> {
    let (template, renderer) = state.provider.load().await?;
    render_document(&template, url, query, renderer.as_ref()).await
}
