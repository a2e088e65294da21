//! Temporary data endpoint for the export run.
//!
//! # Responsibilities
//! - Serve the catalog data API on a fixed port while pages render
//! - Shut down and join the server task exactly once
//!
//! # Design Decisions
//! - Launch and shutdown sit behind traits so the orchestrator's lifecycle
//!   guarantees can be tested without sockets
//! - Dropping a running endpoint without `close` still signals shutdown

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::catalog::{api_router, Catalog};
use crate::export::ExportError;
use crate::lifecycle::Shutdown;

/// Starts the data endpoint.
#[async_trait]
pub trait EndpointLauncher: Send + Sync {
    async fn start(&self) -> Result<Box<dyn RunningEndpoint>, ExportError>;
}

/// A started data endpoint.
#[async_trait]
pub trait RunningEndpoint: Send {
    /// Origin renderers should fetch from, e.g. `http://127.0.0.1:9999`.
    fn base_url(&self) -> String;

    /// Stop serving and release the port.
    async fn close(self: Box<Self>) -> Result<(), ExportError>;
}

/// Serves a [`Catalog`] under `/api` on a fixed address.
pub struct CatalogEndpoint {
    catalog: Arc<Catalog>,
    addr: SocketAddr,
}

impl CatalogEndpoint {
    pub fn new(catalog: Arc<Catalog>, addr: SocketAddr) -> Self {
        Self { catalog, addr }
    }

    /// Bind on loopback at `port`.
    pub fn on_port(catalog: Arc<Catalog>, port: u16) -> Self {
        Self::new(catalog, SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
    }
}

#[async_trait]
impl EndpointLauncher for CatalogEndpoint {
    async fn start(&self) -> Result<Box<dyn RunningEndpoint>, ExportError> {
        let bring_up_err = |source: std::io::Error| ExportError::BringUp {
            addr: self.addr,
            source,
        };

        let listener = TcpListener::bind(self.addr).await.map_err(bring_up_err)?;
        let addr = listener.local_addr().map_err(bring_up_err)?;

        let app = Router::new().nest("/api", api_router(Arc::clone(&self.catalog)));
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await
        });

        tracing::info!(address = %addr, "Data endpoint started for static export");
        Ok(Box::new(ServingEndpoint {
            addr,
            shutdown,
            task: Some(task),
        }))
    }
}

struct ServingEndpoint {
    addr: SocketAddr,
    shutdown: Shutdown,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

#[async_trait]
impl RunningEndpoint for ServingEndpoint {
    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    async fn close(mut self: Box<Self>) -> Result<(), ExportError> {
        self.shutdown.trigger();
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        match task.await {
            Ok(Ok(())) => {
                tracing::info!(address = %self.addr, "Data endpoint closed");
                Ok(())
            }
            Ok(Err(e)) => Err(ExportError::Teardown(e.to_string())),
            Err(e) => Err(ExportError::Teardown(e.to_string())),
        }
    }
}

impl Drop for ServingEndpoint {
    fn drop(&mut self) {
        if self.task.is_some() {
            tracing::warn!(address = %self.addr, "Data endpoint dropped without close");
            self.shutdown.trigger();
        }
    }
}
