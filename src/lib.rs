//! Storefront rendering library: route resolution, navigation, server-side
//! rendering and static export.

pub mod app;
pub mod catalog;
pub mod config;
pub mod export;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod routing;

pub use config::AppConfig;
pub use export::{ExportReport, StaticExporter};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Navigator, RouteTable};
