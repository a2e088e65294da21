//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! storefront server and the static export.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Live server settings.
    pub server: ServerConfig,

    /// Template locations.
    pub render: RenderConfig,

    /// Product data.
    pub catalog: CatalogConfig,

    /// Static export settings.
    pub export: ExportConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Apply `PORT` and `BASE` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var("PORT").ok(), std::env::var("BASE").ok());
    }

    fn apply_overrides(&mut self, port: Option<String>, base: Option<String>) {
        if let Some(port) = port {
            let host = self
                .server
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.server.bind_address = format!("{host}:{port}");
        }
        if let Some(base) = base {
            self.server.base = base;
        }
    }
}

/// Which render provider the server uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Source template re-read per request.
    #[default]
    Development,
    /// Built template read once.
    Production,
}

/// Live server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5173").
    pub bind_address: String,

    /// Base path every route lives under (e.g., "/shop/").
    pub base: String,

    /// Render provider selection.
    pub mode: RenderMode,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5173".to_string(),
            base: "/".to_string(),
            mode: RenderMode::Development,
            request_timeout_secs: 30,
        }
    }
}

/// Template locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Source template (development).
    pub template_path: PathBuf,

    /// Built template (production and export).
    pub dist_template_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("index.html"),
            dist_template_path: PathBuf::from("dist/index.html"),
        }
    }
}

/// Product data configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON array of products.
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/items.json"),
        }
    }
}

/// Static export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output root; also holds the built template.
    pub dist_dir: PathBuf,

    /// Port of the temporary data endpoint.
    pub api_port: u16,

    /// Products fetched for page enumeration.
    pub page_limit: usize,

    /// Log progress every N pages.
    pub progress_every: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            api_port: 9999,
            page_limit: 20,
            progress_every: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.export.api_port, 9999);
        assert_eq!(config.export.page_limit, 20);
        assert_eq!(config.server.mode, RenderMode::Development);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            mode = "production"
            base = "/shop/"

            [export]
            page_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.server.mode, RenderMode::Production);
        assert_eq!(config.server.base, "/shop/");
        assert_eq!(config.server.bind_address, "0.0.0.0:5173");
        assert_eq!(config.export.page_limit, 5);
        assert_eq!(config.export.api_port, 9999);
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("8080".into()), Some("/front/".into()));
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.base, "/front/");

        config.apply_overrides(None, None);
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }
}
