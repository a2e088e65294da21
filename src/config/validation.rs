//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, ports valid, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("server.base `{0}` must start with `/`")]
    Base(String),

    #[error("server.request_timeout_secs must be greater than zero")]
    RequestTimeout,

    #[error("export.api_port must be non-zero")]
    ApiPort,

    #[error("export.page_limit must be greater than zero")]
    PageLimit,

    #[error("export.progress_every must be greater than zero")]
    ProgressEvery,
}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if !config.server.base.starts_with('/') {
        errors.push(ValidationError::Base(config.server.base.clone()));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }
    if config.export.api_port == 0 {
        errors.push(ValidationError::ApiPort);
    }
    if config.export.page_limit == 0 {
        errors.push(ValidationError::PageLimit);
    }
    if config.export.progress_every == 0 {
        errors.push(ValidationError::ProgressEvery);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
