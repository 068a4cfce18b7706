//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every rule to surface pattern and placeholder errors
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate or malformed pages
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::routing::{RedirectRule, RewriteRule, RuleError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("retries.max_attempts must be at least 1 when retries are enabled")]
    NoRetryAttempts,

    #[error("rewrites[{index}]: {error}")]
    Rewrite { index: usize, error: RuleError },

    #[error("redirects[{index}]: {error}")]
    Redirect { index: usize, error: RuleError },

    #[error("pages[{index}]: path `{path}` must start with '/'")]
    PagePath { index: usize, path: String },

    #[error("pages[{index}]: exactly one of `body` or `file` must be set")]
    PageContent { index: usize },

    #[error("pages[{index}]: duplicate path `{path}`")]
    DuplicatePage { index: usize, path: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let timeouts = [
        ("request_secs", config.timeouts.request_secs),
        ("upstream_connect_secs", config.timeouts.upstream_connect_secs),
        ("upstream_request_secs", config.timeouts.upstream_request_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.retries.enabled && config.retries.max_attempts == 0 {
        errors.push(ValidationError::NoRetryAttempts);
    }

    for (index, rule) in config.rewrites.iter().enumerate() {
        if let Err(error) = RewriteRule::new(&rule.source, &rule.destination) {
            errors.push(ValidationError::Rewrite { index, error });
        }
    }
    for (index, rule) in config.redirects.iter().enumerate() {
        if let Err(error) = RedirectRule::new(&rule.source, &rule.destination, rule.permanent) {
            errors.push(ValidationError::Redirect { index, error });
        }
    }

    let mut seen = HashSet::new();
    for (index, page) in config.pages.iter().enumerate() {
        if !page.path.starts_with('/') {
            errors.push(ValidationError::PagePath {
                index,
                path: page.path.clone(),
            });
        }
        if page.body.is_some() == page.file.is_some() {
            errors.push(ValidationError::PageContent { index });
        }
        if !seen.insert(crate::site::normalize_page_path(&page.path)) {
            errors.push(ValidationError::DuplicatePage {
                index,
                path: page.path.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
