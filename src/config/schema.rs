//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source pattern of the built-in uploads rewrite.
pub const UPLOADS_SOURCE: &str = "/uploads/:path*";

/// Destination of the built-in uploads rewrite.
pub const UPLOADS_DESTINATION: &str =
    "https://beyincikisleri.co/customer/ftronlie-files/uploads/:path*";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for upstream fetches.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Document-level settings shared by every page.
    pub site: SiteConfig,

    /// Footer rendered under every page.
    pub footer: FooterConfig,

    /// Transparent rewrites, evaluated in order.
    pub rewrites: Vec<RewriteConfig>,

    /// Client-visible redirects, evaluated before rewrites.
    pub redirects: Vec<RedirectConfig>,

    /// Pages served through the content layout.
    pub pages: Vec<PageConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            retries: RetryConfig::default(),
            observability: ObservabilityConfig::default(),
            site: SiteConfig::default(),
            footer: FooterConfig::default(),
            rewrites: vec![RewriteConfig {
                source: UPLOADS_SOURCE.to_string(),
                destination: UPLOADS_DESTINATION.to_string(),
            }],
            redirects: Vec::new(),
            pages: Vec::new(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed to produce a response, in seconds.
    pub request_secs: u64,

    /// Upstream connection establishment timeout in seconds.
    pub upstream_connect_secs: u64,

    /// Upstream request timeout in seconds.
    pub upstream_request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_connect_secs: 5,
            upstream_request_secs: 25,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Document settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Appended to every page title.
    pub title: String,

    /// `lang` attribute of the document.
    pub lang: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "ftronlie".to_string(),
            lang: "en".to_string(),
        }
    }
}

/// Footer contents.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Plain text line, escaped when rendered.
    pub text: String,

    pub links: Vec<FooterLinkConfig>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            text: "© ftronlie".to_string(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FooterLinkConfig {
    pub label: String,
    pub href: String,
}

/// Rewrite rule: `source` path pattern to `destination` URL or path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewriteConfig {
    pub source: String,
    pub destination: String,
}

/// Redirect rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedirectConfig {
    pub source: String,
    pub destination: String,

    /// 308 when true, 307 otherwise.
    #[serde(default)]
    pub permanent: bool,
}

/// A page rendered through the content layout.
///
/// Exactly one of `body` (inline HTML) or `file` must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    pub path: String,
    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    /// HTML fragment on disk, resolved against the config file's directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}
