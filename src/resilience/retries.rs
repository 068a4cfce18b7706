//! Retry decisions for upstream fetches.
//!
//! # Design Decisions
//! - Never retry POST/PUT/DELETE/PATCH (non-idempotent)
//! - Only connection failures are retried; a timeout or an upstream status
//!   is final
//! - Jittered backoff prevents thundering herd

use std::time::Duration;

use axum::http::Method;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Whether requests with this method may be attempted more than once.
    pub fn allows(&self, method: &Method) -> bool {
        self.config.enabled && self.config.max_attempts > 1 && is_idempotent(method)
    }

    /// Attempts allowed for `method`, including the first.
    pub fn max_attempts(&self, method: &Method) -> u32 {
        if self.allows(method) {
            self.config.max_attempts
        } else {
            1
        }
    }

    /// Delay before the attempt following `attempts_made`.
    pub fn backoff(&self, attempts_made: u32) -> Duration {
        calculate_backoff(
            attempts_made,
            self.config.base_delay_ms,
            self.config.max_delay_ms,
        )
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}
