//! Upstream fetch errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid upstream target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("target `{target}` would not be sent as written")]
    NonCanonicalTarget { target: String },

    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    #[error("upstream connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProxyError {
    /// Classify a client error by what went wrong.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProxyError::Timeout(error)
        } else if error.is_connect() {
            ProxyError::Connect(error)
        } else {
            ProxyError::Upstream(error)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NonCanonicalTarget { .. } | ProxyError::RequestBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::InvalidTarget { .. } | ProxyError::Connect(_) | ProxyError::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ProxyError::InvalidTarget { .. } => "invalid_target",
            ProxyError::NonCanonicalTarget { .. } => "non_canonical_target",
            ProxyError::RequestBody(_) => "request_body",
            ProxyError::Connect(_) => "connect",
            ProxyError::Timeout(_) => "timeout",
            ProxyError::Upstream(_) => "upstream",
            ProxyError::Client(_) => "client",
        }
    }

    /// Nothing reached the upstream, so another attempt is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProxyError::Connect(_))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match &self {
            ProxyError::Timeout(_) => "Upstream request timed out",
            ProxyError::InvalidTarget { .. } | ProxyError::Connect(_) | ProxyError::Upstream(_) => {
                "Upstream request failed"
            }
            ProxyError::NonCanonicalTarget { .. } => "Invalid request path",
            ProxyError::RequestBody(_) => "Invalid request body",
            ProxyError::Client(_) => "Internal error",
        };
        (self.status(), message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_maps_to_bad_gateway() {
        let err = ProxyError::InvalidTarget {
            target: "x".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.reason(), "invalid_target");
        assert!(!err.is_retryable());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_non_canonical_target_is_bad_request() {
        let err = ProxyError::NonCanonicalTarget {
            target: "https://files.example/uploads/../admin".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.reason(), "non_canonical_target");
        assert!(!err.is_retryable());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
