//! Transparent upstream forwarding for rewritten requests.
//!
//! # Data Flow
//! ```text
//! Rewritten target URL + inbound request
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*, X-Request-Id)
//!     → reqwest client (connect / request deadlines, redirects not followed)
//!     → on connect failure: RetryPolicy backoff, bounded attempts
//!     → relay status, headers and streamed body to the client
//! ```
//!
//! # Design Decisions
//! - The client never sees the upstream URL; no 3xx is produced here
//! - Upstream statuses are relayed as-is; only transport failures map to
//!   502 / 504
//! - Bodies of retryable requests are buffered, all others are streamed
//! - The response body is streamed, never buffered
//! - A target the URL parser would rewrite (dot segments, `\`) is refused
//!   rather than sent in normalized form

pub mod error;
pub mod headers;

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, HttpBody};
use axum::http::{Request, Response};

use crate::config::{RetryConfig, TimeoutConfig};
use crate::resilience::RetryPolicy;

pub use error::ProxyError;
pub use headers::{strip_hop_by_hop, upstream_request_headers};

/// Shared upstream client.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    retry: RetryPolicy,
    max_buffered_body: usize,
}

impl Forwarder {
    pub fn new(
        timeouts: &TimeoutConfig,
        retries: &RetryConfig,
        max_buffered_body: usize,
    ) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.upstream_connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_request_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(ProxyError::Client)?;

        Ok(Self {
            client,
            retry: RetryPolicy::new(retries.clone()),
            max_buffered_body,
        })
    }

    /// Fetch `target` on behalf of `request` and relay the response.
    pub async fn forward(
        &self,
        target: &str,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
        request_id: &str,
    ) -> Result<Response<Body>, ProxyError> {
        let url = parse_target(target)?;

        let (parts, body) = request.into_parts();
        let headers = upstream_request_headers(&parts.headers, client_addr, request_id);
        let max_attempts = self.retry.max_attempts(&parts.method);

        if max_attempts <= 1 {
            let mut builder = self.client.request(parts.method, url).headers(headers);
            if body.size_hint().exact() != Some(0) {
                builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
            }
            let response = builder.send().await.map_err(ProxyError::from_reqwest)?;
            return Ok(relay(response));
        }

        let bytes = axum::body::to_bytes(body, self.max_buffered_body)
            .await
            .map_err(ProxyError::RequestBody)?;

        let mut attempts = 0;
        loop {
            attempts += 1;

            let mut builder = self
                .client
                .request(parts.method.clone(), url.clone())
                .headers(headers.clone());
            if !bytes.is_empty() {
                builder = builder.body(bytes.clone());
            }

            match builder.send().await {
                Ok(response) => return Ok(relay(response)),
                Err(e) => {
                    let error = ProxyError::from_reqwest(e);
                    if attempts < max_attempts && error.is_retryable() {
                        let delay = self.retry.backoff(attempts);
                        tracing::info!(
                            request_id = %request_id,
                            attempt = attempts,
                            delay = ?delay,
                            error = %error,
                            "Retrying upstream fetch"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(error);
                }
            }
        }
    }
}

/// Parse an expanded target, refusing any the URL parser would not send
/// byte for byte.
///
/// The parser resolves `.`/`..` segments (also when encoded as `%2e`) and
/// turns `\` into `/`, which would let a suffix climb out of the
/// destination prefix.
fn parse_target(target: &str) -> Result<reqwest::Url, ProxyError> {
    let url = reqwest::Url::parse(target).map_err(|e| ProxyError::InvalidTarget {
        target: target.to_string(),
        reason: e.to_string(),
    })?;

    let requested = match target.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => target,
    };
    let sent = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };

    if sent != requested {
        return Err(ProxyError::NonCanonicalTarget {
            target: target.to_string(),
        });
    }
    Ok(url)
}

/// Convert the upstream response into ours without buffering the body.
fn relay(response: reqwest::Response) -> Response<Body> {
    let status = response.status();
    let mut headers = response.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut relayed = Response::new(Body::from_stream(response.bytes_stream()));
    *relayed.status_mut() = status;
    *relayed.headers_mut() = headers;
    relayed
}
