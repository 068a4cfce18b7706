//! Request metadata helpers.
//!
//! # Responsibilities
//! - Read the request ID assigned by the request-id middleware
//! - Recover the peer address when the server was built with connect info
//!
//! # Design Decisions
//! - Request ID added as early as possible (outermost layer) for tracing
//! - The raw URI is never normalized before routing

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;

use crate::proxy::headers::X_REQUEST_ID;

/// The `x-request-id` of a request, or `"unknown"` when absent.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Peer address, available when served with connect info.
pub fn client_addr<B>(request: &Request<B>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_header() {
        let req = Request::builder()
            .header("x-request-id", "abc")
            .body(())
            .unwrap();
        assert_eq!(request_id(&req), "abc");

        let req = Request::builder().body(()).unwrap();
        assert_eq!(request_id(&req), "unknown");
    }

    #[test]
    fn test_client_addr_from_extension() {
        let addr: SocketAddr = "10.1.2.3:4000".parse().unwrap();
        let mut req = Request::builder().body(()).unwrap();
        assert_eq!(client_addr(&req), None);

        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_addr(&req), Some(addr));
    }
}
