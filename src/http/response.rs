//! Locally generated responses.
//!
//! # Responsibilities
//! - HTML page responses (with HEAD support)
//! - Redirects with `Location`
//! - 405 for non-GET requests to pages
//!
//! # Design Decisions
//! - Pages are never cached by intermediaries without revalidation
//! - An unrepresentable `Location` is a server error, not a panic

use axum::body::Body;
use axum::http::header::{HeaderValue, ALLOW, CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// HTML response. For HEAD requests the body is omitted.
pub fn html_response(status: StatusCode, html: String, head: bool) -> Response {
    let len = html.len();
    let body = if head { Body::empty() } else { Body::from(html) };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if head {
        headers.insert(axum::http::header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    response
}

/// 308 when permanent, 307 otherwise. Both preserve the request method.
pub fn redirect_response(location: &str, permanent: bool) -> Response {
    let status = if permanent {
        StatusCode::PERMANENT_REDIRECT
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };

    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(%location, "Redirect location is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ALLOW, HeaderValue::from_static("GET, HEAD"))],
    )
        .into_response()
}
