//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use uploads_gateway::config::GatewayConfig;
use uploads_gateway::http::HttpServer;
use uploads_gateway::lifecycle::Shutdown;

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[allow(dead_code)]
pub type Log = Arc<Mutex<Vec<Recorded>>>;

/// Start a mock file host on an ephemeral port.
///
/// Paths ending in `/missing` get a 404, paths ending in `/moved` get a 302,
/// everything else gets `200 upstream:<uri>`.
#[allow(dead_code)]
pub async fn start_mock_upstream() -> (SocketAddr, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handler_log = log.clone();
    let app = Router::new().fallback(move |request: Request<Body>| {
        let log = handler_log.clone();
        async move { record(log, request).await }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, log)
}

#[allow(dead_code)]
async fn record(log: Log, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let uri = parts.uri.to_string();

    log.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        uri: uri.clone(),
        headers: parts.headers,
        body,
    });

    if parts.uri.path().ends_with("/missing") {
        (StatusCode::NOT_FOUND, "no such upload").into_response()
    } else if parts.uri.path().ends_with("/moved") {
        (StatusCode::FOUND, [("location", "/elsewhere")], "").into_response()
    } else {
        (
            StatusCode::OK,
            [("content-type", "image/png"), ("x-upstream", "mock")],
            format!("upstream:{uri}"),
        )
            .into_response()
    }
}

/// Start an upstream that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_stalling_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });

    addr
}

/// Send a GET with `target` written as-is on the request line and return
/// the response status. HTTP clients normalize paths, so this goes over a
/// plain socket.
#[allow(dead_code)]
pub async fn raw_get(addr: SocketAddr, target: &str) -> u16 {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    let status_line = response.lines().next().unwrap_or_default();
    status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap_or_else(|| panic!("malformed status line {status_line:?}"))
}

/// Start the gateway on an ephemeral port.
#[allow(dead_code)]
pub async fn start_gateway(
    config: GatewayConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<GatewayConfig>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates_tx, updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates, server_shutdown).await;
    });

    (addr, shutdown, updates_tx)
}

/// Client that neither follows redirects nor uses system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
