//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Dispatch requests: redirect, upstream rewrite, page, not found
//! - Swap in recompiled sites when configuration changes
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{client_addr, request_id};
use crate::http::response::{html_response, method_not_allowed, redirect_response};
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::observability::metrics;
use crate::proxy::{Forwarder, ProxyError};
use crate::routing::Resolution;
use crate::site::{Site, SiteError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<ArcSwap<Site>>,
    pub forwarder: Forwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    site: Arc<ArcSwap<Site>>,
    config: GatewayConfig,
}

impl HttpServer {
    /// Compile the site and build the HTTP stack for `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let site = Arc::new(ArcSwap::from_pointee(Site::compile(&config)?));
        let forwarder = Forwarder::new(
            &config.timeouts,
            &config.retries,
            config.listener.max_body_bytes,
        )?;

        let state = AppState {
            site: site.clone(),
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            site,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live site, replaced on every accepted reload.
    pub fn site(&self) -> Arc<ArcSwap<Site>> {
        self.site.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` are compiled and swapped
    /// in; ones that fail to compile are logged and dropped. Listener and
    /// timeout settings only take effect on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site = self.site.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Site::compile(&config) {
                    Ok(compiled) => {
                        site.store(Arc::new(compiled));
                        metrics::record_reload("applied");
                        tracing::info!("Configuration reloaded");
                    }
                    Err(e) => {
                        metrics::record_reload("rejected");
                        tracing::error!(error = %e, "Reloaded configuration rejected, keeping current site");
                    }
                }
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main gateway handler.
/// Resolves the rule table, then proxies, redirects or serves a page.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let site = state.site.load_full();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let resolution = site.router().resolve(&path, request.uri().query());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        resolution = ?resolution,
        "Dispatching request"
    );

    let (kind, response) = match resolution {
        Resolution::Redirect {
            location,
            permanent,
        } => ("redirect", redirect_response(&location, permanent)),
        Resolution::Proxy { url } => {
            let client = client_addr(&request);
            let response = match state
                .forwarder
                .forward(&url, request, client, &request_id)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        upstream = %url,
                        error = %e,
                        "Upstream fetch failed"
                    );
                    metrics::record_upstream_error(e.reason());
                    e.into_response()
                }
            };
            ("proxy", response)
        }
        Resolution::Internal { path: rewritten } => ("page", serve_page(&site, &method, &rewritten)),
        Resolution::Passthrough => ("page", serve_page(&site, &method, &path)),
    };

    metrics::record_request(kind, response.status().as_u16(), start);
    response
}

fn serve_page(site: &Site, method: &Method, path: &str) -> Response {
    let head = *method == Method::HEAD;

    match site.pages().get(path) {
        Some(_) if !head && *method != Method::GET => method_not_allowed(),
        Some(page) => html_response(StatusCode::OK, site.render_page(page), head),
        None => html_response(StatusCode::NOT_FOUND, site.render_not_found(), head),
    }
}
