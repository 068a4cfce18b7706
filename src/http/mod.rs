//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout, body limit)
//!     → request.rs (request ID, peer address)
//!     → routing::Router (redirect / rewrite / passthrough)
//!     → proxy::Forwarder for upstream rewrites
//!     → response.rs (pages, redirects) for everything else
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer, ServerError};
