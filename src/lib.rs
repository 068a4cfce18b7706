//! Uploads gateway library.
//!
//! Serves a small site whose `/uploads/*` paths are transparently rewritten
//! to an external file host, with every local page wrapped in a
//! sticky-footer layout.

pub mod config;
pub mod http;
pub mod layout;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod routing;
pub mod site;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
