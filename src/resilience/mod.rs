//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream fetch:
//!     → client timeouts (connect / request deadlines on the reqwest client)
//!     → On failure: retries.rs (retryable? attempts left?)
//!     → backoff.rs (exponential delay with jitter before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline
//! - Retries only for idempotent requests whose body is already buffered
//! - Only connection failures are retried; upstream statuses are relayed

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::RetryPolicy;
