//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (redirect table, then rewrite table)
//!     → rule.rs (source pattern + destination template)
//!     → pattern.rs (segment matching, capture substitution)
//!     → Return: Redirect | Proxy | Internal | Passthrough
//!
//! Rule Compilation (at startup and on reload):
//!     RewriteConfig[] / RedirectConfig[]
//!     → Parse patterns and templates
//!     → Check every capture reaches the destination
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Rules compiled up front, immutable at runtime
//! - No regex in hot path (segment scan only)
//! - Deterministic: same input always resolves the same way
//! - First match wins (declaration order)

pub mod pattern;
pub mod router;
pub mod rule;

pub use pattern::{Captures, PathPattern, PatternError, Template};
pub use router::{Resolution, Router};
pub use rule::{DestinationKind, RedirectRule, RewriteRule, RuleError, Rewritten};
