//! Rule table lookup and dispatch decision.
//!
//! # Responsibilities
//! - Store compiled redirects and rewrites
//! - Resolve a request path to a single [`Resolution`]
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc` without locks)
//! - Redirects are checked before rewrites
//! - Declaration order, first match wins
//! - One pass only: an internal rewrite is not fed back into the table

use serde::Serialize;

use crate::config::{RedirectConfig, RewriteConfig};
use crate::routing::rule::{DestinationKind, RedirectRule, RewriteRule, RuleError};

/// What the dispatcher should do with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Resolution {
    /// Answer with 308 (permanent) or 307.
    Redirect { location: String, permanent: bool },
    /// Fetch `url` upstream and relay the response.
    Proxy { url: String },
    /// Serve `path` from the page table.
    Internal { path: String },
    /// No rule matched; the request goes through unchanged.
    Passthrough,
}

/// Compiled rule table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    redirects: Vec<RedirectRule>,
    rewrites: Vec<RewriteRule>,
}

impl Router {
    pub fn new(redirects: Vec<RedirectRule>, rewrites: Vec<RewriteRule>) -> Self {
        Self {
            redirects,
            rewrites,
        }
    }

    /// Compile rules from configuration, failing on the first bad rule.
    pub fn from_config(
        redirects: &[RedirectConfig],
        rewrites: &[RewriteConfig],
    ) -> Result<Self, RuleError> {
        let redirects = redirects
            .iter()
            .map(|r| RedirectRule::new(&r.source, &r.destination, r.permanent))
            .collect::<Result<Vec<_>, _>>()?;
        let rewrites = rewrites
            .iter()
            .map(|r| RewriteRule::new(&r.source, &r.destination))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(redirects, rewrites))
    }

    pub fn rewrites(&self) -> &[RewriteRule] {
        &self.rewrites
    }

    pub fn redirects(&self) -> &[RedirectRule] {
        &self.redirects
    }

    /// Resolve a raw request path and optional query string.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> Resolution {
        for rule in &self.redirects {
            if let Some(location) = rule.apply(path, query) {
                tracing::trace!(source = rule.source(), %location, "Redirect rule matched");
                return Resolution::Redirect {
                    location,
                    permanent: rule.permanent(),
                };
            }
        }

        for rule in &self.rewrites {
            if let Some(rewritten) = rule.apply(path, query) {
                tracing::trace!(
                    source = rule.source(),
                    target = %rewritten.target,
                    "Rewrite rule matched"
                );
                return match rewritten.kind {
                    DestinationKind::Upstream => Resolution::Proxy {
                        url: rewritten.target,
                    },
                    DestinationKind::Internal => Resolution::Internal {
                        path: rewritten.target,
                    },
                };
            }
        }

        Resolution::Passthrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn default_router() -> Router {
        let config = GatewayConfig::default();
        Router::from_config(&config.redirects, &config.rewrites).unwrap()
    }

    #[test]
    fn test_default_table_proxies_uploads() {
        let router = default_router();
        assert_eq!(
            router.resolve("/uploads/avatars/42.png", None),
            Resolution::Proxy {
                url: "https://beyincikisleri.co/customer/ftronlie-files/uploads/avatars/42.png"
                    .into()
            }
        );
        assert_eq!(
            router.resolve("/uploads/", None),
            Resolution::Proxy {
                url: "https://beyincikisleri.co/customer/ftronlie-files/uploads/".into()
            }
        );
        assert_eq!(router.resolve("/other/path", None), Resolution::Passthrough);
    }

    #[test]
    fn test_first_match_wins() {
        let rewrites = vec![
            RewriteRule::new("/uploads/special/:f", "/pages/:f").unwrap(),
            RewriteRule::new("/uploads/:path*", "https://files.example/:path*").unwrap(),
        ];
        let router = Router::new(Vec::new(), rewrites);
        assert_eq!(
            router.resolve("/uploads/special/x", None),
            Resolution::Internal {
                path: "/pages/x".into()
            }
        );
        assert_eq!(
            router.resolve("/uploads/other/x", None),
            Resolution::Proxy {
                url: "https://files.example/other/x".into()
            }
        );
    }

    #[test]
    fn test_redirects_take_precedence() {
        let redirects = vec![RedirectRule::new("/uploads/legacy", "/uploads/new", false).unwrap()];
        let rewrites = vec![RewriteRule::new("/uploads/:path*", "https://f.example/:path*").unwrap()];
        let router = Router::new(redirects, rewrites);
        assert_eq!(
            router.resolve("/uploads/legacy", None),
            Resolution::Redirect {
                location: "/uploads/new".into(),
                permanent: false
            }
        );
    }

    #[test]
    fn test_resolution_serializes_with_action_tag() {
        let json = serde_json::to_value(Resolution::Passthrough).unwrap();
        assert_eq!(json["action"], "passthrough");

        let json = serde_json::to_value(Resolution::Proxy { url: "u".into() }).unwrap();
        assert_eq!(json["action"], "proxy");
        assert_eq!(json["url"], "u");
    }
}
