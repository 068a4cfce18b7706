//! Rewrite and redirect rules.
//!
//! A rule pairs a compiled source [`PathPattern`] with a destination
//! [`Template`]. Rules are validated when built so that every capture in
//! the source lands somewhere in the destination.

use thiserror::Error;
use url::Url;

use crate::routing::pattern::{PathPattern, PatternError, Template};

/// Errors raised when building a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("`{source_pattern}` captures `:{name}` but the destination never uses it")]
    UnusedCapture { source_pattern: String, name: String },

    #[error("destination `{destination}` uses `:{name}` which the source does not capture")]
    UnknownPlaceholder { destination: String, name: String },

    #[error("destination `{0}` must be an http(s) URL or a path starting with '/'")]
    InvalidDestination(String),
}

/// Where a rewrite sends the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// Absolute `http`/`https` URL, fetched by the forwarder.
    Upstream,
    /// Local path, re-dispatched to the page table.
    Internal,
}

/// Outcome of applying a rewrite to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub kind: DestinationKind,
    pub target: String,
}

/// A compiled source/destination pair.
#[derive(Debug, Clone)]
struct Mapping {
    source: PathPattern,
    destination: Template,
}

impl Mapping {
    fn new(source: &str, destination: &str) -> Result<Self, RuleError> {
        let source = PathPattern::parse(source)?;
        let destination = Template::parse(destination);

        let used: Vec<&str> = destination.placeholder_names().collect();
        if let Some(name) = source.param_names().find(|n| !used.contains(n)) {
            return Err(RuleError::UnusedCapture {
                source_pattern: source.as_str().to_string(),
                name: name.to_string(),
            });
        }
        let captured: Vec<&str> = source.param_names().collect();
        if let Some(name) = used.iter().find(|n| !captured.contains(n)) {
            return Err(RuleError::UnknownPlaceholder {
                destination: destination.as_str().to_string(),
                name: name.to_string(),
            });
        }

        Ok(Self {
            source,
            destination,
        })
    }

    fn apply(&self, path: &str, query: Option<&str>) -> Option<String> {
        let captures = self.source.matches(path)?;
        let mut target = self.destination.expand(&captures);
        append_query(&mut target, query);
        Some(target)
    }
}

fn append_query(target: &mut String, query: Option<&str>) {
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push(if target.contains('?') { '&' } else { '?' });
        target.push_str(query);
    }
}

fn classify(destination: &str) -> Result<DestinationKind, RuleError> {
    if destination.starts_with("http://") || destination.starts_with("https://") {
        let url = Url::parse(destination)
            .map_err(|_| RuleError::InvalidDestination(destination.to_string()))?;
        if url.host_str().is_none() {
            return Err(RuleError::InvalidDestination(destination.to_string()));
        }
        Ok(DestinationKind::Upstream)
    } else if destination.starts_with('/') {
        Ok(DestinationKind::Internal)
    } else {
        Err(RuleError::InvalidDestination(destination.to_string()))
    }
}

/// Transparent rewrite: the client never sees the destination.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    mapping: Mapping,
    kind: DestinationKind,
}

impl RewriteRule {
    pub fn new(source: &str, destination: &str) -> Result<Self, RuleError> {
        let kind = classify(destination)?;
        Ok(Self {
            mapping: Mapping::new(source, destination)?,
            kind,
        })
    }

    pub fn source(&self) -> &str {
        self.mapping.source.as_str()
    }

    pub fn destination(&self) -> &str {
        self.mapping.destination.as_str()
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// Rewrite `path` (and carry `query` along) if the source matches.
    pub fn apply(&self, path: &str, query: Option<&str>) -> Option<Rewritten> {
        self.mapping.apply(path, query).map(|target| Rewritten {
            kind: self.kind,
            target,
        })
    }
}

/// Client-visible redirect answered with 307 or 308.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    mapping: Mapping,
    permanent: bool,
}

impl RedirectRule {
    pub fn new(source: &str, destination: &str, permanent: bool) -> Result<Self, RuleError> {
        classify(destination)?;
        Ok(Self {
            mapping: Mapping::new(source, destination)?,
            permanent,
        })
    }

    pub fn source(&self) -> &str {
        self.mapping.source.as_str()
    }

    pub fn permanent(&self) -> bool {
        self.permanent
    }

    /// The `Location` for `path`, if the source matches.
    pub fn apply(&self, path: &str, query: Option<&str>) -> Option<String> {
        self.mapping.apply(path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPLOADS_SOURCE: &str = "/uploads/:path*";
    const UPLOADS_DESTINATION: &str =
        "https://beyincikisleri.co/customer/ftronlie-files/uploads/:path*";

    fn uploads() -> RewriteRule {
        RewriteRule::new(UPLOADS_SOURCE, UPLOADS_DESTINATION).unwrap()
    }

    #[test]
    fn test_uploads_rewrite_scenarios() {
        let rule = uploads();
        assert_eq!(rule.kind(), DestinationKind::Upstream);

        let r = rule.apply("/uploads/avatars/42.png", None).unwrap();
        assert_eq!(
            r.target,
            "https://beyincikisleri.co/customer/ftronlie-files/uploads/avatars/42.png"
        );

        let r = rule.apply("/uploads/", None).unwrap();
        assert_eq!(
            r.target,
            "https://beyincikisleri.co/customer/ftronlie-files/uploads/"
        );

        assert!(rule.apply("/other/path", None).is_none());
    }

    #[test]
    fn test_uploads_without_trailing_slash_matches_with_absent_suffix() {
        let r = uploads().apply("/uploads", None).unwrap();
        assert_eq!(
            r.target,
            "https://beyincikisleri.co/customer/ftronlie-files/uploads"
        );
    }

    #[test]
    fn test_suffix_is_copied_verbatim() {
        let rule = uploads();
        let suffixes = [
            "",
            "a",
            "a/b/c",
            "file%20name.png",
            "already%2Fencoded",
            "trailing/",
            "dots/../kept",
            "ünïcode.txt",
            "a//b",
        ];
        for s in suffixes {
            let r = rule.apply(&format!("/uploads/{s}"), None).unwrap();
            assert_eq!(
                r.target,
                format!("https://beyincikisleri.co/customer/ftronlie-files/uploads/{s}"),
                "suffix {s:?}"
            );
        }
    }

    #[test]
    fn test_query_is_carried() {
        let rule = uploads();
        let r = rule.apply("/uploads/a.png", Some("w=64&h=64")).unwrap();
        assert!(r.target.ends_with("/uploads/a.png?w=64&h=64"));

        let rule = RewriteRule::new("/img/:name", "https://cdn.example/i?src=:name").unwrap();
        let r = rule.apply("/img/x.png", Some("v=2")).unwrap();
        assert_eq!(r.target, "https://cdn.example/i?src=x.png&v=2");
    }

    #[test]
    fn test_internal_rewrite() {
        let rule = RewriteRule::new("/blog/:slug", "/posts/:slug").unwrap();
        assert_eq!(rule.kind(), DestinationKind::Internal);
        let r = rule.apply("/blog/hello", None).unwrap();
        assert_eq!(r.target, "/posts/hello");
    }

    #[test]
    fn test_capture_must_reach_destination() {
        let err = RewriteRule::new(
            "/uploads/:path*",
            "https://beyincikisleri.co/customer/ftronlie-files/uploads/",
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnusedCapture { .. }));

        let err = RewriteRule::new("/a", "https://example.com/:missing").unwrap_err();
        assert!(matches!(err, RuleError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn test_invalid_destination() {
        assert!(matches!(
            RewriteRule::new("/a", "ftp://example.com/a"),
            Err(RuleError::InvalidDestination(_))
        ));
        assert!(matches!(
            RewriteRule::new("/a", "relative/path"),
            Err(RuleError::InvalidDestination(_))
        ));
    }

    #[test]
    fn test_redirect_rule() {
        let rule = RedirectRule::new("/old/:rest*", "/new/:rest*", true).unwrap();
        assert!(rule.permanent());
        assert_eq!(rule.apply("/old/a/b", Some("x=1")).unwrap(), "/new/a/b?x=1");
        assert_eq!(rule.apply("/old", None).unwrap(), "/new");
    }
}
