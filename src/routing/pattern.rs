//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse `/literal/:param/:rest*` style source patterns
//! - Match raw request paths segment by segment
//! - Substitute captured values into destination templates
//!
//! # Design Decisions
//! - Patterns compiled once at startup, no regex in the hot path
//! - Captures are raw path text: nothing is decoded or re-encoded
//! - Literal segments are case-sensitive
//! - A wildcard that matched nothing is "absent", which is different
//!   from having matched an empty string after a trailing slash

use thiserror::Error;

/// Errors raised while compiling a pattern or template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("invalid parameter name `{name}` in `{pattern}`")]
    InvalidName { pattern: String, name: String },

    #[error("wildcard `:{name}` must be the last segment of `{pattern}`")]
    WildcardNotLast { pattern: String, name: String },

    #[error("parameter `:{name}` appears more than once in `{pattern}`")]
    DuplicateName { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Exact text of one path segment.
    Literal(String),
    /// `:name`, exactly one non-empty segment.
    Param(String),
    /// `:name*`, the rest of the path, possibly nothing.
    ZeroOrMore(String),
    /// `:name+`, the rest of the path, at least one character.
    OneOrMore(String),
}

impl Segment {
    fn name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(n) | Segment::ZeroOrMore(n) | Segment::OneOrMore(n) => Some(n),
        }
    }

    fn is_wildcard(&self) -> bool {
        matches!(self, Segment::ZeroOrMore(_) | Segment::OneOrMore(_))
    }
}

/// A compiled source pattern such as `/uploads/:path*`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a source pattern.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let rest = source
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(source.to_string()))?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let mut segments: Vec<Segment> = Vec::new();
        if !rest.is_empty() {
            let raw: Vec<&str> = rest.split('/').collect();
            let last = raw.len() - 1;

            for (i, text) in raw.into_iter().enumerate() {
                let segment = parse_segment(source, text)?;

                if let Some(name) = segment.name() {
                    if segment.is_wildcard() && i != last {
                        return Err(PatternError::WildcardNotLast {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                    if segments.iter().any(|s| s.name() == Some(name)) {
                        return Err(PatternError::DuplicateName {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of every parameter in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    /// Match a raw request path (no query string).
    pub fn matches<'a>(&'a self, path: &'a str) -> Option<Captures<'a>> {
        // `remaining` is the text after the last consumed '/', or None once
        // the path has no further separator.
        let mut remaining = Some(path.strip_prefix('/')?);
        let mut captures = Captures::default();

        for segment in &self.segments {
            match segment {
                Segment::ZeroOrMore(name) => {
                    captures.push(name, remaining);
                    return Some(captures);
                }
                Segment::OneOrMore(name) => {
                    let rest = remaining.filter(|r| !r.is_empty())?;
                    captures.push(name, Some(rest));
                    return Some(captures);
                }
                Segment::Literal(literal) => {
                    let (head, tail) = split_segment(remaining?);
                    if head != literal.as_str() {
                        return None;
                    }
                    remaining = tail;
                }
                Segment::Param(name) => {
                    let (head, tail) = split_segment(remaining?);
                    if head.is_empty() {
                        return None;
                    }
                    captures.push(name, Some(head));
                    remaining = tail;
                }
            }
        }

        // A single trailing slash is tolerated.
        match remaining {
            None | Some("") => Some(captures),
            Some(_) => None,
        }
    }
}

fn split_segment(rest: &str) -> (&str, Option<&str>) {
    match rest.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    }
}

fn parse_segment(pattern: &str, text: &str) -> Result<Segment, PatternError> {
    let Some(param) = text.strip_prefix(':') else {
        return Ok(Segment::Literal(text.to_string()));
    };

    let (name, make): (&str, fn(String) -> Segment) = if let Some(n) = param.strip_suffix('*') {
        (n, Segment::ZeroOrMore)
    } else if let Some(n) = param.strip_suffix('+') {
        (n, Segment::OneOrMore)
    } else {
        (param, Segment::Param)
    };

    if !is_valid_name(name) {
        return Err(PatternError::InvalidName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }
    Ok(make(name.to_string()))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Values captured by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures<'a> {
    values: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Captures<'a> {
    fn push(&mut self, name: &'a str, value: Option<&'a str>) {
        self.values.push((name, value));
    }

    /// `None` when the name is unknown, `Some(None)` when the parameter is
    /// known but absent.
    pub fn get(&self, name: &str) -> Option<Option<&'a str>> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Placeholder { name: String, slash: bool },
}

/// A destination template such as
/// `https://host/customer/files/uploads/:path*`.
///
/// Placeholders are `:name` tokens, optionally followed by a `*`, `+` or
/// `?` modifier which is consumed with the token. A `:` not followed by a
/// name start character (as in `https:` or `host:8080`) is plain text.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            let starts_name = chars
                .peek()
                .map(|&(_, n)| n.is_ascii_alphabetic() || n == '_')
                .unwrap_or(false);

            if c != ':' || !starts_name {
                text.push(c);
                continue;
            }

            let start = i + 1;
            let mut end = start;
            while let Some(&(j, n)) = chars.peek() {
                if n.is_ascii_alphanumeric() || n == '_' {
                    end = j + n.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            if let Some(&(_, '*' | '+' | '?')) = chars.peek() {
                chars.next();
            }

            let slash = text.ends_with('/');
            if slash {
                text.pop();
            }
            if !text.is_empty() {
                parts.push(Part::Text(std::mem::take(&mut text)));
            }
            parts.push(Part::Placeholder {
                name: source[start..end].to_string(),
                slash,
            });
        }
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }

        Self {
            source: source.to_string(),
            parts,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of every placeholder, in order of appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            Part::Placeholder { name, .. } => Some(name.as_str()),
            Part::Text(_) => None,
        })
    }

    /// Substitute captures verbatim.
    ///
    /// An absent capture drops the `/` in front of its placeholder, so
    /// `/uploads` maps to `.../uploads` and `/uploads/` to `.../uploads/`.
    pub fn expand(&self, captures: &Captures<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 32);
        for part in &self.parts {
            match part {
                Part::Text(t) => out.push_str(t),
                Part::Placeholder { name, slash } => {
                    if let Some(Some(value)) = captures.get(name) {
                        if *slash {
                            out.push('/');
                        }
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}
