//! The `Render` seam shared by layout pieces and page content.

/// Something that can write itself as HTML.
pub trait Render {
    /// Append HTML to `out`.
    fn render_into(&self, out: &mut String);

    fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render_into(&self, out: &mut String) {
        (**self).render_into(out);
    }
}

impl<T: Render> Render for Option<T> {
    fn render_into(&self, out: &mut String) {
        if let Some(inner) = self {
            inner.render_into(out);
        }
    }
}

/// Renders nothing.
impl Render for () {
    fn render_into(&self, _out: &mut String) {}
}

/// Trusted HTML, written as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Markup {
    fn from(html: String) -> Self {
        Self(html)
    }
}

impl From<&str> for Markup {
    fn from(html: &str) -> Self {
        Self(html.to_string())
    }
}

impl Render for Markup {
    fn render_into(&self, out: &mut String) {
        out.push_str(&self.0);
    }
}

/// Plain text, escaped on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(pub String);

impl Render for Text {
    fn render_into(&self, out: &mut String) {
        escape_html_into(&self.0, out);
    }
}

/// Minimal HTML escaping, safe for text nodes and quoted attributes.
pub fn escape_html_into(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}
