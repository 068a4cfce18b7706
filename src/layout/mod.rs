//! Page composition.
//!
//! # Data Flow
//! ```text
//! page content (opaque Render)
//!     → ContentLayout (flex column shell, growable main, footer)
//!     → Document (doctype, head, stylesheet)
//!     → HTML string
//! ```
//!
//! # Design Decisions
//! - Content is never inspected or transformed by the layout
//! - The footer is always the last element of the shell
//! - Sticky footer via flexbox: the shell is at least one viewport tall
//!   and the main region absorbs the free space

pub mod document;
pub mod footer;
pub mod render;

pub use document::Document;
pub use footer::{Footer, FooterLink};
pub use render::{escape_html_into, Markup, Render, Text};

/// Styles the shell emitted by [`ContentLayout`].
pub const LAYOUT_CSS: &str = "\
html,body{margin:0;padding:0}\
.layout{display:flex;flex-direction:column;min-height:100vh}\
.layout-content{flex:1 0 auto}\
.site-footer{flex-shrink:0}";

/// Wraps content in a full-height column with the footer pinned below it.
#[derive(Debug, Clone, Default)]
pub struct ContentLayout<F = Footer> {
    footer: F,
}

impl<F: Render> ContentLayout<F> {
    pub fn new(footer: F) -> Self {
        Self { footer }
    }

    pub fn footer(&self) -> &F {
        &self.footer
    }

    /// Render `children` inside the shell.
    pub fn render_into<C: Render + ?Sized>(&self, children: &C, out: &mut String) {
        out.push_str("<div class=\"layout\">");
        out.push_str("<main class=\"layout-content\">");
        children.render_into(out);
        out.push_str("</main>");
        self.footer.render_into(out);
        out.push_str("</div>");
    }

    pub fn render<C: Render + ?Sized>(&self, children: &C) -> String {
        let mut out = String::new();
        self.render_into(children, &mut out);
        out
    }
}
