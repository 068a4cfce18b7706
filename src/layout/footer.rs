//! Shared site footer.

use crate::config::FooterConfig;
use crate::layout::render::{escape_html_into, Render};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

/// Footer block rendered at the bottom of every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footer {
    text: String,
    links: Vec<FooterLink>,
}

impl Footer {
    pub fn new(text: impl Into<String>, links: Vec<FooterLink>) -> Self {
        Self {
            text: text.into(),
            links,
        }
    }

    pub fn from_config(config: &FooterConfig) -> Self {
        let links = config
            .links
            .iter()
            .map(|l| FooterLink {
                label: l.label.clone(),
                href: l.href.clone(),
            })
            .collect();
        Self::new(config.text.clone(), links)
    }
}

impl Render for Footer {
    fn render_into(&self, out: &mut String) {
        out.push_str("<footer class=\"site-footer\">");
        if !self.links.is_empty() {
            out.push_str("<nav class=\"site-footer-links\">");
            for link in &self.links {
                out.push_str("<a href=\"");
                escape_html_into(&link.href, out);
                out.push_str("\">");
                escape_html_into(&link.label, out);
                out.push_str("</a>");
            }
            out.push_str("</nav>");
        }
        if !self.text.is_empty() {
            out.push_str("<p>");
            escape_html_into(&self.text, out);
            out.push_str("</p>");
        }
        out.push_str("</footer>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FooterLinkConfig;

    #[test]
    fn test_footer_from_config() {
        let footer = Footer::from_config(&FooterConfig {
            text: "© 2024 <ftronlie>".into(),
            links: vec![FooterLinkConfig {
                label: "Contact".into(),
                href: "/contact?a=1&b=2".into(),
            }],
        });
        assert_eq!(
            footer.render(),
            "<footer class=\"site-footer\">\
             <nav class=\"site-footer-links\"><a href=\"/contact?a=1&amp;b=2\">Contact</a></nav>\
             <p>© 2024 &lt;ftronlie&gt;</p>\
             </footer>"
        );
    }

    #[test]
    fn test_empty_footer_still_renders_element() {
        assert_eq!(
            Footer::default().render(),
            "<footer class=\"site-footer\"></footer>"
        );
    }
}
