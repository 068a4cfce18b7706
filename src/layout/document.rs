//! Full HTML document around a rendered layout.

use crate::config::SiteConfig;
use crate::layout::render::{escape_html_into, Render};
use crate::layout::LAYOUT_CSS;

/// Document shell: doctype, `<head>` and the layout stylesheet.
#[derive(Debug, Clone)]
pub struct Document {
    site_title: String,
    lang: String,
}

impl Document {
    pub fn new(site_title: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
            lang: lang.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.title.clone(), config.lang.clone())
    }

    /// Render a complete page with `body` as the `<body>` contents.
    pub fn render<B: Render + ?Sized>(&self, page_title: &str, body: &B) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"");
        escape_html_into(&self.lang, &mut html);
        html.push_str("\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");

        html.push_str("<title>");
        match (page_title.is_empty(), self.site_title.is_empty()) {
            (false, false) => {
                escape_html_into(page_title, &mut html);
                html.push_str(" | ");
                escape_html_into(&self.site_title, &mut html);
            }
            (false, true) => escape_html_into(page_title, &mut html),
            (true, _) => escape_html_into(&self.site_title, &mut html),
        }
        html.push_str("</title>\n");

        html.push_str("<style>");
        html.push_str(LAYOUT_CSS);
        html.push_str("</style>\n");
        html.push_str("</head>\n<body>\n");

        body.render_into(&mut html);

        html.push_str("\n</body>\n</html>\n");
        html
    }
}
