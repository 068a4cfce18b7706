//! Compiled site: rule table, page table and page chrome.
//!
//! A `Site` is built from one `GatewayConfig` snapshot and never mutated.
//! Reloads build a fresh `Site` and swap it in whole.

pub mod pages;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::layout::{ContentLayout, Document, Footer, Markup, Render};
use crate::routing::{Router, RuleError};

pub use pages::{Page, PageTable};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("failed to read page file {path}: {source}")]
    PageFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("page `{0}` needs exactly one of `body` or `file`")]
    PageContent(String),

    #[error("duplicate page path `{0}`")]
    DuplicatePage(String),
}

/// Strip trailing slashes, keeping `/` for the root.
pub fn normalize_page_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[derive(Debug)]
pub struct Site {
    router: Router,
    pages: PageTable,
    layout: ContentLayout<Footer>,
    document: Document,
}

impl Site {
    pub fn compile(config: &GatewayConfig) -> Result<Self, SiteError> {
        let router = Router::from_config(&config.redirects, &config.rewrites)?;
        let pages = PageTable::from_config(&config.pages)?;

        tracing::info!(
            rewrites = router.rewrites().len(),
            redirects = router.redirects().len(),
            pages = pages.len(),
            "Site compiled"
        );

        Ok(Self {
            router,
            pages,
            layout: ContentLayout::new(Footer::from_config(&config.footer)),
            document: Document::from_config(&config.site),
        })
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    /// Render arbitrary content through the layout and document shell.
    pub fn render<C: Render + ?Sized>(&self, title: &str, content: &C) -> String {
        let body = Markup::new(self.layout.render(content));
        self.document.render(title, &body)
    }

    pub fn render_page(&self, page: &Page) -> String {
        self.render(&page.title, &page.body)
    }

    pub fn render_not_found(&self) -> String {
        self.render(
            "Not Found",
            &Markup::from("<h1>404</h1><p>This page could not be found.</p>"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;

    #[test]
    fn test_normalize_page_path() {
        assert_eq!(normalize_page_path("/"), "/");
        assert_eq!(normalize_page_path("//"), "/");
        assert_eq!(normalize_page_path("/about/"), "/about");
        assert_eq!(normalize_page_path("/about"), "/about");
    }

    #[test]
    fn test_render_page_wraps_in_layout() {
        let mut config = GatewayConfig::default();
        config.pages.push(PageConfig {
            path: "/".into(),
            title: "Home".into(),
            body: Some("<h1>Welcome</h1>".into()),
            file: None,
        });
        let site = Site::compile(&config).unwrap();
        let html = site.render_page(site.pages().get("/").unwrap());

        assert!(html.contains("<title>Home | ftronlie</title>"));
        assert!(html.contains(
            "<main class=\"layout-content\"><h1>Welcome</h1></main><footer class=\"site-footer\">"
        ));
        assert!(html.contains("</footer></div>\n</body>"));
    }

    #[test]
    fn test_not_found_uses_layout() {
        let site = Site::compile(&GatewayConfig::default()).unwrap();
        let html = site.render_not_found();
        assert!(html.contains("<h1>404</h1>"));
        assert!(html.contains("<footer class=\"site-footer\">"));
    }
}
