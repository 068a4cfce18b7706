//! Page table.

use std::collections::HashMap;
use std::fs;

use crate::config::PageConfig;
use crate::layout::Markup;
use crate::site::{normalize_page_path, SiteError};

#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub body: Markup,
}

/// Pages keyed by normalized path. Bodies are loaded once, at compile time.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    pages: HashMap<String, Page>,
}

impl PageTable {
    pub fn from_config(configs: &[PageConfig]) -> Result<Self, SiteError> {
        let mut pages = HashMap::with_capacity(configs.len());

        for config in configs {
            let body = match (&config.body, &config.file) {
                (Some(body), None) => Markup::new(body.clone()),
                (None, Some(file)) => {
                    let html = fs::read_to_string(file).map_err(|source| SiteError::PageFile {
                        path: file.clone(),
                        source,
                    })?;
                    Markup::new(html)
                }
                _ => return Err(SiteError::PageContent(config.path.clone())),
            };

            let key = normalize_page_path(&config.path).to_string();
            if pages.contains_key(&key) {
                return Err(SiteError::DuplicatePage(config.path.clone()));
            }
            pages.insert(
                key,
                Page {
                    title: config.title.clone(),
                    body,
                },
            );
        }

        tracing::debug!(count = pages.len(), "Page table compiled");
        Ok(Self { pages })
    }

    /// Look up a page by request path. A query string is ignored.
    pub fn get(&self, path: &str) -> Option<&Page> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        self.pages.get(normalize_page_path(path))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn inline(path: &str, title: &str) -> PageConfig {
        PageConfig {
            path: path.into(),
            title: title.into(),
            body: Some(format!("<h1>{title}</h1>")),
            file: None,
        }
    }

    #[test]
    fn test_lookup_ignores_trailing_slash_and_query() {
        let table = PageTable::from_config(&[inline("/", "Home"), inline("/about/", "About")]).unwrap();
        assert_eq!(table.get("/").unwrap().title, "Home");
        assert_eq!(table.get("/about").unwrap().title, "About");
        assert_eq!(table.get("/about/?ref=x").unwrap().title, "About");
        assert!(table.get("/missing").is_none());
    }

    #[test]
    fn test_body_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<p>from disk</p>").unwrap();

        let table = PageTable::from_config(&[PageConfig {
            path: "/disk".into(),
            title: "Disk".into(),
            body: None,
            file: Some(file.path().to_path_buf()),
        }])
        .unwrap();
        assert_eq!(table.get("/disk").unwrap().body.as_str(), "<p>from disk</p>");
    }

    #[test]
    fn test_missing_file_fails() {
        let err = PageTable::from_config(&[PageConfig {
            path: "/x".into(),
            title: "X".into(),
            body: None,
            file: Some("/no/such/page.html".into()),
        }])
        .unwrap_err();
        assert!(matches!(err, SiteError::PageFile { .. }));
    }
}
