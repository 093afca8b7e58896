// Product catalog built from a decoded sitemap

use pulse_scanner::sitemap::{SitemapDocument, UrlEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of leading sitemap entries that never become products.
///
/// Shopify lists the storefront root as the first `<url>` (it carries only
/// `loc` and `changefreq`). The rule is positional and may drop a real product
/// on sitemaps that don't follow that layout.
pub const LEADING_ENTRIES_SKIPPED: usize = 1;

/// Product title to product URL. Iterates in title order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    items: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Added,
    Removed,
    Updated,
}

/// One difference between two catalog snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogChange {
    pub kind: ChangeKind,
    pub name: String,
    /// Current URL, or the last known URL for removed items
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_url: Option<String>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: &SitemapDocument) -> Self {
        Self::from_entries(&document.entries)
    }

    /// Later entries with the same image title replace earlier ones.
    pub fn from_entries(entries: &[UrlEntry]) -> Self {
        let mut catalog = Self::new();
        for entry in entries.iter().skip(LEADING_ENTRIES_SKIPPED) {
            catalog.insert(entry.image.title.clone(), entry.location.clone());
        }
        catalog
    }

    /// Returns the URL that was replaced, if any
    pub fn insert(&mut self, name: String, url: String) -> Option<String> {
        self.items.insert(name, url)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose name contains `keyword`, ignoring case
    pub fn matching(&self, keyword: &str) -> Vec<(&str, &str)> {
        let needle = keyword.to_lowercase();
        self.iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Changes that turn `self` into `newer`, ordered by name
    pub fn diff(&self, newer: &ProductCatalog) -> Vec<CatalogChange> {
        let mut changes = Vec::new();

        for (name, url) in newer.iter() {
            match self.get(name) {
                None => changes.push(CatalogChange {
                    kind: ChangeKind::Added,
                    name: name.to_string(),
                    url: url.to_string(),
                    previous_url: None,
                }),
                Some(old) if old != url => changes.push(CatalogChange {
                    kind: ChangeKind::Updated,
                    name: name.to_string(),
                    url: url.to_string(),
                    previous_url: Some(old.to_string()),
                }),
                Some(_) => {}
            }
        }

        for (name, url) in self.iter() {
            if newer.get(name).is_none() {
                changes.push(CatalogChange {
                    kind: ChangeKind::Removed,
                    name: name.to_string(),
                    url: url.to_string(),
                    previous_url: None,
                });
            }
        }

        changes.sort_by(|a, b| a.name.cmp(&b.name));
        changes
    }
}

impl FromIterator<(String, String)> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
