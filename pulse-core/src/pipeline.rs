use crate::catalog::ProductCatalog;
use indicatif::{ProgressBar, ProgressStyle};
use pulse_scanner::error::Result;
use pulse_scanner::fetcher::{SitemapFetcher, sitemap_url};
use pulse_scanner::product::ProductVariant;
use pulse_scanner::sitemap::DecodePolicy;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Options for one fetch → decode → build run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub base_url: Url,
    pub policy: DecodePolicy,
    pub show_progress: bool,
}

impl PipelineOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            policy: DecodePolicy::default(),
            show_progress: false,
        }
    }

    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// A catalog entry whose name matched the search keyword
#[derive(Debug, Clone)]
pub struct KeywordMatch {
    pub name: String,
    pub url: String,
    /// `None` when the product's variants couldn't be fetched
    pub variants: Option<Vec<ProductVariant>>,
}

fn spinner(show: bool, message: String) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Some(pb)
}

/// Fetch the storefront's product sitemap and build its catalog.
///
/// Fetch and body read failures are returned; malformed XML follows
/// `options.policy`.
pub async fn run_pipeline(
    fetcher: &SitemapFetcher,
    options: &PipelineOptions,
) -> Result<ProductCatalog> {
    let url = sitemap_url(&options.base_url)?;
    info!("Cataloging {}", url);

    let progress = spinner(options.show_progress, format!("Fetching {}", url));
    let document = fetcher.fetch_sitemap(&url, options.policy).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let document = document?;

    let catalog = ProductCatalog::from_document(&document);
    info!(
        "{} sitemap entries, {} products cataloged",
        document.entries.len(),
        catalog.len()
    );
    Ok(catalog)
}

/// Find catalog entries matching `keyword` and look up each one's variants.
/// Variant lookups that fail are logged and leave `variants` empty.
pub async fn lookup_keyword(
    fetcher: &SitemapFetcher,
    catalog: &ProductCatalog,
    keyword: &str,
) -> Vec<KeywordMatch> {
    let mut matches = Vec::new();
    for (name, url) in catalog.matching(keyword) {
        let variants = match fetcher.fetch_variants(url).await {
            Ok(variants) => Some(variants),
            Err(e) => {
                warn!("Unable to get variants for {}: {}", name, e);
                None
            }
        };
        matches.push(KeywordMatch {
            name: name.to_string(),
            url: url.to_string(),
            variants,
        });
    }
    matches
}
