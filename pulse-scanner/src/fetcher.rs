use crate::error::{Result, ScanError};
use crate::product::{ProductDetail, ProductVariant};
use crate::sitemap::{DecodePolicy, SitemapDocument, decode_sitemap};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Product sitemap served by Shopify storefronts
pub const SITEMAP_PATH: &str = "sitemap_products_1.xml";

/// Range covering every product; the storefront caps it on its side
pub const SITEMAP_RANGE: [(&str, &str); 2] = [("from", "1"), ("to", "9999999999999")];

/// Turn `a7.co` or `https://us.bape.com` into a base URL, adding `http://` when no scheme is given.
pub fn normalize_base_url(base: &str) -> Result<Url> {
    let base = base.trim();
    if base.is_empty() {
        return Err(ScanError::InvalidUrl("empty base URL".to_string()));
    }

    let candidate = if base.contains("://") {
        base.to_string()
    } else {
        format!("http://{}", base)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ScanError::InvalidUrl(format!(
            "{}: expected an http(s) host",
            base
        ))),
    }
}

/// `<base>/sitemap_products_1.xml?from=1&to=9999999999999`
pub fn sitemap_url(base: &Url) -> Result<Url> {
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir.set_query(None);
    dir.set_fragment(None);

    let mut url = dir
        .join(SITEMAP_PATH)
        .map_err(|e| ScanError::InvalidUrl(format!("Invalid sitemap URL: {}", e)))?;
    url.query_pairs_mut().extend_pairs(SITEMAP_RANGE);
    Ok(url)
}

pub struct SitemapFetcher {
    client: Client,
}

impl SitemapFetcher {
    /// Default client settings, no extra headers
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the whole body. Non-2xx responses are errors.
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        info!(
            "Fetched {} bytes from {} in {:?}",
            body.len(),
            url,
            start.elapsed()
        );
        Ok(body.to_vec())
    }

    pub async fn fetch_sitemap(&self, url: &Url, policy: DecodePolicy) -> Result<SitemapDocument> {
        let body = self.fetch_bytes(url).await?;
        decode_sitemap(&body, policy)
    }

    /// Variants listed in the product's `.json` detail document
    pub async fn fetch_variants(&self, product_url: &str) -> Result<Vec<ProductVariant>> {
        let detail_url = Url::parse(&format!("{}.json", product_url.trim_end_matches('/')))
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", product_url, e)))?;
        let body = self.fetch_bytes(&detail_url).await?;
        let detail: ProductDetail = serde_json::from_slice(&body)?;
        debug!(
            "{} has {} variants",
            product_url,
            detail.product.variants.len()
        );
        Ok(detail.product.variants)
    }
}
