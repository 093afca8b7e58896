pub mod error;
pub mod fetcher;
pub mod product;
pub mod sitemap;

pub use error::ScanError;
pub use fetcher::{SitemapFetcher, normalize_base_url, sitemap_url};
pub use product::{ProductDetail, ProductVariant};
pub use sitemap::{DecodePolicy, ImageEntry, SitemapDocument, UrlEntry, decode_sitemap};
