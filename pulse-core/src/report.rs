// Report rendering for catalogs, watch passes and keyword matches

use crate::catalog::{CatalogChange, ChangeKind, ProductCatalog};
use crate::watch::PassOutcome;
use pulse_scanner::product::ProductVariant;
use serde::Serialize;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format: {}", other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct CatalogReport<'a> {
    items: &'a ProductCatalog,
    count: usize,
}

/// Render the catalog followed by its item count.
pub fn generate_catalog_report(catalog: &ProductCatalog, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => generate_text_report(catalog),
        ReportFormat::Json => generate_json_report(catalog),
    }
}

pub fn generate_text_report(catalog: &ProductCatalog) -> String {
    let mut report = String::new();
    for (name, url) in catalog.iter() {
        report.push_str(&format!("{} :: {}\n", name, url));
    }
    report.push_str(&format!("{} items cataloged\n", catalog.len()));
    report
}

pub fn generate_json_report(catalog: &ProductCatalog) -> String {
    let report = CatalogReport {
        items: catalog,
        count: catalog.len(),
    };
    // String keys and values only, serialization can't fail
    let mut json = serde_json::to_string_pretty(&report).unwrap_or_default();
    json.push('\n');
    json
}

/// Header line printed at the start of every watch pass
pub fn format_pass_summary(timestamp: &str, count: usize) -> String {
    format!("{} :: {} products cataloged...", timestamp, count)
}

pub fn format_change(timestamp: &str, change: &CatalogChange) -> String {
    let what = match change.kind {
        ChangeKind::Added => "item was ADDED",
        ChangeKind::Removed => "item was REMOVED",
        ChangeKind::Updated => "url was UPDATED",
    };
    format!(
        "[!] {} :: [{}] {} -> {}",
        timestamp, change.name, what, change.url
    )
}

pub fn generate_change_report(timestamp: &str, changes: &[CatalogChange]) -> String {
    let mut report = String::new();
    for change in changes {
        report.push_str(&format_change(timestamp, change));
        report.push('\n');
    }
    report
}

/// Stdout lines for one watch pass: the summary, then any changes.
///
/// A stale pass still reports the count of the catalog it kept.
pub fn generate_pass_report(timestamp: &str, count: usize, outcome: &PassOutcome) -> String {
    let mut report = format_pass_summary(timestamp, count);
    report.push('\n');
    if let PassOutcome::Refreshed { changes } = outcome {
        report.push_str(&generate_change_report(timestamp, changes));
    }
    report
}

pub fn format_match(name: &str, url: &str) -> String {
    format!("[!] Match - {} - {}", name, url)
}

/// One tab-indented line per variant, then a blank line
pub fn generate_variant_report(variants: &[ProductVariant], base: &Url) -> String {
    let mut report = String::new();
    for variant in variants {
        report.push_str(&format!("\t{} :: {}\n", variant.title, variant.cart_url(base)));
    }
    report.push('\n');
    report
}
