// Repeated catalog refreshes with change detection

use crate::catalog::{CatalogChange, ProductCatalog};
use crate::pipeline::{PipelineOptions, run_pipeline};
use pulse_scanner::ScanError;
use pulse_scanner::fetcher::SitemapFetcher;
use tracing::{debug, warn};

/// Result of one refresh
#[derive(Debug)]
pub enum PassOutcome {
    /// A new catalog was built; `changes` lists what differs from the previous one
    Refreshed { changes: Vec<CatalogChange> },
    /// The refresh failed and the previous catalog is kept
    Stale { error: ScanError },
}

/// Holds the last good catalog between passes.
pub struct CatalogWatcher {
    fetcher: SitemapFetcher,
    options: PipelineOptions,
    catalog: ProductCatalog,
    passes: usize,
}

impl CatalogWatcher {
    /// Build the initial catalog. Failing here is fatal, unlike later passes.
    pub async fn start(
        fetcher: SitemapFetcher,
        options: PipelineOptions,
    ) -> pulse_scanner::error::Result<Self> {
        let catalog = run_pipeline(&fetcher, &options).await?;
        Ok(Self {
            fetcher,
            options,
            catalog,
            passes: 0,
        })
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn fetcher(&self) -> &SitemapFetcher {
        &self.fetcher
    }

    /// Refreshes completed so far, stale ones included
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub async fn refresh(&mut self) -> PassOutcome {
        self.passes += 1;
        match run_pipeline(&self.fetcher, &self.options).await {
            Ok(updated) => {
                let changes = self.catalog.diff(&updated);
                debug!("Pass {}: {} changes", self.passes, changes.len());
                self.catalog = updated;
                PassOutcome::Refreshed { changes }
            }
            Err(error) => {
                warn!(
                    "Giving up on updating catalog, using stale version this pass: {}",
                    error
                );
                PassOutcome::Stale { error }
            }
        }
    }
}
