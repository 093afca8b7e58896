pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod watch;

pub use catalog::{CatalogChange, ChangeKind, ProductCatalog};
pub use pipeline::{KeywordMatch, PipelineOptions, lookup_keyword, run_pipeline};
pub use report::ReportFormat;
pub use watch::{CatalogWatcher, PassOutcome};
