pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{CatalogSettings, handle_catalog, init_logging, settings_from_matches};
