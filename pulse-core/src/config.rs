//! Optional `config.json` that sits next to the executable.
//!
//! ```json
//! { "slack-webhook-url": "https://hooks.slack.com/services/..." }
//! ```
//!
//! A missing file is normal. A file that can't be read or parsed is reported
//! and otherwise ignored; nothing in the catalog pipeline depends on it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseConfig {
    #[serde(rename = "slack-webhook-url", default)]
    pub slack_webhook_url: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// `config.json` in the directory holding the running executable
pub fn default_config_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Load the config at `path`. `Ok(None)` when there is no regular file there.
pub fn load_config(path: &Path) -> Result<Option<PulseConfig>, ConfigError> {
    if !path.is_file() {
        debug!("No config file at {}", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(config))
}

/// Load the config, logging problems instead of returning them.
pub fn load_config_or_default(path: Option<&Path>) -> PulseConfig {
    let Some(path) = path else {
        debug!("No config path available, using defaults");
        return PulseConfig::default();
    };

    match load_config(path) {
        Ok(Some(config)) => {
            info!("Loaded config from {}", path.display());
            if let Some(ref webhook) = config.slack_webhook_url {
                info!("Slack webhook: {}", webhook);
            }
            config
        }
        Ok(None) => PulseConfig::default(),
        Err(e) => {
            warn!("{}", e);
            PulseConfig::default()
        }
    }
}
