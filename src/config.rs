//! Client configuration.
//!
//! Everything that used to be process-wide state (cache location, remote endpoints, timeouts)
//! lives in [`DwdConfig`] and is handed to the client explicitly.

use crate::naming::resolver::DEFAULT_CLIMATE_ROOT;
use crate::stations::roster_store::{ColumnSpans, DEFAULT_ROSTER_COLUMNS};
use crate::utils::get_cache_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://opendata.dwd.de";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config")]
    Parse(#[from] serde_json::Error),
}

/// Settings of a [`crate::Dwd`] client. Every field has a default, so a config file only needs
/// the fields it changes.
///
/// ```
/// use dwd_opendata::DwdConfig;
///
/// let config = DwdConfig::from_json_str(r#"{ "concurrency": 4 }"#).unwrap();
/// assert_eq!(config.concurrency, 4);
/// assert_eq!(config.request_timeout_secs, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwdConfig {
    /// Root of the local cache. `None` uses the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    pub base_url: String,
    /// Path of the climate observations below `base_url`.
    pub climate_root: String,
    pub request_timeout_secs: u64,
    /// Number of stations loaded at once by collection requests. `1` is strictly sequential.
    pub concurrency: usize,
    /// Fetch the description PDF of each family next to its cached files.
    pub download_descriptions: bool,
    /// Character spans of the fixed-width roster columns.
    pub roster_columns: ColumnSpans,
}

impl Default for DwdConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            climate_root: DEFAULT_CLIMATE_ROOT.to_string(),
            request_timeout_secs: 120,
            concurrency: 1,
            download_descriptions: true,
            roster_columns: DEFAULT_ROSTER_COLUMNS,
        }
    }
}

impl DwdConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_json_str(&json)
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn resolve_cache_dir(&self) -> Result<PathBuf, std::io::Error> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_cache_dir(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Station loads in flight at once, never less than one.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
