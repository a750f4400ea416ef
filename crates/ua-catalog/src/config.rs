//! Runtime configuration for an update run.

use std::path::PathBuf;
use std::time::Duration;

use crate::types::{CatalogError, CatalogResult};

pub const DEFAULT_CATALOG_URL: &str = "https://user-agents.net/download";
pub const DEFAULT_VERSION_URL: &str = "https://www.browsers.fyi/api/";
pub const DEFAULT_OUTPUT_NAME: &str = "browsers.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DELAY_SECS: u64 = 5;

/// How the output file is opened when records are flushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
}

#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Catalog service download endpoint (form POST, JSON array response).
    pub catalog_url: String,
    /// Version-lookup endpoint (GET, JSON object keyed by family).
    pub version_url: String,
    /// Per-request timeout; exceeding it fails the request.
    pub timeout: Duration,
    /// Directory the output file is written into.
    pub output_folder: PathBuf,
    pub output_name: String,
    pub write_mode: WriteMode,
    /// Skip records whose user agent was already written in the same flush.
    pub unique: bool,
    /// Pause between consecutive families.
    pub family_delay: Duration,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            version_url: DEFAULT_VERSION_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_folder: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            write_mode: WriteMode::Overwrite,
            unique: false,
            family_delay: Duration::from_secs(DEFAULT_DELAY_SECS),
        }
    }
}

impl UpdaterConfig {
    /// Defaults overlaid with `UA_CATALOG_URL`, `UA_VERSION_URL`,
    /// `UA_CATALOG_TIMEOUT_SECS` and `UA_CATALOG_DELAY_SECS`.
    ///
    /// Unparseable numbers fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("UA_CATALOG_URL") {
            config.catalog_url = url;
        }
        if let Ok(url) = std::env::var("UA_VERSION_URL") {
            config.version_url = url;
        }
        if let Some(secs) = env_secs("UA_CATALOG_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_secs("UA_CATALOG_DELAY_SECS") {
            config.family_delay = Duration::from_secs(secs);
        }

        config
    }

    /// HTTP client shared by the resolver and the fetcher.
    pub fn http_client(&self) -> CatalogResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CatalogError::Configuration(format!("HTTP client: {e}")))
    }
}

fn env_secs(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
