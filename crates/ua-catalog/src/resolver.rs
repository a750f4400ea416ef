//! Version floor resolution.
//!
//! The floor is best effort: an explicit caller value always wins, and any
//! failure to look up or coerce the current version degrades to `0.0`.

use serde_json::Value;

use crate::browser::BrowserFamily;
use crate::types::{CatalogError, CatalogResult};

/// Floor used when nothing better is known; accepts every version.
pub const NO_FLOOR: f64 = 0.0;

#[derive(Debug, Clone)]
pub struct VersionResolver {
    client: reqwest::Client,
    url: String,
}

impl VersionResolver {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Minimum acceptable version for `family`.
    ///
    /// Performs at most one request and never fails.
    pub async fn resolve(&self, family: BrowserFamily, explicit: Option<f64>) -> f64 {
        if let Some(version) = explicit {
            return version;
        }

        match self.fetch_versions().await {
            Ok(versions) => floor_from_versions(&versions, family.as_str()),
            Err(e) => {
                tracing::warn!("version lookup for {family} failed, using floor {NO_FLOOR}: {e}");
                NO_FLOOR
            }
        }
    }

    async fn fetch_versions(&self) -> CatalogResult<Value> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status,
                url: self.url.clone(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Extract the `version` of `family` from a version-service response.
pub fn floor_from_versions(versions: &Value, family: &str) -> f64 {
    let Some(version) = versions.get(family).and_then(|entry| entry.get("version")) else {
        tracing::debug!("no current version listed for {family}");
        return NO_FLOOR;
    };

    let floor = match version {
        Value::Number(n) => n.as_f64().unwrap_or(NO_FLOOR),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or_else(|e| {
            tracing::warn!("cannot read version {s:?} for {family} as a number: {e}");
            NO_FLOOR
        }),
        Value::Null => NO_FLOOR,
        other => {
            tracing::warn!("unexpected version value for {family}: {other}");
            NO_FLOOR
        }
    };

    if floor.is_finite() {
        floor
    } else {
        tracing::warn!("non-finite version {floor} for {family}, using floor {NO_FLOOR}");
        NO_FLOOR
    }
}
