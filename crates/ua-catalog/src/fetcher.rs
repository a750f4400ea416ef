//! Catalog service client.

use crate::browser::BrowserFamily;
use crate::classify::format_version;
use crate::parser::UserAgentParser;
use crate::pipeline::Pipeline;
use crate::types::{CatalogError, CatalogResult};

/// Downloads candidate user-agent strings from the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    client: reqwest::Client,
    url: String,
}

impl CatalogFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch user agents for `family` at or above `floor`.
    ///
    /// For most families the service filters by version and caps the result
    /// at `limit`. Families that [filter locally](BrowserFamily::filters_locally)
    /// download the whole unfiltered listing instead and keep every entry that
    /// classifies as that family at or above `floor`; `limit` is ignored for them.
    ///
    /// Any transport failure or non-success status is returned as an error.
    pub async fn fetch<P: UserAgentParser>(
        &self,
        family: BrowserFamily,
        floor: f64,
        limit: usize,
        pipeline: &Pipeline<P>,
    ) -> CatalogResult<Vec<String>> {
        if family.filters_locally() {
            return self.fetch_filtered_locally(family, floor, pipeline).await;
        }

        let form = [
            ("browser", family.as_str().to_string()),
            ("version", format_version(floor)),
            ("limit", limit.to_string()),
            ("download", "json".to_string()),
        ];
        self.download(&form).await
    }

    async fn fetch_filtered_locally<P: UserAgentParser>(
        &self,
        family: BrowserFamily,
        floor: f64,
        pipeline: &Pipeline<P>,
    ) -> CatalogResult<Vec<String>> {
        let form = [
            ("browser", family.as_str().to_string()),
            ("browser_type", "browser".to_string()),
            ("download", "json".to_string()),
        ];
        let all = self.download(&form).await?;
        let batch = pipeline.process(&all, None);

        let kept: Vec<String> = batch
            .records
            .into_iter()
            .filter(|r| r.browser == family.as_str() && r.version >= floor)
            .map(|r| r.useragent)
            .collect();

        tracing::info!(
            "{family}: kept {} of {} catalog entries at or above {floor}",
            kept.len(),
            all.len()
        );
        Ok(kept)
    }

    async fn download(&self, form: &[(&str, String)]) -> CatalogResult<Vec<String>> {
        let response = self.client.post(&self.url).form(form).send().await?;
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
