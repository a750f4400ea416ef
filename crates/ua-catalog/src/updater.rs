//! Run orchestration: resolve, fetch, classify, and write, one family at a time.

use std::path::PathBuf;

use crate::browser::BrowserFamily;
use crate::config::UpdaterConfig;
use crate::fetcher::CatalogFetcher;
use crate::parser::{UserAgentParser, WootheeParser};
use crate::pipeline::{Accumulator, Pipeline};
use crate::resolver::VersionResolver;
use crate::types::{CatalogResult, ClassifiedRecord};
use crate::writer::OutputWriter;

/// Default number of user agents requested per family.
pub const DEFAULT_LIMIT: usize = 100;

/// One family to update, with an optional caller-supplied version floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilyRequest {
    pub family: BrowserFamily,
    pub version: Option<f64>,
    /// When set, keep only versions in `[floor - lag, floor]` and at most `limit` records.
    pub max_version_lag: Option<f64>,
}

impl FamilyRequest {
    pub fn new(family: BrowserFamily) -> Self {
        Self {
            family,
            version: None,
            max_version_lag: None,
        }
    }
}

/// What a single run should fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub families: Vec<FamilyRequest>,
    pub limit: usize,
}

impl RunPlan {
    /// Plan for `families`, falling back to [`BrowserFamily::DEFAULT`] when empty.
    pub fn new(families: Vec<BrowserFamily>, limit: usize) -> Self {
        let families = if families.is_empty() {
            vec![BrowserFamily::DEFAULT]
        } else {
            families
        };
        Self {
            families: families.into_iter().map(FamilyRequest::new).collect(),
            limit,
        }
    }

    /// Use the same explicit floor for every family.
    pub fn with_version(mut self, version: Option<f64>) -> Self {
        for request in &mut self.families {
            request.version = version;
        }
        self
    }

    /// Assign lags to families in order, cycling when there are fewer lags than families.
    pub fn with_max_version_lags(mut self, lags: &[f64]) -> Self {
        if lags.is_empty() {
            return self;
        }
        for (request, lag) in self.families.iter_mut().zip(lags.iter().cycle()) {
            request.max_version_lag = Some(*lag);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilySummary {
    pub family: BrowserFamily,
    pub floor: f64,
    /// Raw strings returned by the catalog fetch.
    pub fetched: usize,
    /// Records appended to the accumulator.
    pub accepted: usize,
    /// Strings that failed classification.
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub families: Vec<FamilySummary>,
    pub output: PathBuf,
    /// Lines written to `output`; zero means the file was not touched.
    pub written: usize,
}

/// Drives one batch run across the requested families.
pub struct UserAgentUpdater<P = WootheeParser> {
    config: UpdaterConfig,
    resolver: VersionResolver,
    fetcher: CatalogFetcher,
    pipeline: Pipeline<P>,
    writer: OutputWriter,
}

impl UserAgentUpdater<WootheeParser> {
    pub fn new(config: UpdaterConfig) -> CatalogResult<Self> {
        Self::with_parser(config, WootheeParser)
    }
}

impl<P: UserAgentParser> UserAgentUpdater<P> {
    /// Validates the output folder before anything else.
    pub fn with_parser(config: UpdaterConfig, parser: P) -> CatalogResult<Self> {
        let writer = OutputWriter::new(&config.output_folder, &config.output_name)?
            .with_mode(config.write_mode)
            .with_unique(config.unique);
        let client = config.http_client()?;

        Ok(Self {
            resolver: VersionResolver::new(client.clone(), config.version_url.clone()),
            fetcher: CatalogFetcher::new(client, config.catalog_url.clone()),
            pipeline: Pipeline::with_parser(parser),
            writer,
            config,
        })
    }

    pub fn pipeline(&self) -> &Pipeline<P> {
        &self.pipeline
    }

    /// Fetch and classify one family, appending accepted records to `accumulator`.
    pub async fn update_family(
        &self,
        request: FamilyRequest,
        limit: usize,
        accumulator: &mut Accumulator,
    ) -> CatalogResult<FamilySummary> {
        let family = request.family;
        let floor = self.resolver.resolve(family, request.version).await;
        tracing::info!("{family}: version floor {floor}");

        let raw = self.fetcher.fetch(family, floor, limit, &self.pipeline).await?;

        let (accepted, dropped) = match request.max_version_lag {
            None => {
                let batch = self.pipeline.process(&raw, Some(&mut *accumulator));
                (batch.records.len(), batch.dropped)
            }
            Some(lag) => {
                let batch = self.pipeline.process(&raw, None);
                let windowed = within_window(batch.records, family, floor, lag, limit);
                let accepted = windowed.len();
                accumulator.extend(windowed);
                (accepted, batch.dropped)
            }
        };

        tracing::info!(
            "{family}: fetched {}, accepted {accepted}, dropped {dropped}",
            raw.len()
        );

        Ok(FamilySummary {
            family,
            floor,
            fetched: raw.len(),
            accepted,
            dropped,
        })
    }

    /// Process every family in order, then flush the accumulated records once.
    ///
    /// A failed fetch aborts the run before anything is written.
    pub async fn run(&self, plan: &RunPlan) -> CatalogResult<RunSummary> {
        let mut accumulator = Accumulator::new();
        let mut families = Vec::with_capacity(plan.families.len());

        for (i, request) in plan.families.iter().enumerate() {
            if i > 0 && !self.config.family_delay.is_zero() {
                tokio::time::sleep(self.config.family_delay).await;
            }
            let summary = self
                .update_family(*request, plan.limit, &mut accumulator)
                .await?;
            families.push(summary);
        }

        let written = self.writer.write(&accumulator)?;

        Ok(RunSummary {
            families,
            output: self.writer.path().to_path_buf(),
            written,
        })
    }
}

/// Keep records of `family` with versions in `[floor - lag, floor]`, at most `limit`.
pub fn within_window(
    records: Vec<ClassifiedRecord>,
    family: BrowserFamily,
    floor: f64,
    lag: f64,
    limit: usize,
) -> Vec<ClassifiedRecord> {
    records
        .into_iter()
        .filter(|r| r.browser == family.as_str() && r.version >= floor - lag && r.version <= floor)
        .take(limit)
        .collect()
}
