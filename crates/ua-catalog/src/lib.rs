//! ua-catalog — fetch, classify, and persist real-world browser user-agent strings.
//!
//! A run resolves a version floor per browser family, downloads candidate
//! user-agent strings from the catalog service, classifies each one into a
//! [`ClassifiedRecord`] and flushes the accepted records to a JSON-lines file.

pub mod browser;
pub mod classify;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod types;
pub mod updater;
pub mod writer;

pub use browser::BrowserFamily;
pub use classify::{classify, reduce_version};
pub use config::{UpdaterConfig, WriteMode};
pub use fetcher::CatalogFetcher;
pub use parser::{UserAgentParser, WootheeParser};
pub use pipeline::{clean_user_agent, Accumulator, Batch, Pipeline};
pub use resolver::VersionResolver;
pub use types::*;
pub use updater::{FamilyRequest, FamilySummary, RunPlan, RunSummary, UserAgentUpdater};
pub use writer::OutputWriter;
