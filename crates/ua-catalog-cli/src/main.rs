//! ua-catalog — refresh the user-agent listing from the catalog service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use ua_catalog::updater::DEFAULT_LIMIT;
use ua_catalog::{BrowserFamily, RunPlan, UpdaterConfig, UserAgentUpdater, WriteMode};

#[derive(Parser, Debug)]
#[command(
    name = "ua-catalog",
    about = "Fetch, classify, and store real-world browser user agents",
    version,
    after_help = "Supported browsers: chrome, edge, safari, firefox, opera, samsung-browser.\nWith no valid browser the run updates safari only."
)]
struct Cli {
    /// Browsers to include in the update.
    browsers: Vec<String>,

    /// Max number of user agents per browser.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Folder the output file is written into (must exist).
    #[arg(long, default_value = ".")]
    output_folder: PathBuf,

    /// Output file name.
    #[arg(long)]
    output_name: Option<String>,

    /// Minimum browser version; skips the version lookup.
    #[arg(long, value_parser = finite_number)]
    version_floor: Option<f64>,

    /// Keep only versions within this lag below the floor, one per browser
    /// (comma separated, reused in order when shorter than the browser list).
    #[arg(long, value_delimiter = ',', value_parser = finite_number)]
    max_version_lag: Vec<f64>,

    /// Seconds to wait between browsers.
    #[arg(long)]
    delay_secs: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Append to the output file instead of replacing it.
    #[arg(long)]
    append: bool,

    /// Write each user agent at most once.
    #[arg(long)]
    unique: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> UpdaterConfig {
        let mut config = UpdaterConfig::from_env();
        config.output_folder = self.output_folder.clone();
        if let Some(name) = &self.output_name {
            config.output_name = name.clone();
        }
        if let Some(secs) = self.delay_secs {
            config.family_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if self.append {
            config.write_mode = WriteMode::Append;
        }
        config.unique = self.unique;
        config
    }

    fn plan(&self) -> RunPlan {
        for token in &self.browsers {
            if token.parse::<BrowserFamily>().is_err() {
                tracing::warn!("ignoring unsupported browser {token:?}");
            }
        }
        let families = BrowserFamily::parse_tokens(&self.browsers);
        RunPlan::new(families, self.limit)
            .with_version(self.version_floor)
            .with_max_version_lags(&self.max_version_lag)
    }
}

fn finite_number(value: &str) -> Result<f64, String> {
    let number: f64 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(format!("{value:?} is not a finite number"))
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let updater = UserAgentUpdater::new(cli.config())?;
    let plan = cli.plan();
    let summary = updater.run(&plan).await?;

    for family in &summary.families {
        tracing::info!(
            "{}: floor {}, {} accepted, {} dropped",
            family.family,
            family.floor,
            family.accepted,
            family.dropped
        );
    }
    if summary.written > 0 {
        println!(
            "Wrote {} user agents to {}",
            summary.written,
            summary.output.display()
        );
    } else {
        println!("No user agents found; {} left unchanged", summary.output.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 0 = success, 1 = any failure
    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
