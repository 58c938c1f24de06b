//! CLI command handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use crate::config::{ServerConfig, DEFAULT_BIND, DEFAULT_DATA_PATH};
use crate::logging;
use crate::parsers::{SalesCsvParser, SourceParser};
use crate::server;
use crate::services::InsightsService;
use crate::types::{Dataset, HealthStatus};

const DEFAULT_HEALTHCHECK_URL: &str = "http://127.0.0.1:8000";

/// Revenue, growth and churn KPIs over a static sales table
#[derive(Parser)]
#[command(name = "mos-insights")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Sales CSV with date,revenue,region,customers,churned columns
    #[arg(long, global = true, env = "MOS_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Address to listen on
    #[arg(long, global = true, env = "MOS_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Production frontend origin added to the CORS allow-list
    #[arg(long, global = true, env = "FRONTEND_ORIGIN")]
    frontend_origin: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "MOS_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Print the KPI summary as JSON
    Kpis,

    /// Print revenue by month as JSON
    Monthly,

    /// Print revenue by region as JSON
    Region,

    /// Print the daily customer trend as JSON
    Trend,

    /// Print the health payload for the dataset as JSON
    Health,

    /// Probe a running server's /api/health; exits non-zero unless it reports ok
    Healthcheck {
        /// Base URL of the server
        #[arg(long, env = "MOS_HEALTHCHECK_URL", default_value = DEFAULT_HEALTHCHECK_URL)]
        url: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        logging::init_tracing(self.log_json);

        match self.command {
            None | Some(Commands::Serve) => self.run_serve(),
            Some(Commands::Kpis) => print_json(&self.insights()?.kpis()),
            Some(Commands::Monthly) => print_json(&self.insights()?.revenue_by_month()),
            Some(Commands::Region) => print_json(&self.insights()?.revenue_by_region()),
            Some(Commands::Trend) => print_json(&self.insights()?.customer_trend()),
            Some(Commands::Health) => print_json(&self.insights()?.health()),
            Some(Commands::Healthcheck { ref url, timeout }) => {
                run_healthcheck(url, Duration::from_secs(timeout))
            }
        }
    }

    fn insights(&self) -> anyhow::Result<InsightsService> {
        Ok(InsightsService::new(load_dataset(&self.data)?))
    }

    fn run_serve(&self) -> anyhow::Result<()> {
        let config = ServerConfig::new(
            &self.bind,
            self.data.clone(),
            self.frontend_origin.as_deref(),
            self.log_json,
        )?;

        // A dataset that fails to load means the server never binds
        let dataset = load_dataset(&config.data_path).inspect_err(|e| {
            error!(path = %config.data_path.display(), "dataset load failed: {:#}", e);
        })?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;
        runtime.block_on(server::run(&config, InsightsService::new(dataset)))?;
        Ok(())
    }
}

/// Load the sales table once. Any missing or malformed input is an error.
fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let parser = SalesCsvParser::new();
    let dataset = parser
        .load(path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    info!(
        parser = parser.name(),
        path = %path.display(),
        records = dataset.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_healthcheck(base_url: &str, timeout: Duration) -> anyhow::Result<()> {
    let endpoint = format!("{}/api/health", base_url.trim_end_matches('/'));
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;

    let health: HealthStatus = client
        .get(&endpoint)
        .send()
        .with_context(|| format!("request to {} failed", endpoint))?
        .error_for_status()?
        .json()
        .with_context(|| format!("unexpected health payload from {}", endpoint))?;

    if !health.is_ok() {
        bail!("{} reported status '{}'", endpoint, health.status);
    }
    print_json(&health)
}
