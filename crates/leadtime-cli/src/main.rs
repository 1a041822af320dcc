//! Lead-time deriver CLI
//!
//! The `leadtime` command computes lead-time recommendations from CSV
//! snapshots of the warehouse tables.
//!
//! ## Commands
//!
//! - `recommend`: Recommend in-stock / out-of-stock minimum lead times
//! - `performance`: Report fulfillment performance per variant
//! - `business-days`: Count business days between two dates
//! - `config`: Print the effective configuration

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use leadtime_core::{
    business_days_between, fulfillment_performance, run_recommendations, write_performance,
    write_recommendations, write_run_artifact, LeadTimeConfig, OutputFormat, Snapshot,
    SnapshotPaths,
};

#[derive(Parser)]
#[command(name = "leadtime")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Derive variant lead times from shipment history", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// TOML config file (defaults apply to absent keys)
    #[arg(short, long, global = true, env = "LEADTIME_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend minimum lead times per variant
    Recommend {
        /// Shipment history CSV
        #[arg(long)]
        shipments: PathBuf,

        /// Current variant settings CSV
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Warehouse stock CSV
        #[arg(long)]
        stock: Option<PathBuf>,

        /// Last day of the trailing window (default: today, UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Override the trailing window in days
        #[arg(long)]
        window_days: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the digest-sealed run artifact
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,
    },

    /// Report shipment counts and average business days per fulfillment source
    Performance {
        /// Shipment history CSV
        #[arg(long)]
        shipments: PathBuf,

        /// Last day of the trailing window (default: today, UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Override the trailing window in days
        #[arg(long)]
        window_days: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count business days in (start, end]
    BusinessDays {
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    leadtime_core::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Recommend {
            shipments,
            settings,
            stock,
            as_of,
            window_days,
            format,
            output,
            artifacts_dir,
        } => {
            let config = match window_days {
                Some(days) => with_window(config.with_sales_history_window(days))?,
                None => config,
            };
            let paths = SnapshotPaths {
                shipments,
                settings,
                stock,
            };
            cmd_recommend(
                &config,
                &paths,
                as_of.unwrap_or_else(today),
                format.into(),
                output.as_deref(),
                artifacts_dir.as_deref(),
            )
        }
        Commands::Performance {
            shipments,
            as_of,
            window_days,
            format,
            output,
        } => {
            let config = match window_days {
                Some(days) => with_window(config.with_performance_window(days))?,
                None => config,
            };
            cmd_performance(
                &config,
                &shipments,
                as_of.unwrap_or_else(today),
                format.into(),
                output.as_deref(),
            )
        }
        Commands::BusinessDays { start, end } => cmd_business_days(start, end),
        Commands::Config => cmd_config(&config),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn load_config(path: Option<&Path>) -> Result<LeadTimeConfig> {
    match path {
        Some(path) => LeadTimeConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(LeadTimeConfig::default()),
    }
}

fn with_window(config: LeadTimeConfig) -> Result<LeadTimeConfig> {
    config.validate().context("Invalid --window-days")?;
    Ok(config)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn cmd_recommend(
    config: &LeadTimeConfig,
    paths: &SnapshotPaths,
    as_of: NaiveDate,
    format: OutputFormat,
    output: Option<&Path>,
    artifacts_dir: Option<&Path>,
) -> Result<()> {
    let snapshot = Snapshot::load(paths).context("Failed to load snapshot")?;
    let artifact = run_recommendations(config, &snapshot, as_of);

    let mut writer = open_output(output)?;
    write_recommendations(&mut writer, &artifact.run.recommendations, format)
        .context("Failed to write recommendations")?;
    writer.flush()?;

    if let Some(dir) = artifacts_dir {
        let path = write_run_artifact(&artifact, dir).context("Failed to write run artifact")?;
        info!(run_id = %artifact.run_id, path = %path.display(), "run artifact written");
    }

    info!(
        recommendations = artifact.run.recommendations.len(),
        below_minimum = artifact.run.below_minimum_orders.len(),
        unchanged = artifact.run.unchanged_skipped,
        rejected = artifact.run.data_quality.len(),
        "recommend complete"
    );
    Ok(())
}

fn cmd_performance(
    config: &LeadTimeConfig,
    shipments: &Path,
    as_of: NaiveDate,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let records = leadtime_core::loader::load_shipments_file(shipments)
        .with_context(|| format!("Failed to load shipments from {:?}", shipments))?;
    let report = fulfillment_performance(config, &records, as_of);

    let mut writer = open_output(output)?;
    write_performance(&mut writer, &report.rows, format)
        .context("Failed to write performance report")?;
    writer.flush()?;

    info!(
        variants = report.rows.len(),
        rejected = report.data_quality.len(),
        "performance complete"
    );
    Ok(())
}

fn cmd_business_days(start: NaiveDate, end: NaiveDate) -> Result<()> {
    let days = business_days_between(start, end)?;
    println!("{}", days);
    Ok(())
}

fn cmd_config(config: &LeadTimeConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
