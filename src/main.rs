//! CLI entry point for the best-tower finder.
//!
//! Finds the tower with the highest average RSSI for a farm across all CSV
//! resources advertised by the resource-list endpoint.

use anyhow::Result;
use best_tower::{
    fetch::BasicClient,
    lister::list_resources,
    output::{render_json, render_text},
    parser::{InvalidReadingPolicy, MalformedRowPolicy, ParseOptions},
    pipeline::{DEFAULT_RESOURCE_LIST_URL, run},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "best_tower")]
#[command(about = "Find the tower with the best average RSSI in a farm", long_about = None)]
struct Cli {
    /// URL of the JSON list of CSV resources
    #[arg(long, global = true, env = "BEST_TOWER_ENDPOINT", default_value = DEFAULT_RESOURCE_LIST_URL)]
    endpoint: String,

    /// Per-request timeout in seconds (no timeout if unset)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the tower with the highest average RSSI for a farm
    Best {
        /// Farm identifier to filter rows on
        #[arg(value_name = "FARM_ID")]
        farm_id: String,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Fail a resource on an unparseable reading instead of counting it as 0.0
        #[arg(long, default_value_t = false)]
        reject_invalid_readings: bool,

        /// Skip rows without three fields instead of discarding the resource
        #[arg(long, default_value_t = false)]
        skip_malformed_rows: bool,
    },
    /// Print the CSV resource URLs served by the endpoint
    ListResources,
}

/// Default location of the JSON log file, overridable with `LOG_FILE_PATH`.
const DEFAULT_LOG_FILE: &str = "logs/best_tower.log";

/// Installs the stderr and JSON-file log layers.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_logging() -> Result<WorkerGuard> {
    let log_file = PathBuf::from(
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
    );
    let log_dir = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_name = log_file
        .file_name()
        .unwrap_or(OsStr::new("best_tower.log"));

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, log_name));

    // Human-readable progress on stderr; stdout is reserved for the report.
    let console = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_file = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(console)
        .with(json_file)
        .try_init()?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging()?;

    let cli = Cli::parse();

    let client = match cli.timeout_secs {
        Some(secs) => BasicClient::with_timeout(Duration::from_secs(secs))?,
        None => BasicClient::new(),
    };

    match cli.command {
        Commands::Best {
            farm_id,
            json,
            reject_invalid_readings,
            skip_malformed_rows,
        } => {
            let options = ParseOptions {
                malformed_rows: if skip_malformed_rows {
                    MalformedRowPolicy::SkipRow
                } else {
                    MalformedRowPolicy::DiscardResource
                },
                invalid_readings: if reject_invalid_readings {
                    InvalidReadingPolicy::Reject
                } else {
                    InvalidReadingPolicy::TreatAsZero
                },
            };

            let farm_id = farm_id.trim();
            let report = run(&client, &cli.endpoint, farm_id, &options).await?;

            if json {
                println!("{}", render_json(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        Commands::ListResources => {
            let locators = list_resources(&client, &cli.endpoint).await?;
            info!(count = locators.len(), "Resource list printed");
            for locator in &locators {
                println!("{locator}");
            }
        }
    }

    Ok(())
}
