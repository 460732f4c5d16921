//! CLI entry point for the freight rate quoter.
//!
//! Provides subcommands for pricing a shipment, looking up a per-mile rate,
//! and validating a rate chart file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use freight_rater::{EngineConfig, QuoteError, QuoteInput, RateEngine, output::render_json};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "freight_rater")]
#[command(about = "Quote shipments from a mileage/weight rate chart", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a shipment: per-mile rate and total cost as JSON
    Quote {
        /// Distance in miles
        #[arg(long, allow_hyphen_values = true)]
        miles: String,

        /// Shipment weight in pounds
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Rate chart CSV (defaults to $RATE_CHART_PATH or ./mileage_weight_rate_chart.csv)
        #[arg(short, long)]
        chart: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the per-mile rate only
    Rate {
        /// Distance in miles
        #[arg(long, allow_hyphen_values = true)]
        miles: String,

        /// Shipment weight in pounds
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Rate chart CSV
        #[arg(short, long)]
        chart: Option<PathBuf>,
    },
    /// Parse a rate chart and print a summary of its coverage
    Check {
        /// Rate chart CSV
        #[arg(short, long)]
        chart: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = match init_tracing() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialise logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let client_fault = e
                .downcast_ref::<QuoteError>()
                .is_some_and(|qe| qe.kind().is_client_fault());
            error!(error = %e, client_fault, "Request failed");
            eprintln!("{e}");
            if client_fault {
                eprintln!("Usage: freight_rater quote --miles <number> --weight <number>");
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Quote {
            miles,
            weight,
            chart,
            pretty,
        } => {
            let input = QuoteInput::parse(&miles, &weight)?;
            let engine = engine(chart);
            let quote = engine.quote_for(&input, None)?;

            info!(
                miles = input.miles(),
                weight = input.weight(),
                per_mile_rate = quote.per_mile_rate,
                total_cost = quote.total_cost,
                "Quote computed"
            );
            println!("{}", render_json(&quote, pretty)?);
        }
        Commands::Rate {
            miles,
            weight,
            chart,
        } => {
            let input = QuoteInput::parse(&miles, &weight)?;
            let rate = engine(chart).rate_for(&input, None)?;
            println!("{rate}");
        }
        Commands::Check { chart } => {
            let engine = engine(chart);
            let summary = engine.chart(None)?.summary();

            info!(
                chart = %engine.default_chart().display(),
                rows = summary.rows,
                "Rate chart is valid"
            );
            println!("{}", render_json(&summary, true)?);
        }
    }

    Ok(())
}

fn engine(chart: Option<PathBuf>) -> RateEngine {
    let config = EngineConfig::from_env().with_chart(chart);
    RateEngine::from_config(&config)
}

/// Logging setup: colored stderr + JSON rolling log file
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/freight_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("freight_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}
