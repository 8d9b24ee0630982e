//! aio-labs demo runner
//!
//! Runs one concurrency scenario per invocation against the toolkit.
//!
//! # Architecture Overview
//!
//! ```text
//!     CLI (clap)
//!         │
//!         ▼
//!   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   config     │───▶│ observability│───▶│  root Scope  │
//!   │ TOML + valid │    │ logs/metrics │    │ + Fetcher    │
//!   └──────────────┘    └──────────────┘    └──────┬───────┘
//!                                                  │
//!                                                  ▼
//!                  ┌───────────────────────────────────────────────┐
//!                  │                  scenarios                    │
//!                  │  ops (delay, spawn, cancel)   future (cell)   │
//!                  │  wait (gather, wait, as_completed, drain)     │
//!                  │  resilience (wait_for, shield)   http (fetch) │
//!                  └───────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use aio_labs::config::{load_config, ToolkitConfig};
use aio_labs::http::{FetchOptions, Fetcher, ReqwestClient};
use aio_labs::observability::{logging, metrics};
use aio_labs::ops::timed;
use aio_labs::scenarios::{basics, requests};
use aio_labs::Scope;

#[derive(Parser)]
#[command(name = "aio-labs")]
#[command(about = "Async concurrency orchestration demos", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Length of one scenario time unit in milliseconds
    #[arg(long, default_value_t = 1000)]
    unit_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Await two coroutines one after the other
    Sequential,
    /// Do foreground work while a spawned delay runs
    SpawnOverlap,
    /// Run three delays concurrently
    Concurrent,
    /// Cancel a long task after three ticks
    Cancel,
    /// Bound a long task with a cancelling timeout
    WaitFor,
    /// Protect a task from a timeout with shield
    Shield,
    /// Resolve a manual future from a background producer
    Future,
    /// Fetch the target URL many times concurrently
    Gather {
        /// Overrides demo.request_count
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Gather a good and a malformed request
    GatherErrors,
    /// Wait for a good and a malformed request, then inspect each
    WaitErrors,
    /// Stop waiting at the first failed request
    FirstException,
    /// Fetch through a bounded window of in-flight requests
    Drain {
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
    /// Handle results in completion order under an overall deadline
    AsCompleted,
    /// Gather results in submission order
    OutOfOrder,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ToolkitConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("aio-labs v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let scope = Scope::new();
    let result = timed("main", run(cli, &config, &scope)).await;

    // Nothing outlives the scenario.
    scope.cancel_all();
    result
}

async fn run(cli: Cli, config: &ToolkitConfig, scope: &Scope) -> Result<(), Box<dyn Error>> {
    let unit = Duration::from_millis(cli.unit_ms);
    let target = config.demo.target_url.as_str();

    match cli.command {
        Commands::Sequential => {
            let (message, one_plus_one) = basics::sequential(unit).await;
            println!("{}", message);
            println!("{}", one_plus_one);
        }
        Commands::SpawnOverlap => {
            let report = basics::overlap_background_task(scope, unit).await?;
            println!("{}", report.foreground);
            println!("{:?}", report.background);
        }
        Commands::Concurrent => {
            for slept in basics::concurrent(scope, unit).await? {
                println!("slept {:?}", slept);
            }
        }
        Commands::Cancel => {
            let report = basics::cancel_long_task(scope, unit, 3).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::WaitFor => {
            let cancelled = basics::wait_for_demo(scope, unit).await;
            println!("Was the task cancelled? {}", cancelled);
        }
        Commands::Shield => {
            let report = basics::shield_demo(scope, unit, 10, 5).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Future => {
            let value = basics::futures_demo(unit).await?;
            println!("What is the result of the future? {}", value);
        }
        Commands::Gather { count } => {
            let fetcher = fetcher(config, scope)?;
            let count = count.unwrap_or(config.demo.request_count);
            let urls = vec![target.to_string(); count];

            let report = requests::gather_statuses(&fetcher, scope, &urls).await;
            println!("{}", serde_json::to_string_pretty(&report.summary)?);
            println!("Failed requests: {}", report.failed_requests());
        }
        Commands::GatherErrors => {
            let fetcher = fetcher(config, scope)?;
            let urls = vec![target.to_string(), "python://example.com".to_string()];

            let report = requests::gather_statuses(&fetcher, scope, &urls).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::WaitErrors => {
            let fetcher = fetcher(config, scope)?;
            let urls = vec![target.to_string(), "python://bad".to_string()];

            let report = requests::wait_all_with_errors(&fetcher, scope, &urls).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::FirstException => {
            let fetcher = fetcher(config, scope)?;
            let report =
                requests::first_exception(&fetcher, scope, "python://bad.com", target, unit * 3).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Drain { count } => {
            let fetcher = fetcher(config, scope)?;
            let report =
                requests::drain_statuses(&fetcher, scope, target, count, config.drain.window).await;
            println!("{}", serde_json::to_string_pretty(&report.summary())?);
            println!("Peak in flight: {}, rounds: {}", report.peak_in_flight, report.rounds);
        }
        Commands::AsCompleted => {
            let fetcher = fetcher(config, scope)?;
            let requests = vec![
                (target.to_string(), FetchOptions::new().with_timeout(unit * 15).with_delay(unit * 10)),
                (target.to_string(), FetchOptions::new().with_timeout(unit * 10).with_delay(unit * 5)),
                (target.to_string(), FetchOptions::new().with_timeout(unit * 5).with_delay(unit)),
            ];

            let report = requests::as_completed_statuses(&fetcher, scope, &requests, unit * 10).await;
            for result in &report.results {
                match result {
                    Ok(status) => println!("{}", status),
                    Err(e) if e.is_timeout() => println!("We got a timeout error!"),
                    Err(e) => println!("Request failed: {}", e),
                }
            }
            for op in &report.unfinished {
                println!("still running: {:?}", op);
            }
        }
        Commands::OutOfOrder => {
            for slept in basics::out_of_order(scope, unit).await? {
                println!("slept {:?}", slept);
            }
        }
    }

    Ok(())
}

fn fetcher(config: &ToolkitConfig, scope: &Scope) -> Result<Fetcher<ReqwestClient>, Box<dyn Error>> {
    let client = ReqwestClient::from_config(&config.http)?;
    Ok(Fetcher::new(client).with_timer(scope.timer().clone()))
}
