//! Swimmer-Crawler main entry point
//!
//! This is the command-line interface for the swimmer profile crawler.

use clap::Parser;
use std::path::{Path, PathBuf};
use swimmer_crawler::config::{read_config, validate, Config};
use swimmer_crawler::crawler::Coordinator;
use swimmer_crawler::output::{print_statistics, JsonOutputHandler, SNAPSHOT_PREFIX};
use swimmer_crawler::url::ProfileUrlTemplate;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Swimmer-Crawler: bounded-range swimmer profile crawler
///
/// Fetches every profile page in an identifier range, extracts identity
/// attributes and competition history, and saves the dataset as JSON after
/// every batch.
#[derive(Parser, Debug)]
#[command(name = "swimmer-crawler")]
#[command(version)]
#[command(about = "Swimmer profile crawler", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Starting swimmer ID (default: 0)
    #[arg(long)]
    start_id: Option<u64>,

    /// Ending swimmer ID, inclusive (default: 4136)
    #[arg(long)]
    end_id: Option<u64>,

    /// Number of swimmers to fetch concurrently per batch (default: 10)
    #[arg(long)]
    batch_size: Option<u64>,

    /// Pause between batches in milliseconds (default: 1000)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Directory to save output files (default: data)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of file or default configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(start_id) = self.start_id {
            config.crawler.start_id = start_id;
        }
        if let Some(end_id) = self.end_id {
            config.crawler.end_id = end_id;
        }
        if let Some(batch_size) = self.batch_size {
            config.crawler.batch_size = batch_size;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawler.batch_delay_ms = delay_ms;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.output_dir = output_dir.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.output.log_file = Some(log_file.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    // Setup logging based on verbosity; keep the guard alive until exit
    let _log_guard = setup_logging(cli.verbose, cli.quiet, config.output.log_file.as_deref())?;

    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber
///
/// Console output always; a plain-text file layer as well when `log_file` is
/// set.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("swimmer_crawler=info,warn"),
            1 => EnvFilter::new("swimmer_crawler=debug,info"),
            2 => EnvFilter::new("swimmer_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| format!("log file must name a file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::new(config.clone())?;
    let plan = coordinator.plan();
    let output = JsonOutputHandler::new(&config.output.output_dir);
    let template = ProfileUrlTemplate::parse(&config.http.profile_url_template)?;

    println!("=== Swimmer-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  ID range: {}..={} ({} identifiers)",
        config.crawler.start_id,
        config.crawler.end_id,
        plan.total_ids()
    );
    println!("  Batch size: {}", config.crawler.batch_size);
    println!("  Batches: {}", plan.batch_count());
    println!("  Pause between batches: {}ms", config.crawler.batch_delay_ms);

    println!("\nHTTP:");
    println!("  First URL: {}", template.render(config.crawler.start_id));
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput:");
    println!("  Dataset: {}", output.canonical_path().display());
    println!(
        "  Snapshots: {}",
        output
            .output_dir()
            .join(format!("{}<YYYYMMDD_HHMMSS>.json", SNAPSHOT_PREFIX))
            .display()
    );
    if let Some(log_file) = &config.output.log_file {
        println!("  Log file: {}", log_file.display());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting crawl of swimmer IDs {}..={} (batch size {})",
        config.crawler.start_id,
        config.crawler.end_id,
        config.crawler.batch_size
    );

    let coordinator = Coordinator::new(config)?;

    match coordinator.run().await {
        Ok(stats) => {
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
