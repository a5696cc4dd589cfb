//! kbcrawl command-line entry point
//!
//! Runs one crawl job, logs its progress and prints the final job snapshot
//! as JSON. Ctrl-C stops the job after the page in flight.

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};
use std::time::Duration;

use kbcrawl::config::EngineSettings;
use kbcrawl::registry::JobStatus;
use kbcrawl::service::{CrawlRequest, CrawlService};
use kbcrawl::utils::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(
    name = "kbcrawl",
    version,
    about = "Crawl a site breadth-first and screen every page for a knowledge base"
)]
struct Cli {
    /// Seed URL; `https://` is assumed when no scheme is given
    seed_url: String,

    /// Link hops to follow from the seed
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u8,

    /// Maximum number of pages to process
    #[arg(long, default_value_t = DEFAULT_MAX_URLS)]
    max_urls: usize,

    /// Only follow URLs matching one of these patterns (substring or regex)
    #[arg(long = "include")]
    include: Vec<String>,

    /// Never follow URLs matching any of these patterns (substring or regex)
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Follow links to other hosts too
    #[arg(long, default_value_t = false)]
    all_domains: bool,

    /// Milliseconds between two requests
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper", log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();

    let settings =
        EngineSettings::default().with_request_interval(Duration::from_millis(cli.interval_ms));
    let service = CrawlService::from_env(settings).context("Failed to initialize crawler")?;

    let request = CrawlRequest {
        url: cli.seed_url,
        max_depth: cli.depth,
        max_urls: cli.max_urls,
        same_domain_only: !cli.all_domains,
        include_patterns: cli.include,
        exclude_patterns: cli.exclude,
    };
    let sweeper = service.start_retention_sweep();
    let job_id = service.start_crawl(request).context("Invalid crawl request")?;
    info!("Started job {job_id}");

    let stopper = service.clone();
    let stop_id = job_id.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping job {stop_id}");
            if let Err(e) = stopper.stop_job(&stop_id) {
                warn!("Failed to stop job {stop_id}: {e}");
            }
        }
    });

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut last_processed = 0;
    let job = loop {
        ticker.tick().await;
        let job = service.get_job(&job_id)?;
        if job.status.is_terminal() {
            break job;
        }
        if job.pages_processed() != last_processed {
            last_processed = job.pages_processed();
            info!(
                "{} scraped, {} failed, {} pending, {} found",
                job.urls_scraped, job.urls_failed, job.urls_pending, job.urls_found
            );
        }
    };

    sweeper.abort();
    println!("{}", serde_json::to_string_pretty(&job)?);

    if job.status == JobStatus::Failed {
        bail!(
            "Crawl failed: {}",
            job.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
