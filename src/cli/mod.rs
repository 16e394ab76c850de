//! Command-line surface: `worker discover/process/full/continuous/reprocess/
//! retry-failed/stats`. Grounded on the teacher's `cli/commands.rs`
//! `#[derive(Parser)]`/`#[derive(Subcommand)]`/`is_verbose()`/`run()` idiom,
//! trimmed to the six modes this pipeline actually has and wired into
//! `Supervisor` instead of the teacher's document-store commands.

use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;

use crate::config::Config;
use crate::repository::{migrations, PgPool, Store};
use crate::scrapers::{known_type_codes, DiscoveryConfig, HttpClient};
use crate::services::{Processor, ProcessorConfig};
use crate::storage::ObjectStorage;
use crate::supervisor::{ContinuousOptions, Supervisor};

/// Check if verbose mode is enabled (read before clap parses, so the
/// tracing subscriber's default filter can be chosen early).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Parser)]
#[command(name = "worker")]
#[command(about = "Ingestion pipeline for Indonesian legal regulations")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl listing pages and enqueue pending jobs, without downloading
    Discover {
        /// Comma-separated regulation type codes (default: all known types)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// Maximum listing pages to crawl per type (default: unlimited)
        #[arg(long)]
        max_pages: Option<u32>,
        /// Skip a listing page if crawled within this many hours
        #[arg(long, default_value = "24")]
        freshness_hours: i64,
        /// Crawl every listing page regardless of freshness cache
        #[arg(long)]
        ignore_freshness: bool,
        /// Report what would be discovered without writing jobs
        #[arg(long)]
        dry_run: bool,
    },

    /// Claim and drain one batch of pending jobs
    Process {
        /// Only claim jobs for this source id (default: the configured source)
        #[arg(long)]
        source: Option<String>,
        /// Maximum jobs to claim in this batch
        #[arg(long, default_value = "20")]
        batch_size: i64,
        /// Stop claiming new jobs after this many seconds
        #[arg(long, default_value = "1500")]
        max_runtime: u64,
    },

    /// One discovery pass followed by one process batch
    Full {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long, default_value = "5")]
        max_pages: u32,
        #[arg(long, default_value = "20")]
        batch_size: i64,
        #[arg(long, default_value = "1500")]
        max_runtime: u64,
    },

    /// Run discovery and processing in a loop until killed
    Continuous {
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long)]
        max_pages: Option<u32>,
        #[arg(long, default_value = "100")]
        batch_size: i64,
        #[arg(long, default_value = "3600")]
        max_runtime: u64,
        #[arg(long, default_value = "10")]
        sleep: u64,
        #[arg(long, default_value = "5")]
        discover_interval: u64,
        /// Run periodic discovery passes (default: on)
        #[arg(long, default_value_t = true, overrides_with = "no_discover")]
        discover: bool,
        /// Disable periodic discovery passes, process-only
        #[arg(long = "no-discover", action = clap::ArgAction::SetTrue, overrides_with = "discover")]
        no_discover: bool,
        /// Run a discovery pass (ignoring freshness) before the first batch
        #[arg(long)]
        discovery_first: bool,
        #[arg(long, default_value = "24")]
        freshness_hours: i64,
    },

    /// Re-extract already-loaded jobs with a newer extraction version
    Reprocess {
        /// Re-extract every loaded job regardless of extraction version
        #[arg(long)]
        force: bool,
        #[arg(long, default_value = "50")]
        batch_size: i64,
    },

    /// Reset failed jobs back to pending so they are retried
    RetryFailed {
        /// Only reset jobs whose error message contains this substring
        #[arg(long)]
        error_like: Option<String>,
        /// Reset at most this many jobs
        #[arg(long)]
        limit: Option<u64>,
        /// Report how many jobs would be reset without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print job-status counts, totals, and recent run history
    Stats,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    migrations::run_migrations(&config.database_url, false).await?;

    let pool = PgPool::new(&config.database_url, 10)?;
    let store = Store::new(pool);

    let http = HttpClient::new(config.pdf_timeout(), config.request_delay(), config.allow_insecure_ssl);

    let storage = match (&config.supabase_url, &config.supabase_key) {
        (Some(url), Some(key)) => Some(ObjectStorage::new(url.clone(), key.clone())),
        _ => None,
    };

    let processor_config = ProcessorConfig {
        cache_dir: config.pdf_cache_dir.clone(),
        request_delay: config.request_delay(),
        ..ProcessorConfig::default()
    };
    let processor = Processor::new(http.clone(), store.clone(), storage, processor_config);

    let supervisor = Supervisor::new(http, store, processor, config.source_id.clone());

    match cli.command {
        Commands::Discover {
            types,
            max_pages,
            freshness_hours,
            ignore_freshness,
            dry_run,
        } => {
            let types = resolve_types(types);
            let discovery_config = DiscoveryConfig {
                freshness_hours,
                ignore_freshness,
                max_pages_per_type: max_pages,
                dry_run,
                delay_between_pages: Duration::from_secs(1),
            };
            let stats = supervisor.discover(&types, discovery_config).await?;
            println!(
                "{} {} types crawled, {} pages, {} discovered, {} upserted",
                style("discover:").bold(),
                stats.types_crawled,
                stats.pages_crawled,
                stats.discovered,
                stats.upserted,
            );
        }

        Commands::Process {
            source,
            batch_size,
            max_runtime,
        } => {
            let _ = source;
            let stats = supervisor.process(batch_size, Duration::from_secs(max_runtime)).await?;
            print_batch_stats("process", &stats);
        }

        Commands::Full {
            types,
            max_pages,
            batch_size,
            max_runtime,
        } => {
            let types = resolve_types(types);
            let discovery_config = DiscoveryConfig {
                max_pages_per_type: Some(max_pages),
                ..DiscoveryConfig::default()
            };
            let (discovery_stats, batch_stats) = supervisor
                .full(&types, discovery_config, batch_size, Duration::from_secs(max_runtime))
                .await?;
            println!(
                "{} {} discovered, {} upserted",
                style("discover:").bold(),
                discovery_stats.discovered,
                discovery_stats.upserted,
            );
            print_batch_stats("process", &batch_stats);
        }

        Commands::Continuous {
            types,
            max_pages,
            batch_size,
            max_runtime,
            sleep,
            discover_interval,
            discover,
            no_discover,
            discovery_first,
            freshness_hours,
        } => {
            println!("{} running until killed (ctrl-c to stop)", style("continuous:").bold());
            supervisor
                .continuous(ContinuousOptions {
                    types: resolve_types(types),
                    max_pages_per_type: max_pages,
                    batch_size,
                    max_runtime: Duration::from_secs(max_runtime),
                    sleep: Duration::from_secs(sleep),
                    discover_interval,
                    discover: discover && !no_discover,
                    discovery_first,
                    freshness_hours,
                })
                .await?;
        }

        Commands::Reprocess { force, batch_size } => {
            let stats = supervisor.reprocess(batch_size, force).await?;
            print_batch_stats("reprocess", &stats);
        }

        Commands::RetryFailed { error_like, limit, dry_run } => {
            let count = supervisor.retry_failed(error_like.as_deref(), limit, dry_run).await?;
            if dry_run {
                println!("{} would reset {count} job(s)", style("retry-failed (dry-run):").bold());
            } else {
                println!("{} reset {count} job(s) to pending", style("retry-failed:").bold());
            }
        }

        Commands::Stats => {
            let stats = supervisor.stats().await?;
            println!("{}", style("jobs by status:").bold());
            for (status, count) in &stats.jobs_by_status {
                println!("  {status:<12} {count}");
            }
            println!("{} {}", style("total works:").bold(), stats.total_works);
            println!("{} {}", style("total chunks:").bold(), stats.total_chunks);
            println!("{}", style("recent runs:").bold());
            for run in &stats.recent_runs {
                println!(
                    "  #{:<5} {:<10} processed={} succeeded={} failed={}",
                    run.id.unwrap_or(0),
                    run.status,
                    run.jobs_processed,
                    run.jobs_succeeded,
                    run.jobs_failed,
                );
            }
        }
    }

    Ok(())
}

/// An empty `--types` list means "every type with a listing page".
fn resolve_types(types: Vec<String>) -> Vec<String> {
    if types.is_empty() {
        known_type_codes()
    } else {
        types
    }
}

fn print_batch_stats(label: &str, stats: &crate::services::BatchStats) {
    println!(
        "{} processed={} succeeded={} failed={}",
        style(format!("{label}:")).bold(),
        stats.processed,
        stats.succeeded,
        stats.failed,
    );
}
