//! Worker supervisor: the operator-facing modes that wrap discovery and
//! processing into one loop. `process`/`reprocess`/`discover` wrap
//! `process.py`'s `process_jobs` batch-with-max-runtime shape; `continuous`'s
//! discovery-first cadence, discover-interval, empty-batch sleep and
//! error-doubling backoff have no prototype counterpart (no `continuous.py`
//! or equivalent exists anywhere in the original source) and are authored
//! directly from spec 4.9's description of that mode.

use std::time::Duration;

use tracing::{error, info};

use crate::models::{RunStatus, ScraperRun};
use crate::repository::Store;
use crate::scrapers::{discover, DiscoveryConfig, DiscoveryStats, HttpClient};
use crate::services::{BatchStats, Processor};

pub struct Supervisor {
    http: HttpClient,
    store: Store,
    processor: Processor,
    source_id: String,
}

impl Supervisor {
    pub fn new(http: HttpClient, store: Store, processor: Processor, source_id: impl Into<String>) -> Self {
        Self {
            http,
            store,
            processor,
            source_id: source_id.into(),
        }
    }

    /// `worker discover`: one discovery pass across `types`.
    pub async fn discover(&self, types: &[String], config: DiscoveryConfig) -> anyhow::Result<DiscoveryStats> {
        discover(&self.http, &self.store, types, &self.source_id, &config).await
    }

    /// `worker process`: claim and drain one batch.
    pub async fn process(&self, batch_size: i64, max_runtime: Duration) -> anyhow::Result<BatchStats> {
        let run_id = self.store.create_run(&self.source_id).await?;
        let result = self.processor.process_pending(run_id, batch_size, max_runtime).await;
        self.finish_run(run_id, &result).await;
        self.seed_relationships_if_loaded(&result).await;
        result
    }

    /// `worker reprocess`: version-sweep over already-loaded jobs.
    pub async fn reprocess(&self, batch_size: i64, force: bool) -> anyhow::Result<BatchStats> {
        let run_id = self.store.create_run(&self.source_id).await?;
        let result = self.processor.reprocess(run_id, batch_size, force).await;
        self.finish_run(run_id, &result).await;
        self.seed_relationships_if_loaded(&result).await;
        result
    }

    /// Known amendment relationships only resolve once both works involved
    /// are loaded, so re-seed after any batch that loaded at least one work.
    async fn seed_relationships_if_loaded(&self, result: &anyhow::Result<BatchStats>) {
        let Ok(stats) = result else { return };
        if stats.succeeded == 0 {
            return;
        }
        if let Err(e) = crate::services::seed_known_relationships(&self.store).await {
            error!("seeding known relationships failed: {e}");
        }
    }

    /// `worker full`: one discovery pass followed by one process batch.
    pub async fn full(
        &self,
        types: &[String],
        discovery: DiscoveryConfig,
        batch_size: i64,
        max_runtime: Duration,
    ) -> anyhow::Result<(DiscoveryStats, BatchStats)> {
        let discovery_stats = self.discover(types, discovery).await?;
        let batch_stats = self.process(batch_size, max_runtime).await?;
        Ok((discovery_stats, batch_stats))
    }

    /// `worker retry-failed`: reset `failed` jobs to `pending`, optionally
    /// filtered by an error-message substring. `dry_run` only counts.
    pub async fn retry_failed(&self, error_like: Option<&str>, limit: Option<u64>, dry_run: bool) -> anyhow::Result<u64> {
        if dry_run {
            let count = self.store.count_failed_jobs(error_like).await?;
            return Ok(limit.map(|l| count.min(l)).unwrap_or(count));
        }
        self.store.retry_failed_jobs(error_like).await
    }

    /// `worker stats`: job-status histogram, total works/chunks, recent runs.
    pub async fn stats(&self) -> anyhow::Result<SupervisorStats> {
        Ok(SupervisorStats {
            jobs_by_status: self.store.job_counts_by_status().await?,
            total_works: self.store.total_works().await?,
            total_chunks: self.store.total_chunks().await?,
            recent_runs: self.store.recent_runs(10).await?,
        })
    }

    async fn finish_run(&self, run_id: i32, result: &anyhow::Result<BatchStats>) {
        let (status, error, stats) = match result {
            Ok(stats) => (RunStatus::Completed, None, *stats),
            Err(e) => (RunStatus::Failed, Some(e.to_string()), BatchStats::default()),
        };
        let _ = self
            .store
            .finalise_run(
                run_id,
                &ScraperRun {
                    id: Some(run_id),
                    source_id: self.source_id.clone(),
                    jobs_discovered: 0,
                    jobs_processed: stats.processed as i32,
                    jobs_succeeded: stats.succeeded as i32,
                    jobs_failed: stats.failed as i32,
                    status,
                    error_message: error.clone(),
                    started_at: None,
                    completed_at: None,
                },
                status,
                error.as_deref(),
            )
            .await;
    }

    /// `worker continuous`: runs until killed. Discovery-first on iteration
    /// 1 if requested, then every `discover_interval` iterations while
    /// discovery is enabled. Always claims one batch; an empty batch falls
    /// through to one reprocess batch; if that's also empty, sleeps 5x.
    /// Any unhandled error doubles the sleep for the next iteration.
    pub async fn continuous(&self, opts: ContinuousOptions) -> anyhow::Result<()> {
        let mut iteration: u64 = 0;
        let mut current_sleep = opts.sleep;

        loop {
            iteration += 1;
            let iteration_result = self.continuous_iteration(&opts, iteration).await;

            match iteration_result {
                Ok(ContinuousOutcome::BothEmpty) => {
                    current_sleep = opts.sleep;
                    tokio::time::sleep(opts.sleep * 5).await;
                }
                Ok(ContinuousOutcome::DidWork) => {
                    current_sleep = opts.sleep;
                    tokio::time::sleep(opts.sleep).await;
                }
                Err(e) => {
                    error!("continuous iteration {iteration} failed: {e}");
                    current_sleep *= 2;
                    tokio::time::sleep(current_sleep).await;
                }
            }
        }
    }

    async fn continuous_iteration(&self, opts: &ContinuousOptions, iteration: u64) -> anyhow::Result<ContinuousOutcome> {
        let run_discovery_this_iteration = opts.discover
            && ((iteration == 1 && opts.discovery_first) || iteration % opts.discover_interval == 0);

        if run_discovery_this_iteration {
            let config = DiscoveryConfig {
                freshness_hours: opts.freshness_hours,
                ignore_freshness: iteration == 1 && opts.discovery_first,
                max_pages_per_type: opts.max_pages_per_type,
                dry_run: false,
                delay_between_pages: Duration::from_secs(1),
            };
            let stats = self.discover(&opts.types, config).await?;
            info!("continuous[{iteration}]: discovered {} jobs across {} types", stats.discovered, stats.types_crawled);
        }

        let batch = self.process(opts.batch_size, opts.max_runtime).await?;
        if batch.processed > 0 {
            return Ok(ContinuousOutcome::DidWork);
        }

        let reprocess_batch = self.reprocess(opts.batch_size, false).await?;
        if reprocess_batch.processed > 0 {
            return Ok(ContinuousOutcome::DidWork);
        }

        Ok(ContinuousOutcome::BothEmpty)
    }
}

enum ContinuousOutcome {
    DidWork,
    BothEmpty,
}

pub struct ContinuousOptions {
    pub types: Vec<String>,
    pub max_pages_per_type: Option<u32>,
    pub batch_size: i64,
    pub max_runtime: Duration,
    pub sleep: Duration,
    pub discover_interval: u64,
    pub discover: bool,
    pub discovery_first: bool,
    pub freshness_hours: i64,
}

impl Default for ContinuousOptions {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            max_pages_per_type: None,
            batch_size: 100,
            max_runtime: Duration::from_secs(3600),
            sleep: Duration::from_secs(10),
            discover_interval: 5,
            discover: true,
            discovery_first: false,
            freshness_hours: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorStats {
    pub jobs_by_status: Vec<(String, i64)>,
    pub total_works: i64,
    pub total_chunks: i64,
    pub recent_runs: Vec<crate::models::ScraperRun>,
}
