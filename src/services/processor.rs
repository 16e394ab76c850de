//! Per-job processing pipeline: fetch PDF, extract, classify, correct,
//! parse, load.
//!
//! Grounded on the prototype's `process.py`: `process_jobs` (claim loop,
//! per-job try/except mapping to `failed`/`needs_ocr`), `_extract_and_load`
//! (extract -> length gate -> parse -> build law dict -> load work -> load
//! tree -> create chunks) and `reprocess_jobs` (re-run extraction from a
//! cached PDF without re-downloading).

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::models::{CrawlJob, JobStatus};
use crate::ocr::{classify, correct_ocr_errors, ExtractionStats, PdfExtractor};
use crate::parser::parse_structure;
use crate::repository::Store;
use crate::scrapers::{resolve_detail, HttpClient};
use crate::storage::ObjectStorage;

use super::loader;

/// Bumped whenever the extraction/parse pipeline changes in a way that
/// warrants reprocessing already-loaded jobs.
pub const EXTRACTION_VERSION: i32 = 1;

/// Extracted text shorter than this (non-whitespace characters) is treated
/// as extraction failure and routes the job to `needs_ocr`.
const MIN_EXTRACTED_CHARS: usize = 100;

/// Download failure per spec 7: payload under this size is rejected outright
/// regardless of declared content type (typically an error page served with
/// a misleading `Content-Type: application/pdf`).
const MIN_PDF_BYTES: usize = 1000;

pub struct ProcessorConfig {
    pub cache_dir: PathBuf,
    pub max_pdf_bytes: u64,
    pub request_delay: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./pdf-cache"),
            max_pdf_bytes: 200 * 1024 * 1024,
            request_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchStats {
    pub processed: u32,
    pub succeeded: u32,
    pub failed: u32,
}

pub struct Processor {
    http: HttpClient,
    store: Store,
    storage: Option<ObjectStorage>,
    config: ProcessorConfig,
}

impl Processor {
    pub fn new(http: HttpClient, store: Store, storage: Option<ObjectStorage>, config: ProcessorConfig) -> Self {
        Self {
            http,
            store,
            storage,
            config,
        }
    }

    fn cache_path(&self, sha256: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{sha256}.pdf"))
    }

    fn slug_for(&self, job: &CrawlJob) -> String {
        job.url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("job-{}", job.id.unwrap_or(0)))
    }

    /// Fetch a job's PDF. Reuses the cached local file if one exists and its
    /// SHA-256 matches the job's stored hash; otherwise tries `job.pdf_url`
    /// first and falls back to whatever the detail page resolves,
    /// deduplicating identical candidates. Returns the bytes plus the URL
    /// that actually worked (the cached path's own URL when reused).
    async fn fetch_pdf(&self, job: &CrawlJob) -> anyhow::Result<(Vec<u8>, String)> {
        if let (Some(local_path), Some(expected_sha256)) = (&job.pdf_local_path, &job.pdf_sha256) {
            if let Ok(bytes) = tokio::fs::read(local_path).await {
                let actual_sha256 = hex::encode(Sha256::digest(&bytes));
                if &actual_sha256 == expected_sha256 {
                    info!("{}: reusing cached PDF (hash match: {})", job.url, &actual_sha256[..12]);
                    let url = job.pdf_url.clone().unwrap_or_else(|| job.url.clone());
                    return Ok((bytes, url));
                }
                warn!("{}: cached PDF hash mismatch, re-fetching", job.url);
            }
        }

        let mut candidates: Vec<String> = Vec::new();
        if let Some(url) = &job.pdf_url {
            candidates.push(url.clone());
        }

        let detail_html = self.http.get_text(&job.url).await?;
        let resolution = resolve_detail(&detail_html, &job.url);
        if let Some(url) = resolution.pdf_url {
            if !candidates.contains(&url) {
                candidates.push(url);
            }
        }

        for candidate in &candidates {
            match self.http.get_bytes(candidate).await {
                Ok(fetched) => {
                    let is_pdf = fetched
                        .content_type
                        .as_deref()
                        .map(|ct| ct.contains("pdf"))
                        .unwrap_or(false)
                        || infer::get(&fetched.bytes).map(|k| k.mime_type() == "application/pdf").unwrap_or(false);

                    if !is_pdf {
                        warn!("{candidate}: response is not a PDF, trying next candidate");
                        continue;
                    }
                    if fetched.bytes.len() as u64 > self.config.max_pdf_bytes {
                        warn!("{candidate}: exceeds max PDF size, trying next candidate");
                        continue;
                    }
                    if fetched.bytes.len() < MIN_PDF_BYTES {
                        warn!("{candidate}: payload under {MIN_PDF_BYTES} bytes, trying next candidate");
                        continue;
                    }
                    return Ok((fetched.bytes, candidate.clone()));
                }
                Err(e) => {
                    warn!("{candidate}: download failed: {e}");
                    continue;
                }
            }
        }

        anyhow::bail!("no candidate PDF URL could be fetched for {}", job.url)
    }

    /// Run the full pipeline for one job: fetch, fingerprint, persist blob,
    /// extract, classify, correct, parse, load. On success the job ends in
    /// `loaded`; on a too-short extraction it ends in `needs_ocr`; any other
    /// failure ends in `failed` with a truncated error message.
    pub async fn process_job(&self, job: &CrawlJob, run_id: i32) -> anyhow::Result<()> {
        let job_id = job.id.expect("processed jobs are already persisted");
        self.store.set_job_run(job_id, run_id).await?;

        let (bytes, fetched_url) = match self.fetch_pdf(job).await {
            Ok(ok) => ok,
            Err(e) => {
                self.mark_failed(job_id, &e.to_string()).await?;
                return Ok(());
            }
        };

        let sha256 = hex::encode(Sha256::digest(&bytes));
        let local_path = self.cache_path(&sha256);
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        tokio::fs::write(&local_path, &bytes).await?;

        let slug = self.slug_for(job);
        let storage_url = match &self.storage {
            Some(storage) => match storage.upload_pdf(&slug, bytes.clone()).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("blob upload failed for {slug}: {e}");
                    None
                }
            },
            None => None,
        };

        self.store
            .mark_job_downloaded(job_id, &sha256, bytes.len() as i32, &local_path.to_string_lossy(), storage_url.as_deref())
            .await?;

        let mut job = job.clone();
        job.pdf_url = Some(fetched_url);

        match self.extract_and_load(&job, &local_path, &slug, storage_url.as_deref()).await {
            Ok(()) => {
                info!("{}: loaded", job.url);
            }
            Err(e) => {
                self.mark_failed(job_id, &e.to_string()).await?;
            }
        }

        self.http.sleep_request_delay().await;
        Ok(())
    }

    async fn mark_failed(&self, job_id: i32, message: &str) -> anyhow::Result<()> {
        let truncated: String = message.chars().take(500).collect();
        self.store.update_job_status(job_id, JobStatus::Failed, Some(&truncated)).await?;
        Ok(())
    }

    /// Extract text from `local_path`, and if extraction yields usable text
    /// run classify -> correct -> parse -> load. Routes image-only/too-short
    /// PDFs to `needs_ocr` instead of treating them as a hard failure.
    async fn extract_and_load(
        &self,
        job: &CrawlJob,
        local_path: &Path,
        slug: &str,
        storage_url: Option<&str>,
    ) -> anyhow::Result<()> {
        let job_id = job.id.expect("job already persisted");

        let path = local_path.to_path_buf();
        let extractor = PdfExtractor::new();
        let result = tokio::task::spawn_blocking(move || extractor.extract(&path)).await?;

        if let Some(err) = &result.stats.error {
            anyhow::bail!("extraction failed: {err}");
        }

        if let Some(reason) = crate::ocr::junk_reason(&result.text) {
            self.store.update_job_status(job_id, JobStatus::Failed, Some(reason)).await?;
            return Ok(());
        }

        if result.stats.char_count < MIN_EXTRACTED_CHARS {
            self.store
                .update_job_status(job_id, JobStatus::NeedsOcr, Some("extracted text too short, likely image-only"))
                .await?;
            return Ok(());
        }

        let classification = classify(&result.stats);
        if classification.quality == crate::ocr::PdfQuality::ImageOnly {
            self.store
                .update_job_status(job_id, JobStatus::NeedsOcr, Some("classified as image_only"))
                .await?;
            return Ok(());
        }

        let corrected = correct_ocr_errors(&result.text);
        let nodes = parse_structure(&corrected);

        let detail_html = self.http.get_text(&job.url).await.unwrap_or_default();
        let detail = resolve_detail(&detail_html, &job.url).metadata;

        let warnings = extraction_warnings(&result.stats);
        let work = loader::build_work(
            job,
            slug,
            &detail,
            &classification.quality.to_string(),
            "structural",
            classification.confidence,
            warnings,
        );

        let work_id = self.store.upsert_work(&work).await?;
        let db_ids = self.store.replace_work_subtree(work_id, &nodes).await?;

        let node_chunks = loader::build_chunks(&work.title, &nodes);
        let chunks: Vec<(Option<i32>, String, serde_json::Value)> = if node_chunks.is_empty() {
            loader::fallback_chunks(&work.title, &nodes)
                .into_iter()
                .map(|(text, meta)| (None, text, meta))
                .collect()
        } else {
            node_chunks
                .into_iter()
                .map(|(index, text, meta)| (Some(db_ids[index]), text, meta))
                .collect()
        };
        self.store.replace_work_chunks(work_id, &chunks).await?;

        self.store.mark_job_loaded(job_id, work_id, EXTRACTION_VERSION, storage_url).await?;
        Ok(())
    }

    /// Claim up to `limit` pending jobs and process each in turn, returning
    /// aggregate counts. Checks elapsed time between jobs and stops cleanly
    /// once `max_runtime` has passed, leaving any unclaimed-from-this-batch
    /// jobs `crawling` for the stuck-job recovery window to reclaim.
    pub async fn process_pending(&self, run_id: i32, limit: i64, max_runtime: Duration) -> anyhow::Result<BatchStats> {
        let mut stats = BatchStats::default();
        let started = std::time::Instant::now();

        let jobs = self.store.claim_jobs(limit).await?;
        for job in &jobs {
            if started.elapsed() >= max_runtime {
                info!("max_runtime reached, stopping batch early ({} of {} jobs processed)", stats.processed, jobs.len());
                break;
            }

            match self.process_job(job, run_id).await {
                Ok(()) => stats.succeeded += 1,
                Err(e) => {
                    warn!("job {} errored outside the per-job handler: {e}", job.url);
                    stats.failed += 1;
                }
            }
            stats.processed += 1;
        }

        Ok(stats)
    }

    /// Re-run extraction/parse/load for jobs whose `extraction_version` is
    /// behind [`EXTRACTION_VERSION`] (or all eligible jobs, if `force`).
    /// Re-downloads only if the cached local PDF is missing.
    pub async fn reprocess(&self, run_id: i32, limit: i64, force: bool) -> anyhow::Result<BatchStats> {
        let mut stats = BatchStats::default();
        let target_version = if force { i32::MAX } else { EXTRACTION_VERSION };

        let jobs = self.store.reprocessable_jobs(target_version, limit).await?;
        for job in &jobs {
            let job_id = job.id.expect("reprocessable jobs are persisted");
            self.store.set_job_run(job_id, run_id).await?;

            let slug = self.slug_for(job);
            let local_path = match &job.pdf_local_path {
                Some(p) => PathBuf::from(p),
                None => match &job.pdf_sha256 {
                    Some(sha) => self.cache_path(sha),
                    None => {
                        stats.failed += 1;
                        stats.processed += 1;
                        continue;
                    }
                },
            };

            if !local_path.exists() {
                if let (Some(storage), Some(url)) = (&self.storage, &job.pdf_storage_url) {
                    match storage.download(url).await {
                        Ok(bytes) => {
                            if let Some(parent) = local_path.parent() {
                                tokio::fs::create_dir_all(parent).await.ok();
                            }
                            tokio::fs::write(&local_path, &bytes).await.ok();
                        }
                        Err(e) => {
                            warn!("{}: cached PDF missing and re-download failed: {e}", job.url);
                            stats.failed += 1;
                            stats.processed += 1;
                            continue;
                        }
                    }
                } else {
                    warn!("{}: cached PDF missing, no storage backend to recover it from", job.url);
                    stats.failed += 1;
                    stats.processed += 1;
                    continue;
                }
            }

            match self.extract_and_load(job, &local_path, &slug, job.pdf_storage_url.as_deref()).await {
                Ok(()) => stats.succeeded += 1,
                Err(e) => {
                    self.mark_failed(job_id, &e.to_string()).await.ok();
                    stats.failed += 1;
                }
            }
            stats.processed += 1;
        }

        Ok(stats)
    }
}

fn extraction_warnings(stats: &ExtractionStats) -> Option<String> {
    let mut warnings = Vec::new();
    if stats.empty_pages > 0 {
        warnings.push(format!("{} of {} pages yielded no text", stats.empty_pages, stats.page_count));
    }
    if stats.has_images {
        warnings.push(format!("{} pages carry embedded images", stats.image_pages));
    }
    if warnings.is_empty() {
        None
    } else {
        Some(warnings.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_warnings_none_when_clean() {
        let stats = ExtractionStats {
            page_count: 10,
            char_count: 5000,
            has_images: false,
            image_pages: 0,
            empty_pages: 0,
            error: None,
        };
        assert!(extraction_warnings(&stats).is_none());
    }

    #[test]
    fn extraction_warnings_reports_empty_pages() {
        let stats = ExtractionStats {
            page_count: 10,
            char_count: 5000,
            has_images: false,
            image_pages: 0,
            empty_pages: 2,
            error: None,
        };
        let warnings = extraction_warnings(&stats).unwrap();
        assert!(warnings.contains("2 of 10"));
    }
}
