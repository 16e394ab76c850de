//! Regulation listing-page discovery crawler.
//!
//! Grounded in the prototype's `discover.py`: crawl `peraturan.go.id`'s
//! paginated per-type listing pages, extract `<a href="/id/<slug>">`
//! entries, infer the regulation type from the slug prefix, and upsert
//! them as pending crawl jobs.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::models::CrawlJob;
use crate::repository::Store;

use super::http_client::HttpClient;

const BASE_URL: &str = "https://peraturan.go.id";
const PAGE_SIZE: u64 = 20;

pub struct DiscoveryConfig {
    pub freshness_hours: i64,
    pub ignore_freshness: bool,
    pub max_pages_per_type: Option<u32>,
    pub dry_run: bool,
    pub delay_between_pages: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            freshness_hours: 24,
            ignore_freshness: false,
            max_pages_per_type: None,
            dry_run: false,
            delay_between_pages: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct DiscoveryStats {
    pub types_crawled: u32,
    pub pages_crawled: u32,
    pub discovered: u64,
    pub upserted: u64,
}

/// Listing paths for type codes that actually have a dedicated per-type
/// listing page on the source site.
static LISTING_PATHS: &[(&str, &str)] = &[
    ("UU", "/uu"),
    ("PP", "/pp"),
    ("PERPRES", "/perpres"),
    ("PERMEN", "/permen"),
    ("PERBAN", "/perban"),
    ("PERDA", "/perda"),
];

/// All regulation type codes with a dedicated listing page, used as the
/// default `--types` set when a caller doesn't name any.
pub fn known_type_codes() -> Vec<String> {
    LISTING_PATHS.iter().map(|(code, _)| code.to_string()).collect()
}

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<prefix>[a-z-]+)-no-(?P<number>\d+[a-z]?)-tahun-(?P<year>\d{4})$").unwrap()
});

static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d.]+)\s+Peraturan").unwrap());

/// Infer the parent regulation type code from a slug prefix. Ordering
/// matters: the first matching rule wins (spec open question — do not
/// reorder without a concrete counter-example to justify it).
fn infer_type_from_prefix(prefix: &str) -> &'static str {
    let p = prefix.to_lowercase();

    if let Some((code, _)) = LISTING_PATHS.iter().find(|(code, _)| code.to_lowercase() == p) {
        return code;
    }
    if p.contains("mpr") {
        return "TAP_MPR";
    }
    if p.starts_with("permen") || p.starts_with("kepmen") {
        return "PERMEN";
    }
    if p.starts_with("perda") || p.starts_with("perwako") || p.starts_with("perbup") || p.starts_with("pergub") || p.starts_with("qanun") {
        return "PERDA";
    }
    if p == "perppu" {
        return "PERPPU";
    }
    if p == "keppres" {
        return "KEPPRES";
    }
    if p == "inpres" {
        return "INPRES";
    }
    if p == "penpres" {
        return "PENPRES";
    }
    if p == "uudrt" {
        return "UUDRT";
    }
    if p == "uud" {
        return "UUD";
    }
    // Other agency prefixes (peraturan issued by a non-ministry body,
    // e.g. "perban-ojk") start with "per" but don't match any rule
    // above; anything still unrecognised defaults to PERMEN.
    if p.starts_with("per") {
        return "PERBAN";
    }
    "PERMEN"
}

fn type_name(code: &str) -> &'static str {
    crate::models::REGULATION_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("Peraturan")
}

fn parse_total(text: &str) -> Option<u64> {
    let caps = TOTAL_RE.captures(text)?;
    caps.get(1)?.as_str().replace('.', "").parse().ok()
}

struct Extracted {
    url: String,
    pdf_url: Option<String>,
    regulation_type: String,
    number: String,
    year: i32,
    title: String,
    frbr_uri: String,
}

fn extract_entries(html: &str) -> Vec<Extracted> {
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").unwrap();

    let mut seen = std::collections::HashSet::new();
    let mut results = Vec::new();

    for anchor in document.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else { continue };
        let Some(slug) = href.strip_prefix("/id/") else { continue };
        let slug = slug.trim_matches('/');

        let Some(caps) = SLUG_RE.captures(slug) else { continue };
        let prefix = &caps["prefix"];
        let number = caps["number"].to_string();
        let year: i32 = match caps["year"].parse() {
            Ok(y) => y,
            Err(_) => continue,
        };

        let topic_text = anchor.text().collect::<String>().trim().to_string();
        if topic_text.len() < 3 {
            continue;
        }

        let regulation_type = infer_type_from_prefix(prefix).to_string();
        let title = format!("{} Nomor {number} Tahun {year} tentang {topic_text}", type_name(&regulation_type));
        let detail_url = format!("{BASE_URL}/id/{slug}");

        if !seen.insert(detail_url.clone()) {
            continue;
        }

        let frbr_uri = format!("/akn/id/act/{}/{year}/{number}", regulation_type.to_lowercase());

        results.push(Extracted {
            url: detail_url,
            pdf_url: Some(format!("{BASE_URL}/files/{slug}.pdf")),
            regulation_type,
            number,
            year,
            title,
            frbr_uri,
        });
    }

    results
}

/// Run one discovery pass over `types` (regulation type codes with a
/// listing page). Returns aggregate stats.
pub async fn discover(
    client: &HttpClient,
    store: &Store,
    types: &[String],
    source_id: &str,
    config: &DiscoveryConfig,
) -> anyhow::Result<DiscoveryStats> {
    let mut stats = DiscoveryStats::default();

    for type_code in types {
        let Some((code, path)) = LISTING_PATHS.iter().find(|(c, _)| c.eq_ignore_ascii_case(type_code)) else {
            warn!("unknown listing type: {type_code}, skipping");
            continue;
        };

        if !config.ignore_freshness {
            if let Some(progress) = store.get_discovery_progress(source_id, code).await? {
                if let Some(last) = progress.last_discovered_at {
                    let age = chrono::Utc::now() - last;
                    if age < chrono::Duration::hours(config.freshness_hours) {
                        info!("{code}: fresh within {}h, skipping", config.freshness_hours);
                        continue;
                    }
                }
            }
        }

        let first_page_url = format!("{BASE_URL}{path}?page=1");
        let first_html = match client.get_text(&first_page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("{code}: failed to fetch page 1: {e}");
                continue;
            }
        };

        let total = parse_total(&first_html);
        let mut total_pages = total.map(|t| t.div_ceil(PAGE_SIZE)).unwrap_or(1).max(1);
        if let Some(max_pages) = config.max_pages_per_type {
            total_pages = total_pages.min(max_pages as u64);
        }

        info!("{code}: {} regulations across {total_pages} pages", total.map(|t| t.to_string()).unwrap_or_else(|| "?".to_string()));

        let mut pages_crawled = 0u32;
        let entries = extract_entries(&first_html);
        stats.discovered += entries.len() as u64;
        if !config.dry_run {
            for entry in &entries {
                upsert_entry(store, source_id, entry).await?;
                stats.upserted += 1;
            }
        }
        pages_crawled += 1;

        for page in 2..=total_pages {
            tokio::time::sleep(config.delay_between_pages).await;
            let page_url = format!("{BASE_URL}{path}?page={page}");
            let html = match client.get_text(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("{code}: page {page} failed: {e}");
                    continue;
                }
            };
            let entries = extract_entries(&html);
            stats.discovered += entries.len() as u64;
            if !config.dry_run {
                for entry in &entries {
                    upsert_entry(store, source_id, entry).await?;
                    stats.upserted += 1;
                }
            }
            pages_crawled += 1;
        }

        if !config.dry_run {
            let progress = crate::models::DiscoveryProgress {
                source_id: source_id.to_string(),
                regulation_type: code.to_string(),
                total_seen: total.unwrap_or(0) as i32,
                pages_crawled: pages_crawled as i32,
                total_pages: total_pages as i32,
                last_discovered_at: Some(chrono::Utc::now()),
            };
            store.upsert_discovery_progress(&progress).await?;
        }

        stats.pages_crawled += pages_crawled;
        stats.types_crawled += 1;
    }

    Ok(stats)
}

async fn upsert_entry(store: &Store, source_id: &str, entry: &Extracted) -> anyhow::Result<()> {
    let mut job = CrawlJob::new(source_id, &entry.url);
    job.pdf_url = entry.pdf_url.clone();
    job.regulation_type = Some(entry.regulation_type.clone());
    job.number = Some(entry.number.clone());
    job.year = Some(entry.year);
    job.title = Some(entry.title.clone());
    job.frbr_uri = Some(entry.frbr_uri.clone());
    store.upsert_job(&job).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousands_separated_total() {
        assert_eq!(parse_total("Menampilkan 1.926 Peraturan"), Some(1926));
    }

    #[test]
    fn infers_known_top_level_prefix() {
        assert_eq!(infer_type_from_prefix("uu"), "UU");
        assert_eq!(infer_type_from_prefix("perda"), "PERDA");
    }

    #[test]
    fn infers_ministry_and_agency_prefixes() {
        assert_eq!(infer_type_from_prefix("permenkum"), "PERMEN");
        assert_eq!(infer_type_from_prefix("perda-kabupaten-kendal"), "PERDA");
        assert_eq!(infer_type_from_prefix("tap-mpr"), "TAP_MPR");
        assert_eq!(infer_type_from_prefix("qanun-aceh"), "PERDA");
    }

    #[test]
    fn unmatched_per_prefix_falls_back_to_perban() {
        assert_eq!(infer_type_from_prefix("perban-ojk"), "PERBAN");
    }

    #[test]
    fn wholly_unrecognised_prefix_defaults_to_permen() {
        assert_eq!(infer_type_from_prefix("xyz-unknown"), "PERMEN");
    }

    #[test]
    fn extracts_entries_from_listing_html() {
        let html = r#"
            <a href="/id/uu-no-13-tahun-2003">Ketenagakerjaan</a>
            <a href="/id/not-a-regulation-slug">ignored</a>
        "#;
        let entries = extract_entries(html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].regulation_type, "UU");
        assert_eq!(entries[0].number, "13");
        assert_eq!(entries[0].year, 2003);
    }

    #[test]
    fn dedupes_entries_within_a_page() {
        let html = r#"
            <a href="/id/uu-no-1-tahun-2026">Judul Satu</a>
            <a href="/id/uu-no-1-tahun-2026">Judul Satu Lagi</a>
        "#;
        assert_eq!(extract_entries(html).len(), 1);
    }
}
