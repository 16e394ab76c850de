//! Domain model types shared by the parser, processor and repository layers.
//!
//! These are distinct from the Diesel row structs in
//! `repository::diesel_models`: these carry nested structure (a `Work`'s
//! tree of `DocumentNode`s) where the Diesel layer only knows flat rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed catalog of Indonesian regulation types. Immutable.
pub const REGULATION_TYPES: &[(&str, &str)] = &[
    ("UU", "Undang-Undang"),
    ("PP", "Peraturan Pemerintah"),
    ("PERPRES", "Peraturan Presiden"),
    ("PERMEN", "Peraturan Menteri"),
    ("PERDA", "Peraturan Daerah"),
    ("TAP_MPR", "Ketetapan MPR"),
    ("KEPPRES", "Keputusan Presiden"),
    ("INPRES", "Instruksi Presiden"),
    ("PENPRES", "Penetapan Presiden"),
    ("UUDRT", "Undang-Undang Darurat"),
    ("PERPPU", "Peraturan Pemerintah Pengganti Undang-Undang"),
    ("PERBAN", "Peraturan Badan"),
    ("UUD", "Undang-Undang Dasar"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    InForce,
    Amended,
    Revoked,
    NotInForce,
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkStatus::InForce => "in_force",
            WorkStatus::Amended => "amended",
            WorkStatus::Revoked => "revoked",
            WorkStatus::NotInForce => "not_in_force",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_force" => Ok(WorkStatus::InForce),
            "amended" => Ok(WorkStatus::Amended),
            "revoked" => Ok(WorkStatus::Revoked),
            "not_in_force" => Ok(WorkStatus::NotInForce),
            other => Err(format!("unknown work status: {other}")),
        }
    }
}

/// One legal document, identified by its canonical FRBR-style URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Work {
    pub id: Option<i32>,
    pub frbr_uri: String,
    pub title: String,
    pub regulation_type: String,
    pub number: String,
    pub year: i32,
    pub status: WorkStatus,
    pub source_page_url: Option<String>,
    pub pdf_url: Option<String>,
    pub slug: Option<String>,
    pub pdf_quality: Option<String>,
    pub parse_method: Option<String>,
    pub parse_confidence: Option<f64>,
    pub parse_warnings: Option<String>,
    pub metadata: WorkMetadata,
}

/// Detail-page metadata merged onto a `Work` during load (spec 4.6 / 4.7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkMetadata {
    pub pemrakarsa: Option<String>,
    pub tempat_penetapan: Option<String>,
    pub tanggal_penetapan: Option<String>,
    pub pejabat_penetap: Option<String>,
    pub nomor_pengundangan: Option<String>,
    pub nomor_tambahan: Option<String>,
    pub tanggal_pengundangan: Option<String>,
    pub pejabat_pengundangan: Option<String>,
    pub tentang: Option<String>,
}

/// Kind of a document node, per the spec's hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Preamble,
    Bab,
    Aturan,
    Bagian,
    Paragraf,
    Pasal,
    Ayat,
    Content,
    PenjelasanUmum,
    PenjelasanPasal,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Preamble => "preamble",
            NodeKind::Bab => "bab",
            NodeKind::Aturan => "aturan",
            NodeKind::Bagian => "bagian",
            NodeKind::Paragraf => "paragraf",
            NodeKind::Pasal => "pasal",
            NodeKind::Ayat => "ayat",
            NodeKind::Content => "content",
            NodeKind::PenjelasanUmum => "penjelasan_umum",
            NodeKind::PenjelasanPasal => "penjelasan_pasal",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "preamble" => NodeKind::Preamble,
            "bab" => NodeKind::Bab,
            "aturan" => NodeKind::Aturan,
            "bagian" => NodeKind::Bagian,
            "paragraf" => NodeKind::Paragraf,
            "pasal" => NodeKind::Pasal,
            "ayat" => NodeKind::Ayat,
            "content" => NodeKind::Content,
            "penjelasan_umum" => NodeKind::PenjelasanUmum,
            "penjelasan_pasal" => NodeKind::PenjelasanPasal,
            other => return Err(format!("unknown node kind: {other}")),
        })
    }
}

/// One element of a parsed Work's tree. Children are owned by their parent;
/// `parent_index` is a position into the flattened `Vec<DocumentNode>`, not
/// an owning reference, so the tree can be flattened for bulk insert without
/// cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentNode {
    pub kind: NodeKind,
    pub number: String,
    pub heading: Option<String>,
    pub content: String,
    pub parent_index: Option<usize>,
    pub path: String,
    pub depth: i32,
    pub sort_order: i32,
}

/// A searchable record derived from a Work's nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalChunk {
    pub node_index: Option<usize>,
    pub content: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Crawling,
    Downloaded,
    Parsed,
    Loaded,
    Failed,
    NoPdf,
    NeedsOcr,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Crawling => "crawling",
            JobStatus::Downloaded => "downloaded",
            JobStatus::Parsed => "parsed",
            JobStatus::Loaded => "loaded",
            JobStatus::Failed => "failed",
            JobStatus::NoPdf => "no_pdf",
            JobStatus::NeedsOcr => "needs_ocr",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => JobStatus::Pending,
            "crawling" => JobStatus::Crawling,
            "downloaded" => JobStatus::Downloaded,
            "parsed" => JobStatus::Parsed,
            "loaded" => JobStatus::Loaded,
            "failed" => JobStatus::Failed,
            "no_pdf" => JobStatus::NoPdf,
            "needs_ocr" => JobStatus::NeedsOcr,
            other => return Err(format!("unknown job status: {other}")),
        })
    }
}

/// A queued unit of discovery/processing work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    pub id: Option<i32>,
    pub source_id: String,
    pub url: String,
    pub pdf_url: Option<String>,
    pub regulation_type: Option<String>,
    pub number: Option<String>,
    pub year: Option<i32>,
    pub frbr_uri: Option<String>,
    pub title: Option<String>,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub pdf_sha256: Option<String>,
    pub pdf_size: Option<i32>,
    pub pdf_local_path: Option<String>,
    pub pdf_storage_url: Option<String>,
    pub work_id: Option<i32>,
    pub extraction_version: i32,
    pub run_id: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_crawled_at: Option<DateTime<Utc>>,
    pub pdf_downloaded_at: Option<DateTime<Utc>>,
}

impl CrawlJob {
    pub fn new(source_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            source_id: source_id.into(),
            url: url.into(),
            pdf_url: None,
            regulation_type: None,
            number: None,
            year: None,
            frbr_uri: None,
            title: None,
            status: JobStatus::Pending,
            error_message: None,
            pdf_sha256: None,
            pdf_size: None,
            pdf_local_path: None,
            pdf_storage_url: None,
            work_id: None,
            extraction_version: 0,
            run_id: None,
            created_at: None,
            updated_at: None,
            last_crawled_at: None,
            pdf_downloaded_at: None,
        }
    }
}

/// Per (source, regulation-type) discovery checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryProgress {
    pub source_id: String,
    pub regulation_type: String,
    pub total_seen: i32,
    pub pages_crawled: i32,
    pub total_pages: i32,
    pub last_discovered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One invocation of the supervisor loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperRun {
    pub id: Option<i32>,
    pub source_id: String,
    pub jobs_discovered: i32,
    pub jobs_processed: i32,
    pub jobs_succeeded: i32,
    pub jobs_failed: i32,
    pub status: RunStatus,
    pub error_message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A static (source_work, target_work, relationship_kind) seed triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRelationship {
    pub source_frbr_uri: String,
    pub target_frbr_uri: String,
    pub relationship_type: String,
}
