//! Diesel ORM models for database tables.
//!
//! These provide compile-time type checking for the hand-rolled queries in
//! `store.rs`. Domain-level types with nested structure live in `models`;
//! these are the flat row shapes Diesel itself understands.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::regulation_types)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RegulationTypeRecord {
    pub code: String,
    pub name: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::works)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkRecord {
    pub id: i32,
    pub frbr_uri: String,
    pub title: String,
    pub regulation_type: String,
    pub number: String,
    pub year: i32,
    pub status: String,
    pub source_page_url: Option<String>,
    pub pdf_url: Option<String>,
    pub slug: Option<String>,
    pub pdf_quality: Option<String>,
    pub parse_method: Option<String>,
    pub parse_confidence: Option<f64>,
    pub parse_warnings: Option<String>,
    pub pemrakarsa: Option<String>,
    pub tempat_penetapan: Option<String>,
    pub tanggal_penetapan: Option<String>,
    pub pejabat_penetap: Option<String>,
    pub nomor_pengundangan: Option<String>,
    pub nomor_tambahan: Option<String>,
    pub tanggal_pengundangan: Option<String>,
    pub pejabat_pengundangan: Option<String>,
    pub tentang: Option<String>,
    pub parsed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = schema::works)]
pub struct NewWork<'a> {
    pub frbr_uri: &'a str,
    pub title: &'a str,
    pub regulation_type: &'a str,
    pub number: &'a str,
    pub year: i32,
    pub status: &'a str,
    pub source_page_url: Option<&'a str>,
    pub pdf_url: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub pdf_quality: Option<&'a str>,
    pub parse_method: Option<&'a str>,
    pub parse_confidence: Option<f64>,
    pub parse_warnings: Option<&'a str>,
    pub pemrakarsa: Option<&'a str>,
    pub tempat_penetapan: Option<&'a str>,
    pub tanggal_penetapan: Option<&'a str>,
    pub pejabat_penetap: Option<&'a str>,
    pub nomor_pengundangan: Option<&'a str>,
    pub nomor_tambahan: Option<&'a str>,
    pub tanggal_pengundangan: Option<&'a str>,
    pub pejabat_pengundangan: Option<&'a str>,
    pub tentang: Option<&'a str>,
    pub parsed_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::document_nodes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentNodeRecord {
    pub id: i32,
    pub work_id: i32,
    pub node_type: String,
    pub number: String,
    pub heading: Option<String>,
    pub content: String,
    pub parent_id: Option<i32>,
    pub path: String,
    pub depth: i32,
    pub sort_order: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::document_nodes)]
pub struct NewDocumentNode<'a> {
    pub work_id: i32,
    pub node_type: &'a str,
    pub number: &'a str,
    pub heading: Option<&'a str>,
    pub content: &'a str,
    pub parent_id: Option<i32>,
    pub path: &'a str,
    pub depth: i32,
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::legal_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LegalChunkRecord {
    pub id: i32,
    pub work_id: i32,
    pub node_id: Option<i32>,
    pub content: String,
    pub metadata: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::legal_chunks)]
pub struct NewLegalChunk<'a> {
    pub work_id: i32,
    pub node_id: Option<i32>,
    pub content: &'a str,
    pub metadata: &'a str,
}

#[derive(Queryable, QueryableByName, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::crawl_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CrawlJobRecord {
    pub id: i32,
    pub source_id: String,
    pub url: String,
    pub pdf_url: Option<String>,
    pub regulation_type: Option<String>,
    pub number: Option<String>,
    pub year: Option<i32>,
    pub frbr_uri: Option<String>,
    pub title: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub pdf_sha256: Option<String>,
    pub pdf_size: Option<i32>,
    pub pdf_local_path: Option<String>,
    pub pdf_storage_url: Option<String>,
    pub work_id: Option<i32>,
    pub extraction_version: i32,
    pub run_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_crawled_at: Option<DateTime<Utc>>,
    pub pdf_downloaded_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = schema::crawl_jobs)]
pub struct NewCrawlJob<'a> {
    pub source_id: &'a str,
    pub url: &'a str,
    pub pdf_url: Option<&'a str>,
    pub regulation_type: Option<&'a str>,
    pub number: Option<&'a str>,
    pub year: Option<i32>,
    pub frbr_uri: Option<&'a str>,
    pub title: Option<&'a str>,
    pub status: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::discovery_progress)]
#[diesel(primary_key(source_id, regulation_type))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiscoveryProgressRecord {
    pub source_id: String,
    pub regulation_type: String,
    pub total_seen: i32,
    pub pages_crawled: i32,
    pub total_pages: i32,
    pub last_discovered_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = schema::discovery_progress)]
pub struct NewDiscoveryProgress<'a> {
    pub source_id: &'a str,
    pub regulation_type: &'a str,
    pub total_seen: i32,
    pub pages_crawled: i32,
    pub total_pages: i32,
    pub last_discovered_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::scraper_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScraperRunRecord {
    pub id: i32,
    pub source_id: String,
    pub jobs_discovered: i32,
    pub jobs_processed: i32,
    pub jobs_succeeded: i32,
    pub jobs_failed: i32,
    pub status: String,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::scraper_runs)]
pub struct NewScraperRun<'a> {
    pub source_id: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::work_relationships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkRelationshipRecord {
    pub id: i32,
    pub source_work_id: i32,
    pub target_work_id: i32,
    pub relationship_type: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::work_relationships)]
pub struct NewWorkRelationship {
    pub source_work_id: i32,
    pub target_work_id: i32,
    pub relationship_type: String,
}
