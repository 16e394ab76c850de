//! Object storage for PDF blobs via the Supabase Storage REST API.
//!
//! Spec layout: single bucket `regulation-pdfs`, keys `<slug>.pdf` for the
//! source PDF and `<slug>/page-<N>.png` for optional page images,
//! public-read. Uploads are best-effort from the processor's point of
//! view — a failure here does not fail the job.

use reqwest::Client;
use thiserror::Error;

pub const BUCKET: &str = "regulation-pdfs";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage upload rejected: {status} {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Clone)]
pub struct ObjectStorage {
    client: Client,
    base_url: String,
    service_key: String,
}

impl ObjectStorage {
    /// `base_url` is the Supabase project URL, e.g.
    /// `https://xyzcompany.supabase.co`.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{BUCKET}/{key}", self.base_url.trim_end_matches('/'))
    }

    /// Public URL a reader would use to fetch this blob back.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{BUCKET}/{key}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Upsert a blob under `key`. Returns the public URL on success.
    pub async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        let response = self
            .client
            .put(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }

        Ok(self.public_url(key))
    }

    pub async fn upload_pdf(&self, slug: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        self.upload(&format!("{slug}.pdf"), bytes, "application/pdf").await
    }

    /// Fetch a previously-uploaded PDF back, used by Reprocess when the
    /// local on-disk cache is gone.
    pub async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get(self.object_url(key))
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_joins_base_and_key() {
        let storage = ObjectStorage::new("https://xyz.supabase.co/", "key");
        assert_eq!(
            storage.object_url("uu-no-1-tahun-2026.pdf"),
            "https://xyz.supabase.co/storage/v1/object/regulation-pdfs/uu-no-1-tahun-2026.pdf"
        );
    }

    #[test]
    fn public_url_uses_public_prefix() {
        let storage = ObjectStorage::new("https://xyz.supabase.co", "key");
        assert_eq!(
            storage.public_url("uu-no-1-tahun-2026.pdf"),
            "https://xyz.supabase.co/storage/v1/object/public/regulation-pdfs/uu-no-1-tahun-2026.pdf"
        );
    }
}
