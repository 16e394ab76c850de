//! Work and chunk construction for the processor's load step.
//!
//! Grounded on the prototype's `load_to_supabase.py`: `load_work` (upsert
//! keyed on `frbr_uri`), `load_nodes_recursive` (node tree, already built by
//! [`crate::parser::parse_structure`]) and `create_chunks` (per-node-type
//! chunk text, "cukup jelas" skip, full-text fallback).

use crate::models::{CrawlJob, DocumentNode, NodeKind, Work, WorkMetadata, WorkStatus};
use crate::scrapers::DetailMetadata;

/// Minimum words a full-text fallback chunk carries before a new one starts.
const FALLBACK_CHUNK_WORDS: usize = 300;

/// Assemble the `Work` row for a job, merging in detail-page metadata and
/// parse diagnostics. Mirrors `_build_law_dict` — `frbr_uri` falls back to a
/// constructed value when the job didn't carry one from discovery.
pub fn build_work(
    job: &CrawlJob,
    slug: &str,
    detail: &DetailMetadata,
    pdf_quality: &str,
    parse_method: &str,
    parse_confidence: f64,
    parse_warnings: Option<String>,
) -> Work {
    let regulation_type = job.regulation_type.clone().unwrap_or_else(|| "PERBAN".to_string());
    let number = job.number.clone().unwrap_or_default();
    let year = job.year.unwrap_or(0);

    let frbr_uri = job
        .frbr_uri
        .clone()
        .unwrap_or_else(|| format!("/akn/id/act/{}/{year}/{number}", regulation_type.to_lowercase()));

    let title = job
        .title
        .clone()
        .or_else(|| detail.tentang.clone())
        .unwrap_or_else(|| format!("{regulation_type} Nomor {number} Tahun {year}"));

    Work {
        id: None,
        frbr_uri,
        title,
        regulation_type,
        number,
        year,
        status: detail.status.unwrap_or(WorkStatus::InForce),
        source_page_url: Some(job.url.clone()),
        pdf_url: job.pdf_url.clone(),
        slug: Some(slug.to_string()),
        pdf_quality: Some(pdf_quality.to_string()),
        parse_method: Some(parse_method.to_string()),
        parse_confidence: Some(parse_confidence),
        parse_warnings,
        metadata: WorkMetadata {
            pemrakarsa: detail.pemrakarsa.clone(),
            tempat_penetapan: detail.tempat_penetapan.clone(),
            tanggal_penetapan: detail.tanggal_penetapan.clone(),
            pejabat_penetap: detail.pejabat_penetap.clone(),
            nomor_pengundangan: detail.nomor_pengundangan.clone(),
            nomor_tambahan: detail.nomor_tambahan.clone(),
            tanggal_pengundangan: detail.tanggal_pengundangan.clone(),
            pejabat_pengundangan: detail.pejabat_pengundangan.clone(),
            tentang: detail.tentang.clone(),
        },
    }
}

fn is_cukup_jelas(content: &str) -> bool {
    content.trim().to_lowercase().starts_with("cukup jelas")
}

fn chunk_text_for(title: &str, node: &DocumentNode) -> Option<String> {
    match node.kind {
        NodeKind::Pasal => Some(format!("{title}\nPasal {}\n\n{}", node.number, node.content)),
        NodeKind::Preamble | NodeKind::Content => Some(format!("{title}\n\n{}", node.content)),
        NodeKind::PenjelasanUmum => {
            let heading = node.heading.as_deref().unwrap_or("Penjelasan");
            Some(format!("{title}\n{heading}\n\n{}", node.content))
        }
        NodeKind::PenjelasanPasal => {
            if is_cukup_jelas(&node.content) {
                None
            } else {
                Some(format!("{title}\nPenjelasan Pasal {}\n\n{}", node.number, node.content))
            }
        }
        NodeKind::Bab | NodeKind::Aturan | NodeKind::Bagian | NodeKind::Paragraf | NodeKind::Ayat => None,
    }
}

fn chunk_metadata(node: &DocumentNode) -> serde_json::Value {
    serde_json::json!({
        "node_type": node.kind.to_string(),
        "number": node.number,
        "heading": node.heading,
    })
}

/// Build per-node search chunks, keyed by index into `nodes`. Returns an
/// empty vec if no node produced chunkable content (caller falls back to
/// [`fallback_chunks`]).
pub fn build_chunks(title: &str, nodes: &[DocumentNode]) -> Vec<(usize, String, serde_json::Value)> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(i, node)| chunk_text_for(title, node).map(|text| (i, text, chunk_metadata(node))))
        .collect()
}

/// Full-text fallback: concatenate every node's content in tree order and
/// split into ~[`FALLBACK_CHUNK_WORDS`]-word windows. Used only when
/// `build_chunks` yields nothing (e.g. a law whose body never matched a
/// single structural marker).
pub fn fallback_chunks(title: &str, nodes: &[DocumentNode]) -> Vec<(String, serde_json::Value)> {
    let full_text: String = nodes
        .iter()
        .map(|n| n.content.as_str())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let words: Vec<&str> = full_text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    words
        .chunks(FALLBACK_CHUNK_WORDS)
        .enumerate()
        .map(|(i, window)| {
            let text = format!("{title}\n\n{}", window.join(" "));
            let metadata = serde_json::json!({ "node_type": "fulltext_fallback", "chunk_index": i });
            (text, metadata)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pasal(content: &str) -> DocumentNode {
        DocumentNode {
            kind: NodeKind::Pasal,
            number: "1".to_string(),
            heading: None,
            content: content.to_string(),
            parent_index: None,
            path: "pasal:1:1".to_string(),
            depth: 1,
            sort_order: 1,
        }
    }

    #[test]
    fn pasal_chunk_includes_title_and_number() {
        let node = pasal("Setiap orang berhak...");
        let chunks = build_chunks("Undang-Undang Nomor 1", &[node]);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].1.contains("Pasal 1"));
        assert!(chunks[0].1.contains("Undang-Undang Nomor 1"));
    }

    #[test]
    fn penjelasan_pasal_skips_cukup_jelas() {
        let node = DocumentNode {
            kind: NodeKind::PenjelasanPasal,
            number: "1".to_string(),
            heading: Some("Penjelasan Pasal 1".to_string()),
            content: "Cukup jelas.".to_string(),
            parent_index: None,
            path: "penjelasan_pasal:1:90002".to_string(),
            depth: 0,
            sort_order: 90002,
        };
        assert!(build_chunks("title", &[node]).is_empty());
    }

    #[test]
    fn bab_node_produces_no_chunk() {
        let node = DocumentNode {
            kind: NodeKind::Bab,
            number: "I".to_string(),
            heading: Some("Ketentuan Umum".to_string()),
            content: "Ketentuan Umum".to_string(),
            parent_index: None,
            path: "bab:I:0".to_string(),
            depth: 0,
            sort_order: 0,
        };
        assert!(build_chunks("title", &[node]).is_empty());
    }

    #[test]
    fn fallback_splits_into_word_windows() {
        let long_content = "kata ".repeat(650);
        let node = pasal(&long_content);
        let chunks = fallback_chunks("title", &[node]);
        assert_eq!(chunks.len(), 3);
    }
}
