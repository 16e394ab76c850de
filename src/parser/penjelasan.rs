//! Elucidation (PENJELASAN) section parser.
//!
//! Grounded on the prototype's `parse_penjelasan`. Sort bases are fixed
//! per the node-type table rather than continuing the body's DFS counter,
//! so elucidation always sorts after the body regardless of how many body
//! nodes there were.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{DocumentNode, NodeKind};

const SORT_BASE: i32 = 90000;

static UMUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"I\.\s*UMUM").unwrap());
static PASAL_DEMI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"II\.\s*PASAL\s+DEMI\s+PASAL").unwrap());
static PENJELASAN_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PENJELASAN\s*").unwrap());
static PASAL_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(Pasal\s+\d+[A-Z]?)\s*\n").unwrap());
static PASAL_HEADER_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Pasal\s+(\d+)([A-Z]?)").unwrap());

fn make_node(kind: NodeKind, number: &str, heading: &str, content: String, sort_order: i32) -> DocumentNode {
    DocumentNode {
        kind,
        number: number.to_string(),
        heading: Some(heading.to_string()),
        content,
        parent_index: None,
        path: format!("{kind}:{number}:{sort_order}"),
        depth: 0,
        sort_order,
    }
}

/// Parse the `PENJELASAN` section (and everything after it) into
/// `penjelasan_umum` / `penjelasan_pasal` nodes.
pub fn parse_penjelasan(text: &str) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();

    let umum_match = UMUM_RE.find(text);
    let pasal_demi_match = PASAL_DEMI_RE.find(text);

    if umum_match.is_none() && pasal_demi_match.is_none() {
        let content = if text.trim_start().to_uppercase().starts_with("PENJELASAN") {
            PENJELASAN_HEADER_RE.replace(text, "").trim().to_string()
        } else {
            text.trim().to_string()
        };
        if !content.is_empty() {
            nodes.push(make_node(NodeKind::PenjelasanUmum, "", "Penjelasan", content, SORT_BASE));
        }
        return nodes;
    }

    if let Some(umum) = umum_match {
        let pre_umum_raw = &text[..umum.start()];
        let pre_umum = PENJELASAN_HEADER_RE.replace(pre_umum_raw, "");
        let pre_umum = pre_umum.trim();
        if pre_umum.len() > 20 {
            nodes.push(make_node(
                NodeKind::PenjelasanUmum,
                "",
                "Penjelasan — Pendahuluan",
                pre_umum.to_string(),
                SORT_BASE - 1,
            ));
        }

        let umum_end = pasal_demi_match.map(|m| m.start()).unwrap_or(text.len());
        let umum_text = text[umum.end()..umum_end].trim();
        if !umum_text.is_empty() {
            nodes.push(make_node(
                NodeKind::PenjelasanUmum,
                "",
                "Penjelasan Umum",
                umum_text.to_string(),
                SORT_BASE,
            ));
        }
    }

    if let Some(pasal_demi) = pasal_demi_match {
        let pasal_text = &text[pasal_demi.end()..];
        let splits = split_keep_delimiters(pasal_text);

        let pre_pasal = splits.first().map(|s| s.trim()).unwrap_or("");
        if pre_pasal.len() > 20 {
            nodes.push(make_node(
                NodeKind::PenjelasanUmum,
                "",
                "Penjelasan Pasal Demi Pasal — Pendahuluan",
                pre_pasal.to_string(),
                SORT_BASE + 1,
            ));
        }

        let mut i = 1;
        while i + 1 < splits.len() {
            let header = splits[i].trim();
            let content = splits[i + 1].trim().to_string();
            if let Some(caps) = PASAL_HEADER_NUM_RE.captures(header) {
                let digits = caps.get(1).unwrap().as_str();
                let suffix = caps.get(2).unwrap().as_str();
                let number = format!("{digits}{suffix}");
                let numeric: i32 = digits.parse().unwrap_or(0);
                nodes.push(DocumentNode {
                    kind: NodeKind::PenjelasanPasal,
                    number: number.clone(),
                    heading: Some(format!("Penjelasan Pasal {number}")),
                    content,
                    parent_index: None,
                    path: format!("penjelasan_pasal:{number}:{}", SORT_BASE + 2 + numeric),
                    depth: 0,
                    sort_order: SORT_BASE + 2 + numeric,
                });
            }
            i += 2;
        }
    }

    nodes
}

/// Mimic Python's `re.split` with a capturing group: returns the text
/// before the first match, then alternating (match, text-after) pairs.
fn split_keep_delimiters(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut last_end = 0;
    for caps in PASAL_SPLIT_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let group = caps.get(1).unwrap();
        result.push(text[last_end..whole.start()].to_string());
        result.push(group.as_str().to_string());
        last_end = whole.end();
    }
    result.push(text[last_end..].to_string());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_block_becomes_one_umum_node_without_sub_markers() {
        let nodes = parse_penjelasan("PENJELASAN\n\nIni adalah penjelasan tanpa sub bagian apapun.");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::PenjelasanUmum);
    }

    #[test]
    fn splits_umum_and_pasal_demi_pasal() {
        let text = "PENJELASAN\n\nI. UMUM\nUraian umum yang cukup panjang untuk lolos ambang batas dua puluh karakter.\n\nII. PASAL DEMI PASAL\n\nPasal 1\nCukup jelas.\n\nPasal 2\nPenjelasan pasal dua yang agak lebih panjang dari cukup jelas.";
        let nodes = parse_penjelasan(text);
        assert!(nodes.iter().any(|n| n.heading.as_deref() == Some("Penjelasan Umum")));
        let pasal1 = nodes.iter().find(|n| n.kind == NodeKind::PenjelasanPasal && n.number == "1").unwrap();
        assert_eq!(pasal1.content, "Cukup jelas.");
        let pasal2 = nodes.iter().find(|n| n.kind == NodeKind::PenjelasanPasal && n.number == "2").unwrap();
        assert!(pasal2.sort_order > pasal1.sort_order);
    }
}
