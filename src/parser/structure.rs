//! DFS structural parse of corrected legal text into a flat node tree.
//!
//! Grounded on the prototype's `parse_structure.py`: find every structural
//! marker, sort by position, then walk them in order maintaining the
//! current BAB/Bagian-or-Paragraf as attachment points for what follows.
//! `sort_order` is a single counter, never multiplied per level, so the
//! resulting order is exactly DFS pre-order.

use crate::models::{DocumentNode, NodeKind};

use super::markers::{
    ATURAN_RE, BAGIAN_RE, BAB_RE, BOUNDARY_RE, PARAGRAF_RE, PASAL_RE, PASAL_ROMAN_RE, PENJELASAN_RE,
};
use super::penjelasan::parse_penjelasan;
use super::roman::fix_roman_pasals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Bab,
    Aturan,
    Bagian,
    Paragraf,
    Pasal,
}

struct Marker<'a> {
    kind: MarkerKind,
    number: &'a str,
    start: usize,
    end: usize,
}

fn find_markers(text: &str) -> Vec<Marker<'_>> {
    let mut markers = Vec::new();

    for caps in BAB_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        markers.push(Marker {
            kind: MarkerKind::Bab,
            number: caps.get(1).unwrap().as_str(),
            start: whole.start(),
            end: whole.end(),
        });
    }

    for caps in ATURAN_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        markers.push(Marker {
            kind: MarkerKind::Aturan,
            number: caps.get(1).unwrap().as_str().trim(),
            start: whole.start(),
            end: whole.end(),
        });
    }

    for caps in BAGIAN_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        markers.push(Marker {
            kind: MarkerKind::Bagian,
            number: caps.get(1).unwrap().as_str(),
            start: whole.start(),
            end: whole.end(),
        });
    }

    for caps in PARAGRAF_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        markers.push(Marker {
            kind: MarkerKind::Paragraf,
            number: caps.get(1).unwrap().as_str(),
            start: whole.start(),
            end: whole.end(),
        });
    }

    for caps in PASAL_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        markers.push(Marker {
            kind: MarkerKind::Pasal,
            number: caps.get(1).unwrap().as_str(),
            start: whole.start(),
            end: whole.end(),
        });
    }

    // Roman Pasals (legitimate ones surviving the pre-pass, e.g. inside
    // ATURAN PERALIHAN) — only add if not already captured as Arabic.
    for caps in PASAL_ROMAN_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if markers.iter().any(|m| m.start == whole.start()) {
            continue;
        }
        markers.push(Marker {
            kind: MarkerKind::Pasal,
            number: caps.get(1).unwrap().as_str(),
            start: whole.start(),
            end: whole.end(),
        });
    }

    markers.sort_by_key(|m| m.start);
    markers
}

/// Split a section's leading text into `(heading, remaining_content)`.
/// Takes up to 3 non-blank lines until a blank line or the next structural
/// marker.
fn extract_heading(text: &str) -> (String, String) {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut heading_lines: Vec<&str> = Vec::new();
    let mut content_start = 0;

    for (j, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if stripped.is_empty() {
            if !heading_lines.is_empty() {
                content_start = j + 1;
                break;
            }
            continue;
        }
        if BOUNDARY_RE.is_match(stripped) {
            content_start = j;
            break;
        }
        heading_lines.push(stripped);
        content_start = j + 1;
        if heading_lines.len() >= 3 {
            break;
        }
    }

    let heading = heading_lines.join(" ");
    let remaining = lines[content_start..].join("\n").trim().to_string();
    (heading, remaining)
}

/// Split a pasal's content into `(number, content)` ayat children, first
/// occurrence of a duplicate number wins.
fn parse_ayat(content: &str) -> Vec<(String, String)> {
    static AYAT_RE: std::sync::LazyLock<regex::Regex> =
        std::sync::LazyLock::new(|| regex::Regex::new(r"(?m)^\((\d+)\)\s*").unwrap());

    let matches: Vec<_> = AYAT_RE.captures_iter(content).collect();
    if matches.is_empty() {
        return Vec::new();
    }

    let mut seen = std::collections::HashSet::new();
    let mut ayat = Vec::new();

    for (idx, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let number = caps.get(1).unwrap().as_str().to_string();
        if !seen.insert(number.clone()) {
            continue;
        }
        let end = matches
            .get(idx + 1)
            .map(|m| m.get(0).unwrap().start())
            .unwrap_or(content.len());
        let text = content[whole.end()..end].trim().to_string();
        ayat.push((number, text));
    }

    ayat
}

struct Builder {
    nodes: Vec<DocumentNode>,
    sort_order: i32,
}

impl Builder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            sort_order: 0,
        }
    }

    fn push(
        &mut self,
        kind: NodeKind,
        number: &str,
        heading: Option<String>,
        content: String,
        parent_index: Option<usize>,
        depth: i32,
    ) -> usize {
        let sort_order = self.sort_order;
        self.sort_order += 1;

        let parent_path = parent_index.map(|i| self.nodes[i].path.clone());
        let segment = format!("{kind}:{number}:{sort_order}");
        let path = match parent_path {
            Some(p) => format!("{p}/{segment}"),
            None => segment,
        };

        self.nodes.push(DocumentNode {
            kind,
            number: number.to_string(),
            heading,
            content,
            parent_index,
            path,
            depth,
            sort_order,
        });

        self.nodes.len() - 1
    }
}

/// Parse corrected full text into the ordered node forest described in the
/// node-type table. Every character of `text` ends up inside exactly one
/// node's `content` or `heading`.
pub fn parse_structure(text: &str) -> Vec<DocumentNode> {
    let text = fix_roman_pasals(text);

    let penjelasan_start = find_penjelasan_split(&text);
    let body_text = match penjelasan_start {
        Some(pos) => &text[..pos],
        None => &text[..],
    };

    let markers = find_markers(body_text);
    let mut b = Builder::new();

    let first_marker_pos = markers.first().map(|m| m.start).unwrap_or(body_text.len());
    let preamble = body_text[..first_marker_pos].trim();
    if !preamble.is_empty() {
        b.push(NodeKind::Preamble, "", None, preamble.to_string(), None, 0);
    }

    let mut current_bab: Option<usize> = None;
    let mut current_bagian: Option<usize> = None;

    for (i, marker) in markers.iter().enumerate() {
        let next_start = markers.get(i + 1).map(|m| m.start).unwrap_or(body_text.len());
        let raw_content = body_text[marker.end..next_start].trim().to_string();

        match marker.kind {
            MarkerKind::Bab => {
                let (heading, leftover) = extract_heading(&raw_content);
                let idx = b.push(NodeKind::Bab, marker.number, Some(heading), leftover, None, 0);
                current_bab = Some(idx);
                current_bagian = None;
            }
            MarkerKind::Aturan => {
                let idx = b.push(
                    NodeKind::Aturan,
                    marker.number,
                    Some(marker.number.to_string()),
                    raw_content,
                    None,
                    0,
                );
                current_bab = Some(idx);
                current_bagian = None;
            }
            MarkerKind::Bagian => {
                let (heading, leftover) = extract_heading(&raw_content);
                let (parent, depth) = match current_bab {
                    Some(p) => (Some(p), 1),
                    None => (None, 0),
                };
                let idx = b.push(NodeKind::Bagian, marker.number, Some(heading), leftover, parent, depth);
                current_bagian = Some(idx);
            }
            MarkerKind::Paragraf => {
                let (heading, leftover) = extract_heading(&raw_content);
                let (parent, depth) = match (current_bagian, current_bab) {
                    (Some(p), _) => (Some(p), b.nodes[p].depth + 1),
                    (None, Some(p)) => (Some(p), b.nodes[p].depth + 1),
                    (None, None) => (None, 0),
                };
                let idx = b.push(NodeKind::Paragraf, marker.number, Some(heading), leftover, parent, depth);
                current_bagian = Some(idx);
            }
            MarkerKind::Pasal => {
                let (parent, depth) = match (current_bagian, current_bab) {
                    (Some(p), _) => (Some(p), b.nodes[p].depth + 1),
                    (None, Some(p)) => (Some(p), b.nodes[p].depth + 1),
                    (None, None) => (None, 0),
                };
                let pasal_idx = b.push(NodeKind::Pasal, marker.number, None, raw_content.clone(), parent, depth);

                for (number, content) in parse_ayat(&raw_content) {
                    b.push(
                        NodeKind::Ayat,
                        &number,
                        None,
                        content,
                        Some(pasal_idx),
                        b.nodes[pasal_idx].depth + 1,
                    );
                }
            }
        }
    }

    if markers.is_empty() && preamble.is_empty() {
        b.push(NodeKind::Content, "", None, body_text.trim().to_string(), None, 0);
    }

    if let Some(pos) = penjelasan_start {
        let penjelasan_text = &text[pos..];
        for node in parse_penjelasan(penjelasan_text) {
            b.nodes.push(node);
        }
    }

    b.nodes
}

/// Find the split point between body and elucidation. Prefers an explicit
/// `PENJELASAN` marker; falls back to scanning the latter half of the text
/// for `I. UMUM` / `II. PASAL DEMI PASAL` and backing up to the nearest
/// blank line.
fn find_penjelasan_split(text: &str) -> Option<usize> {
    if let Some(m) = PENJELASAN_RE.find(text) {
        return Some(m.start());
    }

    static FALLBACK_RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
        regex::Regex::new(r"(?mi)^(?:I\.\s*UMUM|II?\.\s*PASAL\s+DEMI\s+PASAL)").unwrap()
    });

    let half = text.len() / 2;
    let tail = &text[half..];
    let m = FALLBACK_RE.find(tail)?;
    let abs_pos = half + m.start();

    let preceding = &text[..abs_pos];
    match preceding.rfind("\n\n") {
        Some(last_blank) if last_blank as i64 > half as i64 - 200 => Some(last_blank),
        _ => Some(abs_pos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_preamble_before_first_marker() {
        let text = "Menimbang bahwa...\n\nBAB I\nKETENTUAN UMUM\nPasal 1\nisi pasal satu";
        let nodes = parse_structure(text);
        assert_eq!(nodes[0].kind, NodeKind::Preamble);
        assert!(nodes[0].content.starts_with("Menimbang"));
    }

    #[test]
    fn nests_bagian_under_bab_and_pasal_under_bagian() {
        let text = "BAB I\nKETENTUAN UMUM\nBagian Kesatu\nUmum\nPasal 1\nisi";
        let nodes = parse_structure(text);
        let bab = nodes.iter().position(|n| n.kind == NodeKind::Bab).unwrap();
        let bagian = nodes.iter().position(|n| n.kind == NodeKind::Bagian).unwrap();
        let pasal = nodes.iter().position(|n| n.kind == NodeKind::Pasal).unwrap();
        assert_eq!(nodes[bagian].parent_index, Some(bab));
        assert_eq!(nodes[pasal].parent_index, Some(bagian));
    }

    #[test]
    fn parses_ayat_children_under_pasal() {
        let text = "BAB I\nJudul\nPasal 1\n(1) ayat pertama\n(2) ayat kedua";
        let nodes = parse_structure(text);
        let pasal = nodes.iter().position(|n| n.kind == NodeKind::Pasal).unwrap();
        let ayats: Vec<_> = nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Ayat && n.parent_index == Some(pasal))
            .collect();
        assert_eq!(ayats.len(), 2);
        assert_eq!(ayats[0].number, "1");
        assert_eq!(ayats[1].number, "2");
    }

    #[test]
    fn duplicate_ayat_numbers_first_wins() {
        let ayat = parse_ayat("(1) pertama\n(1) duplikat\n(2) kedua");
        assert_eq!(ayat.len(), 2);
        assert_eq!(ayat[0].1, "pertama");
    }

    #[test]
    fn body_without_markers_becomes_one_content_node() {
        let nodes = parse_structure("hanya teks biasa tanpa struktur apapun");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Content);
    }

    #[test]
    fn sort_order_is_dense_dfs_preorder() {
        let text = "BAB I\nJudul\nPasal 1\n(1) satu\nPasal 2\nisi dua";
        let nodes = parse_structure(text);
        let orders: Vec<i32> = nodes.iter().map(|n| n.sort_order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        assert_eq!(orders, (0..orders.len() as i32).collect::<Vec<_>>());
    }

    #[test]
    fn splits_explicit_penjelasan_section() {
        let text = "BAB I\nJudul\nPasal 1\nisi\n\nPENJELASAN\n\nI. UMUM\nUmumnya begini.";
        let nodes = parse_structure(text);
        assert!(nodes.iter().any(|n| n.kind == NodeKind::PenjelasanUmum));
    }
}
