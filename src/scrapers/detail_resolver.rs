//! Detail-page resolution: PDF URL and metadata extraction from a
//! regulation's detail page HTML.

use scraper::{Html, Selector};
use std::collections::HashMap;

use crate::models::WorkStatus;

#[derive(Debug, Clone, Default)]
pub struct DetailMetadata {
    pub pemrakarsa: Option<String>,
    pub tempat_penetapan: Option<String>,
    pub tanggal_penetapan: Option<String>,
    pub pejabat_penetap: Option<String>,
    pub status: Option<WorkStatus>,
    pub nomor_pengundangan: Option<String>,
    pub nomor_tambahan: Option<String>,
    pub tanggal_pengundangan: Option<String>,
    pub pejabat_pengundangan: Option<String>,
    pub tentang: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DetailResolution {
    pub pdf_url: Option<String>,
    pub metadata: DetailMetadata,
    pub error: Option<String>,
}

const MONTHS: &[(&str, &str)] = &[
    ("januari", "01"),
    ("februari", "02"),
    ("maret", "03"),
    ("april", "04"),
    ("mei", "05"),
    ("juni", "06"),
    ("juli", "07"),
    ("agustus", "08"),
    ("september", "09"),
    ("oktober", "10"),
    ("november", "11"),
    ("desember", "12"),
];

/// Parse an Indonesian long-form date ("13 Januari 2026") to ISO
/// (`2026-01-13`). Returns the original string unchanged if it doesn't
/// match the expected shape.
fn parse_indonesian_date(s: &str) -> String {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return s.to_string();
    }
    let day: u32 = match parts[0].parse() {
        Ok(d) => d,
        Err(_) => return s.to_string(),
    };
    let month = MONTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(parts[1]))
        .map(|(_, num)| *num);
    let year = parts[2];
    match month {
        Some(m) if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) => {
            format!("{year}-{m}-{day:02}")
        }
        _ => s.to_string(),
    }
}

fn parse_status(s: &str) -> Option<WorkStatus> {
    let lower = s.to_lowercase();
    if lower.contains("dicabut") {
        Some(WorkStatus::Revoked)
    } else if lower.contains("diubah") {
        Some(WorkStatus::Amended)
    } else if lower.contains("tidak berlaku") {
        Some(WorkStatus::NotInForce)
    } else if lower.contains("berlaku") {
        Some(WorkStatus::InForce)
    } else {
        None
    }
}

/// Resolve the PDF URL and metadata map from a detail page's HTML.
///
/// PDF URL extraction order: (1) a table row whose header cell contains
/// "Dokumen", take the first `<a href>` ending in `.pdf`; (2) any anchor
/// whose href ends with `.pdf` or contains `/files/`.
pub fn resolve_detail(html: &str, base_url: &str) -> DetailResolution {
    let document = Html::parse_document(html);

    let pdf_url = find_pdf_url(&document, base_url);
    let metadata = extract_metadata(&document);

    DetailResolution {
        pdf_url,
        metadata,
        error: None,
    }
}

fn absolutize(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Ok(base) = url::Url::parse(base_url) {
        base.join(href).map(|u| u.to_string()).unwrap_or_else(|_| href.to_string())
    } else {
        href.to_string()
    }
}

fn find_pdf_url(document: &Html, base_url: &str) -> Option<String> {
    let row_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th, td").unwrap();
    let anchor_sel = Selector::parse("a[href]").unwrap();

    for row in document.select(&row_sel) {
        let header_has_dokumen = row
            .select(&th_sel)
            .next()
            .map(|cell| cell.text().collect::<String>().to_lowercase().contains("dokumen"))
            .unwrap_or(false);

        if !header_has_dokumen {
            continue;
        }

        for anchor in row.select(&anchor_sel) {
            if let Some(href) = anchor.value().attr("href") {
                if href.to_lowercase().ends_with(".pdf") {
                    return Some(absolutize(href, base_url));
                }
            }
        }
    }

    for anchor in document.select(&anchor_sel) {
        if let Some(href) = anchor.value().attr("href") {
            let lower = href.to_lowercase();
            if lower.ends_with(".pdf") || lower.contains("/files/") {
                return Some(absolutize(href, base_url));
            }
        }
    }

    None
}

const LABEL_KEYS: &[(&str, &str)] = &[
    ("pemrakarsa", "pemrakarsa"),
    ("tempat penetapan", "tempat_penetapan"),
    ("tanggal penetapan", "tanggal_penetapan"),
    ("pejabat yang menetapkan", "pejabat_penetap"),
    ("status", "status"),
    ("nomor pengundangan", "nomor_pengundangan"),
    ("nomor tambahan", "nomor_tambahan"),
    ("tanggal pengundangan", "tanggal_pengundangan"),
    ("pejabat pengundangan", "pejabat_pengundangan"),
    ("tentang", "tentang"),
];

fn extract_metadata(document: &Html) -> DetailMetadata {
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    let mut map: HashMap<&str, String> = HashMap::new();

    for row in document.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }
        let label = cells[0].text().collect::<String>().trim().to_lowercase();
        let value = cells[1].text().collect::<String>().trim().to_string();
        if value.is_empty() {
            continue;
        }
        for (pattern, key) in LABEL_KEYS {
            if label.contains(pattern) {
                map.insert(key, value.clone());
            }
        }
    }

    DetailMetadata {
        pemrakarsa: map.get("pemrakarsa").cloned(),
        tempat_penetapan: map.get("tempat_penetapan").cloned(),
        tanggal_penetapan: map.get("tanggal_penetapan").map(|s| parse_indonesian_date(s)),
        pejabat_penetap: map.get("pejabat_penetap").cloned(),
        status: map.get("status").and_then(|s| parse_status(s)),
        nomor_pengundangan: map.get("nomor_pengundangan").cloned(),
        nomor_tambahan: map.get("nomor_tambahan").cloned(),
        tanggal_pengundangan: map.get("tanggal_pengundangan").map(|s| parse_indonesian_date(s)),
        pejabat_pengundangan: map.get("pejabat_pengundangan").cloned(),
        tentang: map.get("tentang").cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_pdf_from_dokumen_row() {
        let html = r#"
            <table>
                <tr><th>Dokumen</th><td><a href="/files/uu-1-2026.pdf">Unduh</a></td></tr>
            </table>
        "#;
        let result = resolve_detail(html, "https://peraturan.go.id/id/uu-no-1-tahun-2026");
        assert_eq!(result.pdf_url.unwrap(), "https://peraturan.go.id/files/uu-1-2026.pdf");
    }

    #[test]
    fn falls_back_to_any_pdf_anchor() {
        let html = r#"<a href="https://cdn.example.com/doc.pdf">Download</a>"#;
        let result = resolve_detail(html, "https://peraturan.go.id/id/uu-no-1-tahun-2026");
        assert_eq!(result.pdf_url.unwrap(), "https://cdn.example.com/doc.pdf");
    }

    #[test]
    fn parses_indonesian_date_to_iso() {
        assert_eq!(parse_indonesian_date("13 Januari 2026"), "2026-01-13");
        assert_eq!(parse_indonesian_date("not a date"), "not a date");
    }

    #[test]
    fn extracts_metadata_fields() {
        let html = r#"
            <table>
                <tr><th>Pemrakarsa</th><td>Kementerian Hukum</td></tr>
                <tr><th>Tempat Penetapan</th><td>Jakarta</td></tr>
                <tr><th>Status</th><td>Berlaku</td></tr>
            </table>
        "#;
        let result = resolve_detail(html, "https://peraturan.go.id/id/uu-no-1-tahun-2026");
        assert_eq!(result.metadata.pemrakarsa.as_deref(), Some("Kementerian Hukum"));
        assert_eq!(result.metadata.tempat_penetapan.as_deref(), Some("Jakarta"));
        assert_eq!(result.metadata.status, Some(WorkStatus::InForce));
    }
}
