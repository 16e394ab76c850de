//! PDF quality classification.
//!
//! Born-digital PDFs carry selectable text on (almost) every page and no
//! full-page scans; scanned-clean PDFs are image-backed but `pdftotext`
//! still recovers most of the content (an embedded OCR text layer from the
//! source, not ours); image-only PDFs have pages that are all image and no
//! usable text, and are routed to `needs_ocr` rather than processed.

use super::extractor::ExtractionStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfQuality {
    BornDigital,
    ScannedClean,
    ImageOnly,
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PdfQuality::BornDigital => "born_digital",
            PdfQuality::ScannedClean => "scanned_clean",
            PdfQuality::ImageOnly => "image_only",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub quality: PdfQuality,
    pub confidence: f64,
}

/// Classify a PDF from the stats already gathered during extraction: the
/// ratio of text-bearing to image-only pages, and whether any embedded
/// text streams were found at all.
pub fn classify(stats: &ExtractionStats) -> Classification {
    let page_count = stats.page_count.max(1);
    let text_bearing = page_count.saturating_sub(stats.empty_pages);
    let text_ratio = text_bearing as f64 / page_count as f64;

    if !stats.has_images {
        return Classification {
            quality: PdfQuality::BornDigital,
            confidence: text_ratio,
        };
    }

    if text_bearing == 0 {
        let confidence = stats.image_pages as f64 / page_count as f64;
        return Classification {
            quality: PdfQuality::ImageOnly,
            confidence,
        };
    }

    if text_ratio >= 0.8 {
        Classification {
            quality: PdfQuality::ScannedClean,
            confidence: text_ratio,
        }
    } else {
        Classification {
            quality: PdfQuality::ImageOnly,
            confidence: 1.0 - text_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(page_count: u32, empty_pages: u32, has_images: bool, image_pages: u32) -> ExtractionStats {
        ExtractionStats {
            page_count,
            char_count: 0,
            has_images,
            image_pages,
            empty_pages,
            error: None,
        }
    }

    #[test]
    fn no_images_is_born_digital() {
        let c = classify(&stats(10, 0, false, 0));
        assert_eq!(c.quality, PdfQuality::BornDigital);
    }

    #[test]
    fn all_empty_with_images_is_image_only() {
        let c = classify(&stats(5, 5, true, 5));
        assert_eq!(c.quality, PdfQuality::ImageOnly);
        assert!((c.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mostly_text_with_some_images_is_scanned_clean() {
        let c = classify(&stats(10, 1, true, 2));
        assert_eq!(c.quality, PdfQuality::ScannedClean);
    }

    #[test]
    fn mostly_empty_with_images_is_image_only() {
        let c = classify(&stats(10, 8, true, 8));
        assert_eq!(c.quality, PdfQuality::ImageOnly);
    }
}
