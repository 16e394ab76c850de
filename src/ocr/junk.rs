//! Junk-PDF detection: a PDF URL that actually served a website capture
//! (navigation chrome) or a WAF block page instead of the regulation text.
//!
//! Grounded on the prototype's download path: both signatures are checked
//! against only the first 300 characters of extracted text, since that's
//! where a captured page's chrome or a block page's banner appears.

const SNIFF_WINDOW: usize = 300;

/// Returns a human-readable reason if `text` looks like a junk capture
/// rather than regulation text, `None` otherwise.
pub fn junk_reason(text: &str) -> Option<&'static str> {
    let window: String = text.chars().take(SNIFF_WINDOW).collect();

    if window.contains("Beranda") && window.contains("Progsun") {
        return Some("junk PDF (website capture)");
    }
    if window.contains("Access Denied") {
        return Some("junk PDF (WAF block page)");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_website_capture_signature() {
        let text = "Beranda\nProgsun\nMenu\n\nPasal 1\nisi";
        assert_eq!(junk_reason(text), Some("junk PDF (website capture)"));
    }

    #[test]
    fn detects_waf_block_page() {
        let text = "Access Denied\nYou don't have permission to access this resource.";
        assert_eq!(junk_reason(text), Some("junk PDF (WAF block page)"));
    }

    #[test]
    fn regular_regulation_text_is_not_junk() {
        let text = "BAB I\nKETENTUAN UMUM\nPasal 1\nDalam undang-undang ini...";
        assert_eq!(junk_reason(text), None);
    }

    #[test]
    fn signature_outside_sniff_window_is_ignored() {
        let padding = "x".repeat(SNIFF_WINDOW + 50);
        let text = format!("{padding}Beranda Progsun");
        assert_eq!(junk_reason(&text), None);
    }
}
