//! Roman-numeral Pasal rescue.
//!
//! OCR often renders `Pasal 1`..`Pasal 15` as `Pasal I`..`Pasal XV`. This
//! pre-pass converts them back to Arabic, except where Roman numerals are
//! legitimate: amendment laws use them throughout, and `ATURAN PERALIHAN`
//! sections use them for their own Pasal sequence.

use regex::Regex;
use std::sync::LazyLock;

use super::markers::{ATURAN_RE, PASAL_ROMAN_RE};

static AMENDMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Perubahan\s+(?:Atas|Kedua|Ketiga|Keempat)").unwrap());

fn roman_to_arabic(roman: &str) -> Option<&'static str> {
    Some(match roman {
        "I" => "1",
        "II" => "2",
        "III" => "3",
        "IV" => "4",
        "V" => "5",
        "VI" => "6",
        "VII" => "7",
        "VIII" => "8",
        "IX" => "9",
        "X" => "10",
        "XI" => "11",
        "XII" => "12",
        "XIII" => "13",
        "XIV" => "14",
        "XV" => "15",
        _ => return None,
    })
}

fn is_amendment_law(text: &str) -> bool {
    let window = &text[..text.len().min(2000)];
    AMENDMENT_RE.is_match(window)
}

fn replace_roman_pasals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in PASAL_ROMAN_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        out.push_str(&text[last_end..whole.start()]);
        let roman = caps.get(1).unwrap().as_str();
        match roman_to_arabic(roman) {
            Some(arabic) => {
                out.push_str("Pasal ");
                out.push_str(arabic);
            }
            None => out.push_str(whole.as_str()),
        }
        last_end = whole.end();
    }
    out.push_str(&text[last_end..]);
    out
}

/// Fix OCR-artifact Roman Pasal numbers to Arabic, respecting the two
/// legitimate-Roman-numeral carve-outs.
pub fn fix_roman_pasals(text: &str) -> String {
    if is_amendment_law(text) {
        return text.to_string();
    }

    if let Some(aturan_match) = ATURAN_RE.find(text) {
        let before = &text[..aturan_match.start()];
        let after = &text[aturan_match.start()..];
        let mut fixed = replace_roman_pasals(before);
        fixed.push_str(after);
        return fixed;
    }

    replace_roman_pasals(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_roman_pasal_to_arabic() {
        let out = fix_roman_pasals("Pasal I\nisi\nPasal II\nisi lain");
        assert!(out.contains("Pasal 1\n"));
        assert!(out.contains("Pasal 2\n"));
    }

    #[test]
    fn leaves_amendment_laws_untouched() {
        let text = "UNDANG-UNDANG TENTANG Perubahan Atas Undang-Undang\nPasal I\nisi";
        assert_eq!(fix_roman_pasals(text), text);
    }

    #[test]
    fn preserves_roman_pasals_after_aturan_peralihan() {
        let text = "Pasal I\nisi sebelum\nATURAN PERALIHAN\nPasal I\nisi sesudah";
        let out = fix_roman_pasals(text);
        assert!(out.starts_with("Pasal 1\n"));
        assert!(out.contains("ATURAN PERALIHAN\nPasal I\n"));
    }
}
