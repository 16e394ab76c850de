//! Regex catalogue for structural markers in corrected legal text.
//!
//! Grounded line-for-line on the prototype's `parse_structure.py` pattern
//! table; Python's `re.MULTILINE` `^...$` anchors map onto `regex`'s
//! `(?m)` flag.

use regex::Regex;
use std::sync::LazyLock;

pub static BAB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^BAB\s+([IVXLCDM]+)\s*$").unwrap());

pub static BAGIAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^Bagian\s+(Kesatu|Kedua|Ketiga|Keempat|Kelima|Keenam|Ketujuh|Kedelapan|Kesembilan|Kesepuluh|Kesebelas|Kedua\s*Belas|Ketiga\s*Belas|Keempat\s*Belas|Kelima\s*Belas|Keenam\s*Belas|Ketujuh\s*Belas|Kedelapan\s*Belas|Kesembilan\s*Belas|Kedua\s*Puluh|Ke-\d+)",
    )
    .unwrap()
});

pub static PARAGRAF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Paragraf\s+(\d+)\s*$").unwrap());

pub static PASAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Pasal[ \t]+(\d+[A-Z]?)\s*$").unwrap());

pub static PASAL_ROMAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Pasal[ \t]+([IVXLCDM]+)\s*$").unwrap());

pub static PENJELASAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*PENJELASAN\s*$").unwrap());

pub static ATURAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(ATURAN\s+PERALIHAN|ATURAN\s+TAMBAHAN)\s*$").unwrap());

pub static BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^(BAB\s+[IVXLCDM]+|Pasal[ \t]+\d+[A-Z]?|Pasal[ \t]+[IVXLCDM]+|Bagian\s+\w+|Paragraf\s+\d+|PENJELASAN|ATURAN\s+PERALIHAN|ATURAN\s+TAMBAHAN)\s*$",
    )
    .unwrap()
});
