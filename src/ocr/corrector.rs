//! Deterministic OCR error correction for Indonesian legal text.
//!
//! Ported substitution-for-substitution from the prototype's
//! `ocr_correct.py`: broken ligatures, misread characters, spacing issues.
//! Pure text -> text; never invents tokens, only normalises.

use regex::Regex;
use std::sync::LazyLock;

struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

static PATTERNS: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    vec![
        // Letter-digit confusion.
        Substitution {
            pattern: Regex::new(r"(?m)^(Pasal)[ \t]+l\s*$").unwrap(),
            replacement: "$1 1",
        },
        Substitution {
            pattern: Regex::new(r"(?m)(?:Pasal\s)([lI])(\d+)").unwrap(),
            replacement: "Pasal 1$2",
        },
        // Known uppercase words.
        Substitution {
            pattern: Regex::new(r"(?i)\bFRESIDEN\b").unwrap(),
            replacement: "PRESIDEN",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bPRES[!I1]DEN\b").unwrap(),
            replacement: "PRESIDEN",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bREPUB[!I1]IK\b").unwrap(),
            replacement: "REPUBLIK",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bINDONES[!I1]A\b").unwrap(),
            replacement: "INDONESIA",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bUNDANG[\s-]*UNDANG\b").unwrap(),
            replacement: "UNDANG-UNDANG",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bPERATURAN\s+PEMER[!I1]NTAH\b").unwrap(),
            replacement: "PERATURAN PEMERINTAH",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bMENIMBANG\b").unwrap(),
            replacement: "Menimbang",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bMENGINGAT\b").unwrap(),
            replacement: "Mengingat",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bMEMUTUSKAN\b").unwrap(),
            replacement: "MEMUTUSKAN",
        },
        Substitution {
            pattern: Regex::new(r"(?i)\bMENETAPKAN\b").unwrap(),
            replacement: "MENETAPKAN",
        },
        // Ligatures and whitespace.
        Substitution {
            pattern: Regex::new("\u{fb01}").unwrap(),
            replacement: "fi",
        },
        Substitution {
            pattern: Regex::new("\u{fb02}").unwrap(),
            replacement: "fl",
        },
        Substitution {
            pattern: Regex::new("\u{fb00}").unwrap(),
            replacement: "ff",
        },
        Substitution {
            pattern: Regex::new("\u{00a0}").unwrap(),
            replacement: " ",
        },
        // Scanner debris.
        Substitution {
            pattern: Regex::new(r"(?m)^[;,.]$").unwrap(),
            replacement: "",
        },
        Substitution {
            pattern: Regex::new(r"(?m)^\s*[-_]{3,}\s*$").unwrap(),
            replacement: "",
        },
    ]
});

// Digit substitutions that aren't straightforward regex-replace pairs (the
// replacement depends on a captured digit) are applied separately, in the
// same relative order as the prototype.
static TRAILING_O_AFTER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)O(?=\s|$|\n)").unwrap());
static PASAL_TRAILING_O: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Pasal\s)(\d+)O\b").unwrap());
static LONE_L_BEFORE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\s)l(?=\d{2,})").unwrap());
static LONE_L_BETWEEN_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\d)l(?=\d)").unwrap());
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Apply the deterministic OCR correction table, in order. Idempotent:
/// `correct_ocr_errors(correct_ocr_errors(t)) == correct_ocr_errors(t)`.
pub fn correct_ocr_errors(text: &str) -> String {
    let mut out = text.to_string();

    out = PATTERNS[0].pattern.replace_all(&out, PATTERNS[0].replacement).into_owned();
    out = PATTERNS[1].pattern.replace_all(&out, PATTERNS[1].replacement).into_owned();

    out = TRAILING_O_AFTER_DIGIT.replace_all(&out, "${1}0").into_owned();
    out = PASAL_TRAILING_O.replace_all(&out, "Pasal ${1}0").into_owned();
    out = LONE_L_BEFORE_DIGITS.replace_all(&out, "1").into_owned();
    out = LONE_L_BETWEEN_DIGITS.replace_all(&out, "1").into_owned();

    for sub in PATTERNS.iter().skip(2) {
        out = sub.pattern.replace_all(&out, sub.replacement).into_owned();
    }

    out = BLANK_RUN.replace_all(&out, "\n\n").into_owned();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixes_pasal_letter_digit_confusion() {
        assert_eq!(correct_ocr_errors("Pasal l3"), "Pasal 13");
        assert_eq!(correct_ocr_errors("Pasal l"), "Pasal 1");
    }

    #[test]
    fn fixes_known_uppercase_words() {
        assert_eq!(correct_ocr_errors("FRESIDEN"), "PRESIDEN");
        assert_eq!(correct_ocr_errors("PRES!DEN"), "PRESIDEN");
        assert_eq!(correct_ocr_errors("REPUB!IK"), "REPUBLIK");
        assert_eq!(correct_ocr_errors("INDONES!A"), "INDONESIA");
    }

    #[test]
    fn fixes_ligatures() {
        assert_eq!(correct_ocr_errors("e\u{fb01}cient"), "efficient");
    }

    #[test]
    fn removes_lone_punctuation_lines_and_rules() {
        let input = "line one\n;\nline two\n---\nline three";
        let out = correct_ocr_errors(input);
        assert!(!out.contains(";\n"));
        assert!(!out.contains("---"));
    }

    #[test]
    fn collapses_blank_line_runs() {
        let out = correct_ocr_errors("a\n\n\n\n\nb");
        assert_eq!(out, "a\n\nb");
    }

    #[test]
    fn is_idempotent() {
        let input = "Pasal l3 FRESIDEN \u{fb01}le\n\n\n\nmore text";
        let once = correct_ocr_errors(input);
        let twice = correct_ocr_errors(&once);
        assert_eq!(once, twice);
    }
}
