//! Stateless cell normalizers.
//!
//! Every function here is total: any input yields an output, never an error.
//! Lookup tables live in [`crate::config`] and are passed in by callers.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*:\s*").expect("valid regex"));
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));
static REVISION_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\d{4}\s*\)").expect("valid regex"));
static REVISION_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d{4})\)").expect("valid regex"));

/// Particles kept lowercase-then-capitalized by [`smart_capitalize`].
const NAME_PARTICLES: &[&str] = &["de", "da", "del", "la", "le", "van", "von"];

/// Accepted date shapes, tried in order. Month-first for ambiguous numerics.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Keep ASCII alphanumerics, uppercased.
pub fn normalize_code(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Keep letters and whitespace, trimmed. Used for program codes.
pub fn letters_only(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// All digit runs, concatenated.
pub fn digits_only(text: &str) -> String {
    DIGIT_RUN.find_iter(text).map(|m| m.as_str()).collect()
}

/// First run of digits, or `""`.
pub fn first_digit_run(text: &str) -> String {
    DIGIT_RUN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Keep digits and hyphens, trimmed. Used for `YYYY-YYYY` academic years.
pub fn digits_and_hyphens(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trim and collapse whitespace runs to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").to_string()
}

/// Term text to its number: FIRST → 1, SECOND → 2, anything else → 3.
pub fn map_term_name(text: &str) -> u8 {
    let upper = text.trim().to_uppercase();
    if upper.contains("FIRST") {
        1
    } else if upper.contains("SECOND") {
        2
    } else {
        3
    }
}

/// Department paths are compared uppercased with ` : ` separators.
pub fn normalize_department(text: &str) -> String {
    let upper = text.to_uppercase();
    let collapsed = WHITESPACE_RUN.replace_all(&upper, " ");
    COLON.replace_all(&collapsed, " : ").trim().to_string()
}

/// Trim and uppercase, with non-breaking spaces folded to spaces.
pub fn upper_key(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_uppercase()
}

/// Split `NAME (YYYY)` into `(NAME, YYYY)`; the revision is `""` when absent.
pub fn parse_program_composite(text: &str) -> (String, String) {
    let name = REVISION_GROUP.replace_all(text, "").trim().to_string();
    let revision = REVISION_TOKEN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    (name, revision)
}

/// Parse a date in any accepted shape and render it as `yyyy-MM-dd`.
/// Unparseable or empty input yields `""`.
pub fn format_date(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return datetime.date().format("%Y-%m-%d").to_string();
        }
    }
    String::new()
}

/// Digits only; empty input stays empty.
pub fn clean_contact(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize personal names word by word (`McDonald`, `O'Connor`, `De La Cruz`).
pub fn smart_capitalize(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if lower.starts_with("mc") && word.chars().count() > 2 {
                let rest: String = word.chars().skip(2).collect();
                format!("Mc{}", capitalize(&rest))
            } else if NAME_PARTICLES.contains(&lower.as_str()) {
                capitalize(&lower)
            } else if word.contains('\'') {
                word.split('\'').map(capitalize).collect::<Vec<_>>().join("'")
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep letters and spaces, trim, title-case each word.
pub fn clean_relation(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();
    let mut out = String::with_capacity(kept.len());
    let mut at_word_start = true;
    for c in kept.trim().chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// How [`normalize_salutation`] recognizes `Mr.` / `Ms.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalutationMatch {
    /// The whole value must be `mr` or `ms`.
    Exact,
    /// The value only has to start with `mr` or `ms`.
    Prefix,
}

/// Normalize `Mr.`/`Ms.` ignoring case, spaces and dots. Other values are
/// returned trimmed.
pub fn normalize_salutation(text: &str, mode: SalutationMatch) -> String {
    let raw = text.trim();
    if raw.is_empty() {
        return String::new();
    }
    let key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '.')
        .collect();
    let matches = |title: &str| match mode {
        SalutationMatch::Exact => key == title,
        SalutationMatch::Prefix => key.starts_with(title),
    };
    if matches("mr") {
        "Mr.".to_string()
    } else if matches("ms") {
        "Ms.".to_string()
    } else {
        raw.to_string()
    }
}

/// Intake flags: trimmed, case-insensitive `yes`.
pub fn is_yes(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("yes")
}

/// `YES` / `NO` flag text.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" abc-1234 "), "ABC1234");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn test_letters_only_program_code() {
        assert_eq!(letters_only("BSA-2021 "), "BSA");
        assert_eq!(letters_only(" BS Nursing 3 "), "BS Nursing");
    }

    #[test]
    fn test_digit_helpers() {
        assert_eq!(digits_only("Rev. 20-21"), "2021");
        assert_eq!(digits_only("none"), "");
        assert_eq!(first_digit_run("R2021 v3"), "2021");
        assert_eq!(digits_and_hyphens(" AY 2023-2024 "), "2023-2024");
    }

    #[test]
    fn test_map_term_name() {
        assert_eq!(map_term_name("First Semester"), 1);
        assert_eq!(map_term_name("second term"), 2);
        assert_eq!(map_term_name("Summer"), 3);
        assert_eq!(map_term_name(""), 3);
    }

    #[test]
    fn test_normalize_department() {
        assert_eq!(
            normalize_department("academic:inst. of education :  education:education"),
            "ACADEMIC : INST. OF EDUCATION : EDUCATION : EDUCATION"
        );
    }

    #[test]
    fn test_parse_program_composite() {
        assert_eq!(
            parse_program_composite("ENGINEERING (2021)"),
            ("ENGINEERING".to_string(), "2021".to_string())
        );
        assert_eq!(
            parse_program_composite("ENGINEERING"),
            ("ENGINEERING".to_string(), String::new())
        );
        assert_eq!(
            parse_program_composite("MBA ( 2019 )"),
            ("MBA".to_string(), String::new())
        );
        assert_eq!(parse_program_composite(""), (String::new(), String::new()));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2001-02-03"), "2001-02-03");
        assert_eq!(format_date("02/03/2001"), "2001-02-03");
        assert_eq!(format_date("March 5, 1999"), "1999-03-05");
        assert_eq!(format_date("2001-02-03 10:11:12"), "2001-02-03");
        assert_eq!(format_date("not a date"), "");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_clean_contact() {
        assert_eq!(clean_contact("+63 (917) 555-0101"), "639175550101");
    }

    #[test]
    fn test_smart_capitalize() {
        assert_eq!(smart_capitalize("juan DE la cruz"), "Juan De La Cruz");
        assert_eq!(smart_capitalize("mcdonald"), "McDonald");
        assert_eq!(smart_capitalize("o'connor"), "O'Connor");
        assert_eq!(smart_capitalize("  "), "");
    }

    #[test]
    fn test_clean_relation() {
        assert_eq!(clean_relation(" MOTHER-in law 2 "), "Motherin Law");
    }

    #[test]
    fn test_normalize_salutation() {
        assert_eq!(normalize_salutation("M.R.", SalutationMatch::Exact), "Mr.");
        assert_eq!(normalize_salutation("ms", SalutationMatch::Exact), "Ms.");
        assert_eq!(normalize_salutation("Mrs", SalutationMatch::Exact), "Mrs");
        assert_eq!(normalize_salutation("Mrs", SalutationMatch::Prefix), "Mr.");
        assert_eq!(normalize_salutation(" Dr. ", SalutationMatch::Prefix), "Dr.");
        assert_eq!(normalize_salutation("", SalutationMatch::Prefix), "");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes(" YES "));
        assert!(!is_yes("y"));
        assert_eq!(yes_no(true), "YES");
    }
}
