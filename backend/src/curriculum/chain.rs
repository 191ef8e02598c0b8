//! Chronological passes over one curriculum group.
//!
//! A group is every row of one (program, revision) pair, sorted by
//! (academic year, term). Each pass walks the sorted rows once and carries the
//! courses of strictly earlier periods; rows sharing a period never see each
//! other. Passes return new values and leave their input untouched.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

static PREREQUISITE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,/;]").expect("valid regex"));

/// (academic year, term)
pub type Period = (u32, u8);

/// A row placed on the curriculum timeline.
pub trait Chronological {
    fn period(&self) -> Period;
    fn course(&self) -> &str;
}

/// Stable sort by period; ties keep their original order.
pub fn sort_chronologically<T: Chronological>(rows: &mut [T]) {
    rows.sort_by(|a, b| a.period().cmp(&b.period()));
}

/// Whether `period` lies strictly before `other`.
pub fn is_earlier(period: Period, other: Period) -> bool {
    period.cmp(&other) == Ordering::Less
}

/// Call `f` for each row of a sorted group with the courses of all strictly
/// earlier periods, in timeline order.
pub fn with_prior_courses<T, R, F>(group: &[T], mut f: F) -> Vec<R>
where
    T: Chronological,
    F: FnMut(&T, &[String]) -> R,
{
    let mut earlier: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_period: Option<Period> = None;
    let mut out = Vec::with_capacity(group.len());

    for row in group {
        if current_period != Some(row.period()) {
            earlier.append(&mut current);
            current_period = Some(row.period());
        }
        out.push(f(row, &earlier));
        current.push(row.course().to_string());
    }
    out
}

/// Strict-chain inference: each row's prerequisite is the course of the last
/// row in an earlier period. Rows of the first period get none.
pub fn infer_chain<T: Chronological>(group: &[T]) -> Vec<Option<String>> {
    with_prior_courses(group, |_, earlier| earlier.last().cloned())
}

/// Outcome of checking one row's supplied prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteCheck {
    /// Entries taken in an earlier period, in supplied order.
    pub valid: Vec<String>,
    /// Entries with no earlier course.
    pub invalid: Vec<String>,
}

impl PrerequisiteCheck {
    /// Valid entries in the template's comma-joined form.
    pub fn joined(&self) -> String {
        self.valid.join(", ")
    }
}

/// Flexible-set validation: partition each row's supplied prerequisites into
/// those found among earlier courses and those not.
pub fn validate_supplied<T, F>(group: &[T], supplied: F) -> Vec<PrerequisiteCheck>
where
    T: Chronological,
    F: Fn(&T) -> Vec<String>,
{
    with_prior_courses(group, |row, earlier| {
        let (valid, invalid) = supplied(row)
            .into_iter()
            .partition(|code| earlier.iter().any(|c| c == code));
        PrerequisiteCheck { valid, invalid }
    })
}

/// Split a prerequisite cell on `,`, `/` or `;`, dropping blanks.
pub fn split_prerequisites(text: &str) -> Vec<String> {
    PREREQUISITE_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Slot {
        period: Period,
        course: &'static str,
        prereq: &'static str,
    }

    impl Chronological for Slot {
        fn period(&self) -> Period {
            self.period
        }
        fn course(&self) -> &str {
            self.course
        }
    }

    fn slot(year: u32, term: u8, course: &'static str, prereq: &'static str) -> Slot {
        Slot {
            period: (year, term),
            course,
            prereq,
        }
    }

    #[test]
    fn test_split_prerequisites() {
        assert_eq!(
            split_prerequisites(" A, B/C ; ;D "),
            vec!["A", "B", "C", "D"]
        );
        assert!(split_prerequisites("  ").is_empty());
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut rows = vec![
            slot(2, 1, "LATE", ""),
            slot(1, 2, "FIRST-TIE", ""),
            slot(1, 1, "EARLY", ""),
            slot(1, 2, "SECOND-TIE", ""),
        ];
        sort_chronologically(&mut rows);
        let order: Vec<_> = rows.iter().map(|r| r.course).collect();
        assert_eq!(order, vec!["EARLY", "FIRST-TIE", "SECOND-TIE", "LATE"]);
    }

    #[test]
    fn test_prior_courses_exclude_same_period() {
        let rows = vec![
            slot(1, 1, "A", ""),
            slot(1, 1, "B", ""),
            slot(1, 2, "C", ""),
            slot(2, 1, "D", ""),
        ];
        let seen = with_prior_courses(&rows, |_, earlier| earlier.to_vec());
        assert!(seen[0].is_empty());
        assert!(seen[1].is_empty());
        assert_eq!(seen[2], vec!["A", "B"]);
        assert_eq!(seen[3], vec!["A", "B", "C"]);
    }

    #[test]
    fn test_infer_chain_uses_last_earlier_row() {
        let rows = vec![
            slot(1, 1, "A", ""),
            slot(1, 1, "B", ""),
            slot(1, 2, "C", ""),
            slot(1, 2, "D", ""),
            slot(2, 1, "E", ""),
        ];
        let inferred = infer_chain(&rows);
        assert_eq!(
            inferred,
            vec![
                None,
                None,
                Some("B".to_string()),
                Some("B".to_string()),
                Some("D".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_row_group_has_no_prerequisite() {
        let rows = vec![slot(1, 1, "ONLY", "X")];
        assert_eq!(infer_chain(&rows), vec![None]);
        let checks = validate_supplied(&rows, |r| split_prerequisites(r.prereq));
        assert!(checks[0].valid.is_empty());
        assert_eq!(checks[0].invalid, vec!["X"]);
    }

    #[test]
    fn test_validate_supplied_partitions() {
        let rows = vec![
            slot(1, 1, "COURSE A", ""),
            slot(1, 2, "COURSE B", "COURSE A/Z"),
            slot(1, 2, "COURSE C", "COURSE B"),
        ];
        let checks = validate_supplied(&rows, |r| split_prerequisites(r.prereq));
        assert_eq!(checks[0], PrerequisiteCheck::default());
        assert_eq!(checks[1].valid, vec!["COURSE A"]);
        assert_eq!(checks[1].invalid, vec!["Z"]);
        assert_eq!(checks[1].joined(), "COURSE A");
        // same period is not earlier
        assert_eq!(checks[2].invalid, vec!["COURSE B"]);
    }

    #[test]
    fn test_is_earlier() {
        assert!(is_earlier((1, 3), (2, 1)));
        assert!(is_earlier((1, 1), (1, 2)));
        assert!(!is_earlier((1, 2), (1, 2)));
    }
}
