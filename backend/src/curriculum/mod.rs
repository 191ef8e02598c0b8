//! Curriculum conversion and prerequisite validation.
//!
//! ```text
//! raw rows ─► normalize ─► reject mis-tagged electives ─► drop non-numeric periods
//!          ─► group by (program, revision) ─► sort by (year, term)
//!          ─► InferChain | ValidateSupplied ─► target layout ─► verify_output
//! ```
//!
//! The two prerequisite modes are distinct models. [`PrerequisiteMode::InferChain`]
//! links each row to the last course of the latest earlier period.
//! [`PrerequisiteMode::ValidateSupplied`] keeps any supplied prerequisite that
//! was taken in an earlier period. The mode follows from the input: a
//! `Prerequisite` column selects validation.
//!
//! Value problems never abort a conversion; they are collected in a
//! [`CurriculumReport`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Record;

pub mod chain;
pub mod prerequisites;
pub mod programs;
pub mod verify;

pub use chain::{
    infer_chain, split_prerequisites, validate_supplied, with_prior_courses, Chronological,
    Period, PrerequisiteCheck,
};
pub use prerequisites::convert_prerequisites;
pub use programs::convert_programs;
pub use verify::{verify_output, TimelineColumns};

// =============================================================================
// Curriculum Row
// =============================================================================

/// One normalized curriculum row.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumRow {
    /// Position in the input table.
    pub index: usize,
    pub program_code: String,
    pub revision_id: String,
    pub academic_year: u32,
    pub term: u8,
    pub course_code: String,
    pub institute_code: String,
    /// Raw `Type` cell.
    pub kind: String,
    /// Supplied prerequisites, split and trimmed.
    pub prerequisite: Vec<String>,
    pub is_elective: bool,
    /// The input row, for passthrough columns.
    pub source: Record,
}

impl CurriculumRow {
    pub fn group_key(&self) -> (String, String) {
        (self.program_code.clone(), self.revision_id.clone())
    }
}

impl Chronological for CurriculumRow {
    fn period(&self) -> Period {
        (self.academic_year, self.term)
    }

    fn course(&self) -> &str {
        &self.course_code
    }
}

/// Group rows by (program, revision) in key order, each group sorted by
/// period with ties in input order.
pub fn group_by_program<T, F>(rows: Vec<T>, key: F) -> Vec<((String, String), Vec<T>)>
where
    T: Chronological,
    F: Fn(&T) -> (String, String),
{
    let mut groups: BTreeMap<(String, String), Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
        .into_iter()
        .map(|(k, mut group)| {
            chain::sort_chronologically(&mut group);
            (k, group)
        })
        .collect()
}

// =============================================================================
// Modes and Reports
// =============================================================================

/// How prerequisites are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrerequisiteMode {
    /// No prerequisites supplied: build the immediate chain.
    InferChain,
    /// Prerequisites supplied: keep only those taken earlier.
    ValidateSupplied,
}

/// An elective row removed because its code has a regular course shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedElective {
    pub row: usize,
    pub program_code: String,
    pub course: String,
    pub kind: String,
}

/// A row excluded from grouping because its year or term is not numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRow {
    pub row: usize,
    pub program_code: String,
    pub revision_id: String,
    pub course: String,
    pub reason: String,
}

/// Supplied prerequisites pruned from a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedPrerequisite {
    pub program_code: String,
    pub revision_id: String,
    pub course: String,
    pub removed: Vec<String>,
}

/// A prerequisite in the converted output with no earlier course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteViolation {
    pub program_code: String,
    pub revision_id: String,
    pub course: String,
    pub prerequisite: String,
    pub academic_year: u32,
    pub term: u8,
}

/// Everything a curriculum conversion found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumReport {
    pub mode: PrerequisiteMode,
    pub rejected_electives: Vec<RejectedElective>,
    pub removed_prerequisites: Vec<RemovedPrerequisite>,
    pub dropped_rows: Vec<DroppedRow>,
    /// Final verification failures over the output.
    pub violations: Vec<PrerequisiteViolation>,
}

impl CurriculumReport {
    pub fn new(mode: PrerequisiteMode) -> Self {
        Self {
            mode,
            rejected_electives: Vec::new(),
            removed_prerequisites: Vec::new(),
            dropped_rows: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.rejected_electives.is_empty()
            && self.removed_prerequisites.is_empty()
            && self.dropped_rows.is_empty()
            && self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        for r in &self.rejected_electives {
            out.push(format!(
                "Removed elective row {} ({}): '{}' has a regular course code shape",
                r.row + 1,
                r.program_code,
                r.course
            ));
        }
        for d in &self.dropped_rows {
            out.push(format!(
                "Dropped row {} ({} {}, {}): {}",
                d.row + 1,
                d.program_code,
                d.revision_id,
                d.course,
                d.reason
            ));
        }
        for p in &self.removed_prerequisites {
            out.push(format!(
                "{} {}, {}: removed prerequisite(s) not taken earlier: {}",
                p.program_code,
                p.revision_id,
                p.course,
                p.removed.join(", ")
            ));
        }
        for v in &self.violations {
            out.push(format!(
                "{} {}, {} (year {}, term {}): prerequisite '{}' has no earlier course",
                v.program_code, v.revision_id, v.course, v.academic_year, v.term, v.prerequisite
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, program: &str, revision: &str, year: u32, term: u8, course: &str) -> CurriculumRow {
        CurriculumRow {
            index,
            program_code: program.to_string(),
            revision_id: revision.to_string(),
            academic_year: year,
            term,
            course_code: course.to_string(),
            institute_code: "IE".to_string(),
            kind: "Core".to_string(),
            prerequisite: Vec::new(),
            is_elective: false,
            source: Record::new(),
        }
    }

    #[test]
    fn test_group_by_program_sorts_keys_and_periods() {
        let rows = vec![
            row(0, "BSN", "2021", 2, 1, "N3"),
            row(1, "BSA", "2021", 1, 2, "A2"),
            row(2, "BSN", "2021", 1, 1, "N1"),
            row(3, "BSA", "2019", 1, 1, "OLD"),
            row(4, "BSA", "2021", 1, 1, "A1"),
        ];
        let groups = group_by_program(rows, CurriculumRow::group_key);
        let keys: Vec<_> = groups.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                ("BSA".to_string(), "2019".to_string()),
                ("BSA".to_string(), "2021".to_string()),
                ("BSN".to_string(), "2021".to_string()),
            ]
        );
        let bsa: Vec<_> = groups[1].1.iter().map(|r| r.course_code.as_str()).collect();
        assert_eq!(bsa, vec!["A1", "A2"]);
    }

    #[test]
    fn test_report_messages() {
        let mut report = CurriculumReport::new(PrerequisiteMode::ValidateSupplied);
        assert!(report.is_clean());
        report.removed_prerequisites.push(RemovedPrerequisite {
            program_code: "BSA".into(),
            revision_id: "2021".into(),
            course: "COURSE B".into(),
            removed: vec!["Z".into()],
        });
        assert!(!report.is_clean());
        assert_eq!(report.messages().len(), 1);
        assert!(report.messages()[0].contains("Z"));
    }
}
