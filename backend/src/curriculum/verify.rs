//! Final verification over a converted curriculum table.
//!
//! Works on the output columns alone, independent of how the table was
//! produced, and never changes it.

use super::chain::{split_prerequisites, with_prior_courses, Chronological, Period};
use super::{group_by_program, PrerequisiteViolation};
use crate::models::columns::{prerequisites, programs};
use crate::models::{cell_text, Record, Table};

/// Where the timeline fields live in a converted layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineColumns {
    pub program_code: &'static str,
    pub revision_id: &'static str,
    pub academic_year: &'static str,
    pub term: &'static str,
    pub course: &'static str,
    pub prerequisite: &'static str,
}

impl TimelineColumns {
    /// Programs template layout.
    pub const PROGRAMS: TimelineColumns = TimelineColumns {
        program_code: programs::PROGRAM_CODE,
        revision_id: programs::REVISION_ID,
        academic_year: programs::OUT_ACADEMIC_YEAR,
        term: programs::OUT_TERM,
        course: programs::OUT_COURSE,
        prerequisite: programs::PREREQUISITE,
    };

    /// Layout accepted by the Pre-Requisites conversion.
    pub const PRE_REQUISITES: TimelineColumns = TimelineColumns {
        program_code: prerequisites::PROGRAM_CODE,
        revision_id: prerequisites::REVISION_ID,
        academic_year: prerequisites::ACADEMIC_YEAR,
        term: prerequisites::TERM,
        course: prerequisites::COURSE,
        prerequisite: prerequisites::PREREQUISITE,
    };

    /// Parse the (year, term) of a row; `None` when either is not an integer.
    pub fn period(&self, row: &Record) -> Option<Period> {
        let year = cell_text(row, self.academic_year).trim().parse().ok()?;
        let term = cell_text(row, self.term).trim().parse().ok()?;
        Some((year, term))
    }

    pub fn group_key(&self, row: &Record) -> (String, String) {
        (
            cell_text(row, self.program_code).trim().to_string(),
            cell_text(row, self.revision_id).trim().to_string(),
        )
    }
}

struct PlacedRow {
    key: (String, String),
    period: Period,
    course: String,
    prerequisites: Vec<String>,
}

impl Chronological for PlacedRow {
    fn period(&self) -> Period {
        self.period
    }

    fn course(&self) -> &str {
        &self.course
    }
}

/// Every prerequisite not found among strictly earlier courses of its
/// (program, revision) group. Rows without a numeric period are skipped.
pub fn verify_output(table: &Table, columns: &TimelineColumns) -> Vec<PrerequisiteViolation> {
    let placed: Vec<PlacedRow> = table
        .rows
        .iter()
        .filter_map(|row| {
            Some(PlacedRow {
                key: columns.group_key(row),
                period: columns.period(row)?,
                course: cell_text(row, columns.course),
                prerequisites: split_prerequisites(&cell_text(row, columns.prerequisite)),
            })
        })
        .collect();

    let mut violations = Vec::new();
    for ((program_code, revision_id), group) in group_by_program(placed, |r| r.key.clone()) {
        let found = with_prior_courses(&group, |row, earlier| {
            row.prerequisites
                .iter()
                .filter(|p| !earlier.contains(p))
                .map(|p| PrerequisiteViolation {
                    program_code: program_code.clone(),
                    revision_id: revision_id.clone(),
                    course: row.course.clone(),
                    prerequisite: p.clone(),
                    academic_year: row.period.0,
                    term: row.period.1,
                })
                .collect::<Vec<_>>()
        });
        violations.extend(found.into_iter().flatten());
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::text_cell;
    use serde_json::Value;

    fn programs_table(rows: &[(&str, &str, u32, u8, &str, &str)]) -> Table {
        let cols = TimelineColumns::PROGRAMS;
        let records = rows
            .iter()
            .map(|(program, revision, year, term, course, prereq)| {
                let mut r = Record::new();
                r.insert(cols.program_code.into(), text_cell(*program));
                r.insert(cols.revision_id.into(), text_cell(*revision));
                r.insert(cols.academic_year.into(), Value::from(*year));
                r.insert(cols.term.into(), Value::from(*term));
                r.insert(cols.course.into(), text_cell(*course));
                r.insert(cols.prerequisite.into(), text_cell(*prereq));
                r
            })
            .collect();
        Table::from_rows(records)
    }

    #[test]
    fn test_clean_output_has_no_violations() {
        let table = programs_table(&[
            ("BSA", "2021", 1, 1, "COURSE A", ""),
            ("BSA", "2021", 1, 2, "COURSE B", "COURSE A"),
            ("BSA", "2021", 2, 1, "COURSE C", "COURSE A, COURSE B"),
        ]);
        assert!(verify_output(&table, &TimelineColumns::PROGRAMS).is_empty());
    }

    #[test]
    fn test_reports_same_period_and_unknown_prerequisites() {
        let table = programs_table(&[
            ("BSA", "2021", 1, 1, "COURSE A", ""),
            ("BSA", "2021", 1, 1, "COURSE B", "COURSE A"),
            ("BSA", "2021", 1, 2, "COURSE C", "Z"),
        ]);
        let violations = verify_output(&table, &TimelineColumns::PROGRAMS);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].course, "COURSE B");
        assert_eq!(violations[0].prerequisite, "COURSE A");
        assert_eq!(violations[1].prerequisite, "Z");
        assert_eq!((violations[1].academic_year, violations[1].term), (1, 2));
    }

    #[test]
    fn test_revisions_are_isolated() {
        let table = programs_table(&[
            ("BSA", "2019", 1, 1, "COURSE A", ""),
            ("BSA", "2021", 1, 2, "COURSE B", "COURSE A"),
        ]);
        let violations = verify_output(&table, &TimelineColumns::PROGRAMS);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].revision_id, "2021");
    }

    #[test]
    fn test_text_periods_are_parsed_and_bad_ones_skipped() {
        let mut table = programs_table(&[
            ("BSA", "2021", 1, 1, "COURSE A", ""),
            ("BSA", "2021", 1, 2, "COURSE B", "COURSE A"),
        ]);
        let cols = TimelineColumns::PROGRAMS;
        table.set(1, cols.term, text_cell(" 2 "));
        table.set(0, cols.academic_year, text_cell("one"));
        // row 0 is skipped, so COURSE A is no longer earlier
        let violations = verify_output(&table, &cols);
        assert_eq!(violations.len(), 1);
    }
}
