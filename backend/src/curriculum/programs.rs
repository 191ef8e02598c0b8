//! Programs conversion: raw curriculum export to the Edusuite program template.

use serde_json::Value;

use super::chain::{infer_chain, split_prerequisites, validate_supplied};
use super::verify::{verify_output, TimelineColumns};
use super::{
    group_by_program, CurriculumReport, CurriculumRow, DroppedRow, PrerequisiteMode,
    RejectedElective, RemovedPrerequisite,
};
use crate::config::Rules;
use crate::error::{SchemaError, SchemaResult};
use crate::models::columns::programs;
use crate::models::{cell_text, text_cell, Record, Table};
use crate::normalize::{collapse_whitespace, digits_only, letters_only, map_term_name};

/// Outcome of normalizing one raw row.
enum Normalized {
    Row(CurriculumRow),
    Rejected(RejectedElective),
    Dropped(DroppedRow),
}

fn normalize_row(index: usize, row: &Record, rules: &Rules, supplied: bool) -> Normalized {
    let program_code = letters_only(&cell_text(row, programs::PROGRAM_CODE));
    let revision_id = digits_only(&cell_text(row, programs::REVISION_ID));
    let course_code = collapse_whitespace(&cell_text(row, programs::COURSE));
    let kind = cell_text(row, programs::TYPE);

    if rules.elective_rule.rejects(&kind, &course_code) {
        return Normalized::Rejected(RejectedElective {
            row: index,
            program_code,
            course: course_code,
            kind,
        });
    }

    let year_text = digits_only(&cell_text(row, programs::ACADEMIC_YEAR));
    let term_text = cell_text(row, programs::TERM);
    let academic_year = year_text.parse::<u32>().ok();
    let term = if term_text.trim().is_empty() {
        None
    } else {
        Some(map_term_name(&term_text))
    };

    let (academic_year, term) = match (academic_year, term) {
        (Some(year), Some(term)) => (year, term),
        (year, _) => {
            let reason = if year.is_none() {
                format!("academic year '{}' is not numeric", cell_text(row, programs::ACADEMIC_YEAR))
            } else {
                "term is empty".to_string()
            };
            return Normalized::Dropped(DroppedRow {
                row: index,
                program_code,
                revision_id,
                course: course_code,
                reason,
            });
        }
    };

    let prerequisite = if supplied {
        split_prerequisites(&collapse_whitespace(&cell_text(row, programs::PREREQUISITE)))
    } else {
        Vec::new()
    };

    Normalized::Row(CurriculumRow {
        index,
        institute_code: rules
            .map_institute(&cell_text(row, programs::INSTITUTE_CODE))
            .to_string(),
        is_elective: kind.trim().eq_ignore_ascii_case(rules.elective_rule.type_value.trim()),
        program_code,
        revision_id,
        academic_year,
        term,
        course_code,
        kind,
        prerequisite,
        source: row.clone(),
    })
}

fn output_record(row: &CurriculumRow, prerequisite: String) -> Record {
    let mut out = row.source.clone();
    out.insert(programs::PROGRAM_CODE.into(), text_cell(row.program_code.as_str()));
    out.insert(programs::INSTITUTE_CODE.into(), text_cell(row.institute_code.as_str()));
    out.insert(programs::REVISION_ID.into(), text_cell(row.revision_id.as_str()));
    out.insert(programs::OUT_ACADEMIC_YEAR.into(), Value::from(row.academic_year));
    out.insert(programs::OUT_TERM.into(), Value::from(row.term));
    out.insert(programs::OUT_COURSE.into(), text_cell(row.course_code.as_str()));
    out.insert(programs::PREREQUISITE.into(), text_cell(prerequisite));
    out
}

/// Convert a raw curriculum export.
///
/// The returned table is grouped by (program, revision) in key order and
/// sorted by (year, term) inside each group.
pub fn convert_programs(table: &Table, rules: &Rules) -> SchemaResult<(Table, CurriculumReport)> {
    let missing = table.missing_columns(programs::REQUIRED);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: "Programs".to_string(),
            columns: missing,
        });
    }

    let supplied = table.has_column(programs::PREREQUISITE);
    let mode = if supplied {
        PrerequisiteMode::ValidateSupplied
    } else {
        PrerequisiteMode::InferChain
    };
    let mut report = CurriculumReport::new(mode);

    let mut rows = Vec::new();
    for (index, raw) in table.rows.iter().enumerate() {
        match normalize_row(index, raw, rules, supplied) {
            Normalized::Row(row) => rows.push(row),
            Normalized::Rejected(r) => report.rejected_electives.push(r),
            Normalized::Dropped(d) => report.dropped_rows.push(d),
        }
    }

    let mut records = Vec::with_capacity(rows.len());
    for (_, group) in group_by_program(rows, CurriculumRow::group_key) {
        match mode {
            PrerequisiteMode::InferChain => {
                for (row, inferred) in group.iter().zip(infer_chain(&group)) {
                    records.push(output_record(row, inferred.unwrap_or_default()));
                }
            }
            PrerequisiteMode::ValidateSupplied => {
                let checks = validate_supplied(&group, |r| r.prerequisite.clone());
                for (row, check) in group.iter().zip(checks) {
                    if !check.invalid.is_empty() {
                        report.removed_prerequisites.push(RemovedPrerequisite {
                            program_code: row.program_code.clone(),
                            revision_id: row.revision_id.clone(),
                            course: row.course_code.clone(),
                            removed: check.invalid.clone(),
                        });
                    }
                    records.push(output_record(row, check.joined()));
                }
            }
        }
    }

    let columns: Vec<&str> = programs::OUTPUT
        .iter()
        .copied()
        .filter(|c| *c != programs::DESCRIPTION || table.has_column(programs::DESCRIPTION))
        .collect();
    let converted = Table {
        columns: table.columns.clone(),
        rows: records,
    }
    .select(&columns);

    report.violations = verify_output(&converted, &TimelineColumns::PROGRAMS);
    Ok((converted, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_PREREQ: &[&str] = &[
        programs::PROGRAM_CODE,
        programs::REVISION_ID,
        programs::ACADEMIC_YEAR,
        programs::TERM,
        programs::INSTITUTE_CODE,
        programs::TYPE,
        programs::COURSE,
        programs::PREREQUISITE,
    ];

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let rows = rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .zip(cells.iter())
                    .map(|(c, v)| (c.to_string(), text_cell(*v)))
                    .collect::<Record>()
            })
            .collect();
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    fn course_order(t: &Table) -> Vec<String> {
        (0..t.len()).map(|i| t.cell(i, programs::OUT_COURSE)).collect()
    }

    #[test]
    fn test_supplied_prerequisites_are_pruned() {
        let input = table(
            WITH_PREREQ,
            &[
                &["BSA", "2021", "1", "First Semester", "x", "Core", "COURSE A", ""],
                &["BSA", "2021", "1", "Second Semester", "x", "Core", "COURSE B", "COURSE A"],
                &["BSB", "2021", "1", "First Semester", "x", "Core", "COURSE B", "Z"],
            ],
        );
        let (out, report) = convert_programs(&input, Rules::builtin()).unwrap();

        assert_eq!(report.mode, PrerequisiteMode::ValidateSupplied);
        assert_eq!(out.cell(1, programs::PREREQUISITE), "COURSE A");
        assert_eq!(out.cell(2, programs::PREREQUISITE), "");
        assert_eq!(report.removed_prerequisites.len(), 1);
        assert_eq!(report.removed_prerequisites[0].program_code, "BSB");
        assert_eq!(report.removed_prerequisites[0].removed, vec!["Z"]);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_inferred_chain_without_prerequisite_column() {
        let input = table(
            &WITH_PREREQ[..7],
            &[
                &["BSA", "2021", "2", "First", "x", "Core", "COURSE C"],
                &["BSA", "2021", "1", "First", "x", "Core", "COURSE A"],
                &["BSA", "2021", "1", "First", "x", "Core", "COURSE A2"],
                &["BSA", "2021", "1", "Second", "x", "Core", "COURSE B"],
            ],
        );
        let (out, report) = convert_programs(&input, Rules::builtin()).unwrap();

        assert_eq!(report.mode, PrerequisiteMode::InferChain);
        assert_eq!(
            course_order(&out),
            vec!["COURSE A", "COURSE A2", "COURSE B", "COURSE C"]
        );
        let prereqs: Vec<String> = (0..4).map(|i| out.cell(i, programs::PREREQUISITE)).collect();
        assert_eq!(prereqs, vec!["", "", "COURSE A2", "COURSE B"]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_normalizes_codes_and_layout() {
        let input = table(
            WITH_PREREQ,
            &[&[
                "BSA-2021 ",
                "Rev 2021",
                "Year 1",
                "first sem",
                "ACADEMIC : INST. OF EDUCATION : EDUCATION : EDUCATION",
                "Core",
                "  INTRO   TO  EDUC ",
                "",
            ]],
        );
        let (out, _) = convert_programs(&input, Rules::builtin()).unwrap();

        assert!(!out.has_column(programs::DESCRIPTION));
        assert_eq!(out.columns.len(), programs::OUTPUT.len() - 1);
        assert_eq!(out.cell(0, programs::PROGRAM_CODE), "BSA");
        assert_eq!(out.cell(0, programs::REVISION_ID), "2021");
        assert_eq!(out.cell(0, programs::INSTITUTE_CODE), "IE");
        assert_eq!(out.rows[0][programs::OUT_ACADEMIC_YEAR], Value::from(1u32));
        assert_eq!(out.rows[0][programs::OUT_TERM], Value::from(1u8));
        assert_eq!(out.cell(0, programs::OUT_COURSE), "INTRO TO EDUC");
        assert_eq!(out.rows[0][programs::REQUIRED_UNITS], Value::Null);
    }

    #[test]
    fn test_description_is_kept_when_supplied() {
        let mut columns = WITH_PREREQ.to_vec();
        columns.push(programs::DESCRIPTION);
        let input = table(
            &columns,
            &[&["BSA", "2021", "1", "First", "x", "Core", "A", "", "Accountancy"]],
        );
        let (out, _) = convert_programs(&input, Rules::builtin()).unwrap();
        assert_eq!(out.columns[1], programs::DESCRIPTION);
        assert_eq!(out.cell(0, programs::DESCRIPTION), "Accountancy");
    }

    #[test]
    fn test_electives_with_course_shape_are_rejected() {
        let input = table(
            WITH_PREREQ,
            &[
                &["BSA", "2021", "1", "First", "x", "ELECTIVE", "ABC1234", ""],
                &["BSA", "2021", "1", "First", "x", "Elective", "GE ELEC 1", ""],
            ],
        );
        let (out, report) = convert_programs(&input, Rules::builtin()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.cell(0, programs::OUT_COURSE), "GE ELEC 1");
        assert_eq!(report.rejected_electives.len(), 1);
        assert_eq!(report.rejected_electives[0].course, "ABC1234");
        assert_eq!(report.rejected_electives[0].row, 0);
    }

    #[test]
    fn test_non_numeric_periods_are_dropped() {
        let input = table(
            WITH_PREREQ,
            &[
                &["BSA", "2021", "N/A", "First", "x", "Core", "A", ""],
                &["BSA", "2021", "1", "", "x", "Core", "B", ""],
                &["BSA", "2021", "1", "First", "x", "Core", "C", ""],
            ],
        );
        let (out, report) = convert_programs(&input, Rules::builtin()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(report.dropped_rows.len(), 2);
        assert_eq!(report.dropped_rows[0].row, 0);
        assert!(report.dropped_rows[0].reason.contains("N/A"));
        assert_eq!(report.dropped_rows[1].reason, "term is empty");
    }

    #[test]
    fn test_cross_revision_prerequisites_are_pruned() {
        let input = table(
            WITH_PREREQ,
            &[
                &["BSA", "2019", "1", "First", "x", "Core", "A", ""],
                &["BSA", "2021", "1", "Second", "x", "Core", "B", "A"],
            ],
        );
        let (out, report) = convert_programs(&input, Rules::builtin()).unwrap();
        assert_eq!(out.cell(1, programs::PREREQUISITE), "");
        assert_eq!(report.removed_prerequisites[0].revision_id, "2021");
    }

    #[test]
    fn test_missing_required_columns() {
        let input = table(&[programs::PROGRAM_CODE, programs::COURSE], &[]);
        let err = convert_programs(&input, Rules::builtin()).unwrap_err();
        assert!(err.columns().contains(&programs::TYPE.to_string()));
        assert!(!err.columns().contains(&programs::COURSE.to_string()));
    }
}
