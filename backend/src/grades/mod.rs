//! Graduate grade conversion and its post-conversion validation.
//!
//! ```text
//! raw rows ──► derive (dropped, semester, remarks, programs, school, credited)
//!          ──► fixed 23-column layout
//!          ──► RowSchema check (report only, no row is removed)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{GradeScale, Rules};
use crate::error::{PipelineResult, SchemaError, SchemaResult, ValidationError};
use crate::models::columns::grades;
use crate::models::{cell_text, text_cell, Record, Table};
use crate::normalize::{digits_and_hyphens, map_term_name, parse_program_composite, yes_no};
use crate::validation::{ColumnViolation, RowSchema};

// =============================================================================
// Remarks
// =============================================================================

/// Normalized classification of a raw grade token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remark {
    Pass,
    Fail,
    #[serde(rename = "No Credit")]
    NoCredit,
}

impl Remark {
    pub fn label(&self) -> &'static str {
        match self {
            Remark::Pass => "Pass",
            Remark::Fail => "Fail",
            Remark::NoCredit => "No Credit",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a raw grade; anything outside the pass and fail lists is
/// `No Credit`.
pub fn map_remarks(grade: &str, scale: &GradeScale) -> Remark {
    scale.classify(grade)
}

// =============================================================================
// Derivations
// =============================================================================

/// `YYYY-YYYY-N` from the academic year text and the term name.
pub fn derive_school_semester(academic_year: &str, academic_term: &str) -> String {
    format!(
        "{}-{}",
        digits_and_hyphens(academic_year),
        map_term_name(academic_term)
    )
}

/// Same program name (case-insensitive) and the same revision.
pub fn programs_match(program: &str, current_program: &str) -> bool {
    let (name, revision) = parse_program_composite(program);
    let (current_name, current_revision) = parse_program_composite(current_program);
    name.trim().to_uppercase() == current_name.trim().to_uppercase()
        && revision.trim() == current_revision.trim()
}

/// First header mentioning both "school" and "name", ignoring case.
pub fn find_school_column(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .map(String::as_str)
        .find(|c| {
            let lower = c.to_lowercase();
            lower.contains("school") && lower.contains("name")
        })
}

/// Values derived for one grade row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRow {
    pub school_semester: String,
    pub remark: Remark,
    pub dropped: bool,
    pub program_code: String,
    pub program_revision_id: String,
    pub current_program: String,
    pub programs_match: bool,
    pub school: String,
    pub overwrite: String,
}

impl GradeRow {
    pub fn derive(row: &Record, scale: &GradeScale, school_column: Option<&str>) -> Self {
        let grade = cell_text(row, grades::GRADE);
        let program = cell_text(row, grades::PROGRAM);
        let current_program = cell_text(row, grades::CURRENT_PROGRAM);
        let (program_code, program_revision_id) = parse_program_composite(&program);
        let overwrite = cell_text(row, grades::OVERWRITE);

        Self {
            school_semester: derive_school_semester(
                &cell_text(row, grades::ACADEMIC_YEAR),
                &cell_text(row, grades::ACADEMIC_TERM),
            ),
            remark: map_remarks(&grade, scale),
            dropped: scale.is_dropped(&grade),
            program_code,
            program_revision_id,
            programs_match: programs_match(&program, &current_program),
            current_program,
            school: school_column.map(|c| cell_text(row, c)).unwrap_or_default(),
            overwrite: if overwrite.trim().is_empty() {
                "NO".to_string()
            } else {
                overwrite
            },
        }
    }

    /// Credited exactly when passed.
    pub fn credited(&self) -> bool {
        self.remark == Remark::Pass
    }

    /// Write the derived values over a copy of the raw row.
    pub fn apply(self, row: &Record) -> Record {
        let credited = self.credited();
        let mut out = row.clone();
        let mut put = |column: &str, text: String| {
            out.insert(column.to_string(), text_cell(text));
        };
        put(grades::DROPPED, yes_no(self.dropped).to_string());
        put(grades::SCHOOL_SEMESTER, self.school_semester);
        put(grades::REMARKS, self.remark.label().to_string());
        put(grades::PROGRAM_CODE, self.program_code);
        put(grades::PROGRAM_REVISION_ID, self.program_revision_id);
        put(grades::CURRENT_PROGRAM, self.current_program);
        put(grades::PROGRAMS_MATCH, yes_no(self.programs_match).to_string());
        put(grades::SCHOOL, self.school);
        put(grades::CREDITED, yes_no(credited).to_string());
        put(grades::OVERWRITE, self.overwrite);
        out
    }
}

/// Derive every grade field and project onto the target layout.
///
/// Returns the converted table and the source school-name column, if any.
pub fn derive_grades(table: &Table, rules: &Rules) -> SchemaResult<(Table, Option<String>)> {
    let missing = table.missing_columns(grades::REQUIRED);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: "Graduate Grades".to_string(),
            columns: missing,
        });
    }

    let school_column = find_school_column(&table.columns).map(str::to_string);
    let rows = table
        .rows
        .iter()
        .map(|row| GradeRow::derive(row, &rules.grade_scale, school_column.as_deref()).apply(row))
        .collect();

    let derived = Table {
        columns: table.columns.clone(),
        rows,
    };
    Ok((derived.select(grades::OUTPUT), school_column))
}

/// Check a converted grade table against the embedded row schema.
pub fn validate_converted(table: &Table) -> Result<Vec<ColumnViolation>, ValidationError> {
    Ok(RowSchema::graduate_grades()?.check(table))
}

// =============================================================================
// Report
// =============================================================================

/// Diagnostics of a graduate grade conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    /// Input column copied into the school field; `None` leaves it empty.
    pub school_column: Option<String>,
    pub violations: Vec<ColumnViolation>,
}

impl GradeReport {
    pub fn is_clean(&self) -> bool {
        self.school_column.is_some() && self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.school_column {
            Some(column) => out.push(format!("Using column '{}' as School Name", column)),
            None => out.push("No column resembling 'School Name' was found".to_string()),
        }
        out.extend(self.violations.iter().map(ColumnViolation::message));
        out
    }
}

/// Convert raw graduate grades, then validate the result.
pub fn convert_graduate_grades(table: &Table, rules: &Rules) -> PipelineResult<(Table, GradeReport)> {
    let (converted, school_column) = derive_grades(table, rules)?;
    let violations = validate_converted(&converted)?;
    Ok((
        converted,
        GradeReport {
            school_column,
            violations,
        },
    ))
}
