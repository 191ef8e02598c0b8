//! High-level conversion API.
//!
//! Combines the steps a shell needs: parsing, the per-kind transform, its
//! validator pass and the confirmation gate for destructive kinds.
//!
//! # Example
//!
//! ```rust,ignore
//! use edusuite::{convert_file, ConvertOptions, ParseOptions, RecordKind, Rules};
//!
//! let conversion = convert_file(
//!     RecordKind::Programs,
//!     "curriculum.csv",
//!     Rules::builtin(),
//!     &ConvertOptions::default(),
//!     &ParseOptions::default(),
//! )?;
//! println!("{} rows -> {}", conversion.table.len(), conversion.file_name);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::audit::{check_fields, find_duplicate_differences};
use crate::cleaning::{
    assign_categories, assign_institutes, mobile_and_title, personal_information, RuleChain,
};
use crate::config::Rules;
use crate::curriculum::{convert_prerequisites, convert_programs};
use crate::equivalency::{
    apply_removals, detect_one_way, detect_reverse_duplicates, EquivalencyReport,
};
use crate::error::{PipelineResult, SchemaResult};
use crate::grades::convert_graduate_grades;
use crate::models::{RecordKind, Table};
use crate::parser::{parse_bytes, read_table_file, ParseOptions, ParsedTable};
use crate::report::ConversionReport;

use super::courses::convert_courses;
use super::students::convert_students;

/// Caller decisions that are not part of the input table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Apply destructive findings (equivalency row removal).
    pub confirm: bool,
}

/// How the input was read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// The converted table, its findings and where a shell should export it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub kind: RecordKind,
    pub table: Table,
    pub report: ConversionReport,
    pub file_name: String,
    /// Present when the pipeline read the input itself.
    pub csv_info: Option<CsvInfo>,
}

/// Convert one table as `kind`.
///
/// Schema errors abort; everything else is returned in the report.
pub fn convert(
    kind: RecordKind,
    table: &Table,
    rules: &Rules,
    options: &ConvertOptions,
) -> PipelineResult<Conversion> {
    log_info(format!("⚙️  Converting {} rows as {}...", table.len(), kind));
    let (table, report) = dispatch(kind, table, rules, options)?;

    if report.is_clean() {
        log_success(format!("{} rows ready for {}", table.len(), kind.file_name()));
    } else {
        let messages = report.messages();
        log_warning(format!("{} finding(s):", messages.len()));
        for message in &messages {
            log_info_indent(message.as_str(), 1);
        }
        log_success(format!(
            "{} rows ready for {} (see report)",
            table.len(),
            kind.file_name()
        ));
    }

    Ok(Conversion {
        kind,
        table,
        report,
        file_name: kind.file_name().to_string(),
        csv_info: None,
    })
}

/// Convert a file read with auto-detection (or the given overrides).
pub fn convert_file<P: AsRef<Path>>(
    kind: RecordKind,
    path: P,
    rules: &Rules,
    options: &ConvertOptions,
    parse: &ParseOptions,
) -> PipelineResult<Conversion> {
    log_info(format!("📖 Reading {}...", path.as_ref().display()));
    let parsed = read_table_file(path, parse)?;
    convert_parsed(kind, parsed, rules, options)
}

/// Same as [`convert_file`] for uploaded bytes.
pub fn convert_bytes(
    kind: RecordKind,
    bytes: &[u8],
    rules: &Rules,
    options: &ConvertOptions,
    parse: &ParseOptions,
) -> PipelineResult<Conversion> {
    log_info(format!("📖 Reading {} bytes...", bytes.len()));
    let parsed = parse_bytes(bytes, parse)?;
    convert_parsed(kind, parsed, rules, options)
}

fn convert_parsed(
    kind: RecordKind,
    parsed: ParsedTable,
    rules: &Rules,
    options: &ConvertOptions,
) -> PipelineResult<Conversion> {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Detected separator: '{}'",
        format_delimiter(parsed.delimiter)
    ));
    log_success(format!("Read {} rows", parsed.table.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        headers: parsed.table.columns.clone(),
        row_count: parsed.table.len(),
    };

    let mut conversion = convert(kind, &parsed.table, rules, options)?;
    conversion.csv_info = Some(csv_info);
    Ok(conversion)
}

fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

fn dispatch(
    kind: RecordKind,
    table: &Table,
    rules: &Rules,
    options: &ConvertOptions,
) -> PipelineResult<(Table, ConversionReport)> {
    let converted = match kind {
        RecordKind::Programs => {
            let (table, report) = convert_programs(table, rules)?;
            log_info(format!("Prerequisite mode: {:?}", report.mode));
            (table, ConversionReport::Curriculum(report))
        }
        RecordKind::PreRequisites => {
            let (table, report) = convert_prerequisites(table)?;
            (table, ConversionReport::Curriculum(report))
        }
        RecordKind::Courses => plain(convert_courses(table, &rules.course_departments)?),
        RecordKind::GraduateGrades => {
            log_info("✔️  Validating converted grades...");
            let (table, report) = convert_graduate_grades(table, rules)?;
            (table, ConversionReport::Grades(report))
        }
        RecordKind::Students | RecordKind::SisConvert => plain(convert_students(table)),
        RecordKind::TwoWayEquivalency => gate(table, detect_one_way(table)?, options),
        RecordKind::CleaningEquivalency => {
            gate(table, detect_reverse_duplicates(table)?, options)
        }
        RecordKind::SisDuplicates => {
            let (table, report) =
                find_duplicate_differences(table, &rules.name_audit.key_column)?;
            (table, ConversionReport::Audit(report))
        }
        RecordKind::SisNameFields => {
            let (table, report) = check_fields(table, &rules.name_audit)?;
            (table, ConversionReport::Audit(report))
        }
        RecordKind::SisAll => sis_all(table, rules)?,
        RecordKind::SisPersonalInformation => plain(personal_information(table)),
        RecordKind::SisInstitute => plain(assign_institutes(table, &rules.sis_institutes)?),
        RecordKind::CategoryUndergrad => {
            plain(assign_categories(table, &RuleChain::undergraduate()))
        }
        RecordKind::CategoryGraduate => plain(assign_categories(table, &RuleChain::graduate())),
        RecordKind::SisMobileTitle => plain(mobile_and_title(table)),
    };
    Ok(converted)
}

fn plain(table: Table) -> (Table, ConversionReport) {
    (table, ConversionReport::Empty)
}

/// Detection always runs; removal only when the caller confirmed.
fn gate(
    table: &Table,
    mut report: EquivalencyReport,
    options: &ConvertOptions,
) -> (Table, ConversionReport) {
    let table = if report.is_clean() {
        table.clone()
    } else if options.confirm {
        log_warning(format!("Removing {} flagged row(s)", report.flagged.len()));
        report.applied = true;
        apply_removals(table, &report)
    } else {
        log_info("Flagged rows kept; rerun with confirmation to remove them");
        table.clone()
    };
    (table, ConversionReport::Equivalency(report))
}

/// Duplicate audit findings plus the full student conversion.
fn sis_all(table: &Table, rules: &Rules) -> SchemaResult<(Table, ConversionReport)> {
    let (_, report) = find_duplicate_differences(table, &rules.name_audit.key_column)?;
    Ok((convert_students(table), ConversionReport::Audit(report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::models::columns::{equivalency, programs, students};
    use crate::models::{text_cell, Record};
    use std::io::Write;

    fn row(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), text_cell(*v)))
            .collect()
    }

    fn equivalencies(pairs: &[(&str, &str)]) -> Table {
        Table::from_rows(
            pairs
                .iter()
                .map(|(a, b)| row(&[(equivalency::COURSE_A, a), (equivalency::COURSE_B, b)]))
                .collect(),
        )
    }

    #[test]
    fn test_gate_without_confirmation_keeps_rows() {
        let table = equivalencies(&[("A", "B"), ("C", "D"), ("D", "C")]);
        let conversion = convert(
            RecordKind::TwoWayEquivalency,
            &table,
            Rules::builtin(),
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(conversion.table, table);
        match conversion.report {
            ConversionReport::Equivalency(report) => {
                assert_eq!(report.rows(), vec![0]);
                assert!(!report.applied);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_gate_with_confirmation_removes_rows() {
        let table = equivalencies(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        let conversion = convert(
            RecordKind::CleaningEquivalency,
            &table,
            Rules::builtin(),
            &ConvertOptions { confirm: true },
        )
        .unwrap();

        assert_eq!(conversion.table.len(), 2);
        assert_eq!(conversion.file_name, "Two_way_course_equivalency_final.csv");
        match conversion.report {
            ConversionReport::Equivalency(report) => assert!(report.applied),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_missing_columns_abort() {
        let table = Table::new(&[programs::PROGRAM_CODE]);
        let err = convert(
            RecordKind::Programs,
            &table,
            Rules::builtin(),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_sis_all_reports_duplicates_and_converts() {
        let table = Table::from_rows(vec![
            row(&[(students::OUT_STUDENT_NUMBER, "12345"), (students::FIRST_NAME, "Ana")]),
            row(&[(students::OUT_STUDENT_NUMBER, "12345"), (students::FIRST_NAME, "Ann")]),
            row(&[(students::OUT_STUDENT_NUMBER, "99999"), (students::FIRST_NAME, "Ben")]),
        ]);
        let conversion = convert(
            RecordKind::SisAll,
            &table,
            Rules::builtin(),
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(conversion.table.len(), 3);
        assert_eq!(conversion.table.columns, students::OUTPUT);
        assert!(!conversion.report.is_clean());
    }

    #[test]
    fn test_every_kind_dispatches_on_empty_input() {
        for kind in RecordKind::ALL {
            let result = convert(
                *kind,
                &Table::default(),
                Rules::builtin(),
                &ConvertOptions::default(),
            );
            match result {
                Ok(conversion) => assert_eq!(conversion.file_name, kind.file_name()),
                Err(PipelineError::Schema(_)) => {}
                Err(other) => panic!("{}: {}", kind, other),
            }
        }
    }

    #[test]
    fn test_convert_file_records_csv_info() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Course A;Course B\nA;B\nB;A\n").unwrap();

        let conversion = convert_file(
            RecordKind::TwoWayEquivalency,
            file.path(),
            Rules::builtin(),
            &ConvertOptions::default(),
            &ParseOptions::default(),
        )
        .unwrap();

        let info = conversion.csv_info.unwrap();
        assert_eq!(info.delimiter, ';');
        assert_eq!(info.row_count, 2);
        assert_eq!(info.headers, vec!["Course A", "Course B"]);
        assert!(conversion.report.is_clean());
    }
}
