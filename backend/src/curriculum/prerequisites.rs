//! Pre-Requisites conversion over an already converted curriculum.
//!
//! Any supplied prerequisite is discarded and rebuilt as the immediate chain.

use serde_json::Value;

use super::chain::{infer_chain, Chronological, Period};
use super::verify::{verify_output, TimelineColumns};
use super::{group_by_program, CurriculumReport, DroppedRow, PrerequisiteMode};
use crate::error::{SchemaError, SchemaResult};
use crate::models::columns::prerequisites;
use crate::models::{cell_text, text_cell, Record, Table};

struct Slot {
    key: (String, String),
    period: Period,
    course: String,
    record: Record,
}

impl Chronological for Slot {
    fn period(&self) -> Period {
        self.period
    }

    fn course(&self) -> &str {
        &self.course
    }
}

/// Rebuild the `Prerequisite` column as the immediate chain per
/// (program, revision). Rows are returned grouped and chronologically sorted.
pub fn convert_prerequisites(table: &Table) -> SchemaResult<(Table, CurriculumReport)> {
    let missing = table.missing_columns(prerequisites::REQUIRED);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: "Pre-Requisites".to_string(),
            columns: missing,
        });
    }

    let columns = TimelineColumns::PRE_REQUISITES;
    let mut report = CurriculumReport::new(PrerequisiteMode::InferChain);
    let mut slots = Vec::with_capacity(table.len());

    for (index, row) in table.rows.iter().enumerate() {
        let key = columns.group_key(row);
        let course = cell_text(row, columns.course);
        match columns.period(row) {
            Some(period) => slots.push(Slot {
                key,
                period,
                course,
                record: row.clone(),
            }),
            None => report.dropped_rows.push(DroppedRow {
                row: index,
                program_code: key.0,
                revision_id: key.1,
                course,
                reason: "academic year or term is not an integer".to_string(),
            }),
        }
    }

    let mut out_columns = table.columns.clone();
    if !table.has_column(columns.prerequisite) {
        out_columns.push(columns.prerequisite.to_string());
    }

    let mut rows = Vec::with_capacity(slots.len());
    for (_, group) in group_by_program(slots, |s| s.key.clone()) {
        let inferred = infer_chain(&group);
        for (slot, prerequisite) in group.into_iter().zip(inferred) {
            let mut record = slot.record;
            record.insert(columns.academic_year.into(), Value::from(slot.period.0));
            record.insert(columns.term.into(), Value::from(slot.period.1));
            record.insert(
                columns.prerequisite.into(),
                text_cell(prerequisite.unwrap_or_default()),
            );
            rows.push(record);
        }
    }

    let converted = Table {
        columns: out_columns,
        rows,
    };
    report.violations = verify_output(&converted, &columns);
    Ok((converted, report))
}
