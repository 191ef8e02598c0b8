//! Course catalogue conversion.

use crate::config::LookupTable;
use crate::error::{SchemaError, SchemaResult};
use crate::models::columns::courses;
use crate::models::{cell_text, text_cell, Record, Table};
use crate::normalize::normalize_department;

/// Copy `from` into `to` when the source column exists.
fn rename(row: &mut Record, from: &str, to: &str) {
    if let Some(value) = row.get(from).cloned() {
        row.insert(to.to_string(), value);
    }
}

/// Map department paths to department labels and project onto the course
/// template. Absent optional columns stay blank.
pub fn convert_courses(table: &Table, departments: &LookupTable) -> SchemaResult<Table> {
    let missing = table.missing_columns(courses::REQUIRED);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: "Courses".to_string(),
            columns: missing,
        });
    }

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            let department = departments.resolve_with(
                &cell_text(row, courses::DEPARTMENT_CODE),
                normalize_department,
            );
            out.insert(courses::DEPARTMENT_CODE.to_string(), text_cell(department));
            rename(&mut out, courses::DISPLAY_NAME, courses::DESCRIPTION);
            rename(&mut out, courses::UNITS, courses::OUT_UNITS);
            out
        })
        .collect();

    Ok(Table {
        columns: table.columns.clone(),
        rows,
    }
    .select(courses::OUTPUT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use serde_json::Value;

    fn course(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), text_cell(*v)))
            .collect()
    }

    #[test]
    fn test_convert_courses() {
        let table = Table::from_rows(vec![course(&[
            (courses::COURSE_CODE, "ACC101"),
            (courses::DISPLAY_NAME, "Financial Accounting"),
            (
                courses::DEPARTMENT_CODE,
                "academic:inst. of arts and sciences:filipino department:filip ederp",
            ),
            (courses::UNITS, "3"),
            (courses::GRADING_TYPE, "Numeric"),
        ])]);
        let out = convert_courses(&table, &Rules::builtin().course_departments).unwrap();

        assert_eq!(out.columns, courses::OUTPUT);
        assert_eq!(out.cell(0, courses::DEPARTMENT_CODE), "FILIP edERP");
        assert_eq!(out.cell(0, courses::DESCRIPTION), "Financial Accounting");
        assert_eq!(out.cell(0, courses::OUT_UNITS), "3");
        assert_eq!(out.cell(0, courses::GRADING_TYPE), "Numeric");
        assert_eq!(out.rows[0][courses::CAPACITY], Value::Null);
    }

    #[test]
    fn test_unknown_department() {
        let table = Table::from_rows(vec![course(&[
            (courses::COURSE_CODE, "X1"),
            (courses::DEPARTMENT_CODE, "Nowhere"),
        ])]);
        let out = convert_courses(&table, &Rules::builtin().course_departments).unwrap();
        assert_eq!(out.cell(0, courses::DEPARTMENT_CODE), "UNKNOWN");
        assert_eq!(out.cell(0, courses::DESCRIPTION), "");
    }

    #[test]
    fn test_requires_department_and_code() {
        let table = Table::new(&[courses::DISPLAY_NAME]);
        let err = convert_courses(&table, &Rules::builtin().course_departments).unwrap_err();
        assert_eq!(err.columns().len(), 2);
    }
}
