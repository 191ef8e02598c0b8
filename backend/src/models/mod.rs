//! Domain models for the conversion pipeline.
//!
//! - [`Record`] - one row, an ordered column → cell mapping
//! - [`Table`] - rows sharing an ordered column set
//! - [`RecordKind`] - every conversion the shells offer, with its export name
//! - [`columns`] - raw and target column names

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod columns;

// =============================================================================
// Record / Table
// =============================================================================

/// One row. Empty cells are `Value::Null`, numeric cells `Value::Number`.
pub type Record = Map<String, Value>;

/// Read a cell as text. Absent and null cells read as `""`.
pub fn cell_text(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(value) => value_text(value),
        None => String::new(),
    }
}

/// Render a cell value as text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Text cell; empty text becomes an empty cell.
pub fn text_cell(text: impl Into<String>) -> Value {
    let text = text.into();
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text)
    }
}

/// An in-memory table: ordered columns plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    /// Empty table with the given columns.
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from rows; the column order is taken from first sight.
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Required columns that are absent, in the order asked for.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Text of a cell; out-of-range rows read as `""`.
    pub fn cell(&self, row: usize, column: &str) -> String {
        self.rows
            .get(row)
            .map(|r| cell_text(r, column))
            .unwrap_or_default()
    }

    /// Add an empty column if it is not present yet.
    pub fn ensure_column(&mut self, column: &str) {
        if self.has_column(column) {
            return;
        }
        self.columns.push(column.to_string());
        for row in &mut self.rows {
            row.entry(column.to_string()).or_insert(Value::Null);
        }
    }

    /// Set a cell, registering the column when new.
    pub fn set(&mut self, row: usize, column: &str, value: Value) {
        if !self.has_column(column) {
            self.ensure_column(column);
        }
        if let Some(record) = self.rows.get_mut(row) {
            record.insert(column.to_string(), value);
        }
    }

    /// Project onto `columns`, in that order. Absent columns are filled empty
    /// and every other column is dropped.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|row| project(row, columns))
            .collect();
        Table {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows,
        }
    }

    /// Keep rows whose index is not in `drop`, preserving order.
    pub fn without_rows(&self, drop: &[usize]) -> Table {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| !drop.contains(i))
            .map(|(_, r)| r.clone())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows as JSON objects, every column present.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| Value::Object(project(row, &self.columns)))
            .collect()
    }
}

fn project<S: AsRef<str>>(row: &Record, columns: &[S]) -> Record {
    let mut out = Map::new();
    for column in columns {
        let column = column.as_ref();
        let value = row.get(column).cloned().unwrap_or(Value::Null);
        out.insert(column.to_string(), value);
    }
    out
}

// =============================================================================
// Record Kind
// =============================================================================

/// Every conversion offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Programs,
    Courses,
    GraduateGrades,
    Students,
    PreRequisites,
    TwoWayEquivalency,
    CleaningEquivalency,
    SisDuplicates,
    SisConvert,
    SisNameFields,
    SisAll,
    SisPersonalInformation,
    SisInstitute,
    CategoryUndergrad,
    CategoryGraduate,
    SisMobileTitle,
}

impl RecordKind {
    pub const ALL: &'static [RecordKind] = &[
        RecordKind::Programs,
        RecordKind::Courses,
        RecordKind::GraduateGrades,
        RecordKind::Students,
        RecordKind::PreRequisites,
        RecordKind::TwoWayEquivalency,
        RecordKind::CleaningEquivalency,
        RecordKind::SisDuplicates,
        RecordKind::SisConvert,
        RecordKind::SisNameFields,
        RecordKind::SisAll,
        RecordKind::SisPersonalInformation,
        RecordKind::SisInstitute,
        RecordKind::CategoryUndergrad,
        RecordKind::CategoryGraduate,
        RecordKind::SisMobileTitle,
    ];

    /// Kebab-case name used on the command line and in the API.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Programs => "programs",
            Self::Courses => "courses",
            Self::GraduateGrades => "graduate-grades",
            Self::Students => "students",
            Self::PreRequisites => "pre-requisites",
            Self::TwoWayEquivalency => "two-way-equivalency",
            Self::CleaningEquivalency => "cleaning-equivalency",
            Self::SisDuplicates => "sis-duplicates",
            Self::SisConvert => "sis-convert",
            Self::SisNameFields => "sis-name-fields",
            Self::SisAll => "sis-all",
            Self::SisPersonalInformation => "sis-personal-information",
            Self::SisInstitute => "sis-institute",
            Self::CategoryUndergrad => "category-undergrad",
            Self::CategoryGraduate => "category-graduate",
            Self::SisMobileTitle => "sis-mobile-title",
        }
    }

    /// File name the converted table is exported under.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Programs => "converted_programs.csv",
            Self::Courses => "converted_courses.csv",
            Self::GraduateGrades => "graduate_grades.csv",
            Self::Students => "converted_students.csv",
            Self::PreRequisites => "pre_requisites.csv",
            Self::TwoWayEquivalency => "two_way_equivalency.csv",
            Self::CleaningEquivalency => "Two_way_course_equivalency_final.csv",
            Self::SisDuplicates => "converted_duplicate_sis.csv",
            Self::SisConvert => "converted_sis.csv",
            Self::SisNameFields => "converted_checked_fields.csv",
            Self::SisAll => "converted_sis_all.csv",
            Self::SisPersonalInformation => "sis_personal_information.csv",
            Self::SisInstitute => "sis_institute_information.csv",
            Self::CategoryUndergrad => "sis_category_bachelor.csv",
            Self::CategoryGraduate => "sis_category_graduate.csv",
            Self::SisMobileTitle => "sis_mobilephone_mrms.csv",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Programs => "Curriculum rows with prerequisite inference/validation",
            Self::Courses => "Course catalogue with department mapping",
            Self::GraduateGrades => "Graduate grades with derived fields and validation",
            Self::Students => "Student master data",
            Self::PreRequisites => "Immediate prerequisite chain for converted curricula",
            Self::TwoWayEquivalency => "Flag course equivalencies without a reverse pair",
            Self::CleaningEquivalency => "Flag reverse-duplicate equivalency pairs",
            Self::SisDuplicates => "Rows sharing a Student Number",
            Self::SisConvert => "SIS export to the student template",
            Self::SisNameFields => "Rows with every name field empty",
            Self::SisAll => "Duplicate audit plus student conversion",
            Self::SisPersonalInformation => "Contacts, dates and name capitalization",
            Self::SisInstitute => "Department to institute mapping",
            Self::CategoryUndergrad => "Undergraduate admission category",
            Self::CategoryGraduate => "Graduate admission category",
            Self::SisMobileTitle => "Mobile numbers and Mr./Ms. titles",
        }
    }

    /// Whether the conversion deletes rows only after confirmation.
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::TwoWayEquivalency | Self::CleaningEquivalency)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| format!("unknown conversion kind '{}'", s))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_cell_text_variants() {
        let row = record(json!({ "a": "x", "b": 3, "c": null }));
        assert_eq!(cell_text(&row, "a"), "x");
        assert_eq!(cell_text(&row, "b"), "3");
        assert_eq!(cell_text(&row, "c"), "");
        assert_eq!(cell_text(&row, "missing"), "");
    }

    #[test]
    fn test_from_rows_keeps_first_seen_order() {
        let table = Table::from_rows(vec![
            record(json!({ "z": "1", "a": "2" })),
            record(json!({ "m": "3" })),
        ]);
        assert_eq!(table.columns, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_select_fills_and_drops() {
        let table = Table::from_rows(vec![record(json!({ "a": "1", "b": "2" }))]);
        let projected = table.select(&["b", "c"]);
        assert_eq!(projected.columns, vec!["b", "c"]);
        assert_eq!(projected.cell(0, "b"), "2");
        assert_eq!(projected.rows[0].get("c"), Some(&Value::Null));
        assert!(projected.rows[0].get("a").is_none());
    }

    #[test]
    fn test_missing_columns() {
        let table = Table::new(&["Course A"]);
        assert_eq!(
            table.missing_columns(&["Course A", "Course B"]),
            vec!["Course B".to_string()]
        );
    }

    #[test]
    fn test_without_rows() {
        let table = Table::from_rows(vec![
            record(json!({ "a": "0" })),
            record(json!({ "a": "1" })),
            record(json!({ "a": "2" })),
        ]);
        let kept = table.without_rows(&[1]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.cell(1, "a"), "2");
    }

    #[test]
    fn test_record_kind_parse_and_names() {
        assert_eq!("programs".parse::<RecordKind>(), Ok(RecordKind::Programs));
        assert_eq!(
            "Graduate_Grades".parse::<RecordKind>(),
            Ok(RecordKind::GraduateGrades)
        );
        assert!("nope".parse::<RecordKind>().is_err());
        assert_eq!(RecordKind::PreRequisites.file_name(), "pre_requisites.csv");
        for kind in RecordKind::ALL {
            assert_eq!(kind.name().parse::<RecordKind>(), Ok(*kind));
        }
    }

    #[test]
    fn test_gated_kinds() {
        assert!(RecordKind::TwoWayEquivalency.is_gated());
        assert!(RecordKind::CleaningEquivalency.is_gated());
        assert!(!RecordKind::Programs.is_gated());
    }
}
