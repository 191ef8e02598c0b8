//! JSON Schema validation of converted tables.
//!
//! Output invariants are expressed as draft-7 schemas embedded at compile time
//! from the `schemas/` directory:
//! - `graduate-grade-row.json` - one converted graduate grade row
//!
//! Each property subschema is compiled on its own so failures can be counted
//! per column. The subschema `description` is the human-readable rule.
//!
//! Cells are validated as text: empty cells are checked as `""`.
//!
//! # Example
//!
//! ```rust,ignore
//! use edusuite::validation::RowSchema;
//!
//! let schema = RowSchema::graduate_grades()?;
//! for violation in schema.check(&table) {
//!     println!("{}", violation.message());
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::{cell_text, Record, Table};

/// Sample values kept per failing column.
pub const MAX_SAMPLES: usize = 5;

const GRADUATE_GRADE_ROW: &str = include_str!("../../schemas/graduate-grade-row.json");

/// Validate a JSON value against a schema.
///
/// # Returns
/// * `Ok(())` when valid
/// * `Err(Vec<String>)` with every error otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator =
        jsonschema::draft7::new(schema).map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// One column rule that some rows break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnViolation {
    pub column: String,
    pub rule: String,
    pub invalid_count: usize,
    /// First offending values, at most [`MAX_SAMPLES`].
    pub samples: Vec<String>,
}

impl ColumnViolation {
    pub fn message(&self) -> String {
        let mut msg = format!(
            "{} in {} row(s) (column '{}')",
            self.rule, self.invalid_count, self.column
        );
        if !self.samples.is_empty() {
            let quoted: Vec<String> = self.samples.iter().map(|s| format!("'{}'", s)).collect();
            msg.push_str(&format!("; e.g. {}", quoted.join(", ")));
        }
        msg
    }
}

struct ColumnRule {
    column: String,
    description: String,
    validator: jsonschema::Validator,
}

/// A row schema split into per-column validators.
pub struct RowSchema {
    schema: Value,
    rules: Vec<ColumnRule>,
}

impl RowSchema {
    /// Compile every property subschema of an object schema.
    pub fn from_schema(schema: Value) -> Result<Self, ValidationError> {
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let mut rules = Vec::with_capacity(properties.len());
        for (column, subschema) in properties {
            let validator =
                jsonschema::draft7::new(&subschema).map_err(|e| ValidationError::InvalidSchema {
                    field: column.clone(),
                    message: e.to_string(),
                })?;
            let description = subschema
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Invalid value in '{}'", column));
            rules.push(ColumnRule {
                column,
                description,
                validator,
            });
        }
        Ok(Self { schema, rules })
    }

    /// The embedded graduate grade row schema.
    pub fn graduate_grades() -> Result<Self, ValidationError> {
        let schema: Value =
            serde_json::from_str(GRADUATE_GRADE_ROW).expect("Invalid embedded schema");
        Self::from_schema(schema)
    }

    /// Columns this schema constrains, in schema order.
    pub fn columns(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.column.as_str()).collect()
    }

    /// Check every row column by column. Only failing columns are returned.
    pub fn check(&self, table: &Table) -> Vec<ColumnViolation> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let mut invalid_count = 0;
                let mut samples = Vec::new();
                for row in &table.rows {
                    let text = cell_text(row, &rule.column);
                    if !rule.validator.is_valid(&Value::String(text.clone())) {
                        invalid_count += 1;
                        if samples.len() < MAX_SAMPLES {
                            samples.push(text);
                        }
                    }
                }
                (invalid_count > 0).then(|| ColumnViolation {
                    column: rule.column.clone(),
                    rule: rule.description.clone(),
                    invalid_count,
                    samples,
                })
            })
            .collect()
    }

    /// Validate a single record against the whole schema.
    pub fn validate_record(&self, record: &Record) -> Result<(), Vec<String>> {
        let text_row: Map<String, Value> = record
            .keys()
            .map(|k| (k.clone(), Value::String(cell_text(record, k))))
            .collect();
        validate(&self.schema, &Value::Object(text_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::columns::grades;
    use serde_json::json;

    fn grade_row(semester: &str, remarks: &str, program: &str, revision: &str) -> Record {
        [
            (grades::SCHOOL_SEMESTER, semester),
            (grades::REMARKS, remarks),
            (grades::PROGRAM_CODE, program),
            (grades::PROGRAM_REVISION_ID, revision),
            (grades::DROPPED, "NO"),
            (grades::CREDITED, "YES"),
            (grades::OVERWRITE, "NO"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
    }

    #[test]
    fn test_validate_generic_schema() {
        let schema = json!({
            "type": "object",
            "required": ["name"],
            "properties": { "name": { "type": "string" } }
        });
        assert!(validate(&schema, &json!({ "name": "test" })).is_ok());
        assert!(validate(&schema, &json!({ "age": 42 })).is_err());
    }

    #[test]
    fn test_embedded_schema_compiles() {
        let schema = RowSchema::graduate_grades().unwrap();
        let columns = schema.columns();
        assert_eq!(columns.len(), 7);
        assert!(columns.contains(&grades::SCHOOL_SEMESTER));
        assert!(columns.contains(&grades::OVERWRITE));
    }

    #[test]
    fn test_clean_table_has_no_violations() {
        let schema = RowSchema::graduate_grades().unwrap();
        let table = Table::from_rows(vec![
            grade_row("2023-2024-1", "Pass", "MBA", "2021"),
            grade_row("2023-2024-3", "No Credit", "MBA", ""),
        ]);
        assert!(schema.check(&table).is_empty());
    }

    #[test]
    fn test_violations_count_rows_and_keep_samples() {
        let schema = RowSchema::graduate_grades().unwrap();
        let rows: Vec<Record> = (0..7)
            .map(|i| grade_row(&format!("bad-{}", i), "Pass", "MBA", "2021"))
            .collect();
        let violations = schema.check(&Table::from_rows(rows));

        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.column, grades::SCHOOL_SEMESTER);
        assert_eq!(v.invalid_count, 7);
        assert_eq!(v.samples.len(), MAX_SAMPLES);
        assert_eq!(v.samples[0], "bad-0");
        assert!(v.message().contains("7 row(s)"));
    }

    #[test]
    fn test_empty_program_code_and_bad_revision() {
        let schema = RowSchema::graduate_grades().unwrap();
        let mut row = grade_row("2023-2024-2", "Maybe", "  ", "21");
        row.insert(grades::DROPPED.to_string(), Value::Null);
        let violations = schema.check(&Table::from_rows(vec![row]));

        let columns: Vec<&str> = violations.iter().map(|v| v.column.as_str()).collect();
        assert!(columns.contains(&grades::REMARKS));
        assert!(columns.contains(&grades::PROGRAM_CODE));
        assert!(columns.contains(&grades::PROGRAM_REVISION_ID));
        assert!(columns.contains(&grades::DROPPED));
        assert!(!columns.contains(&grades::CREDITED));
    }

    #[test]
    fn test_validate_record() {
        let schema = RowSchema::graduate_grades().unwrap();
        assert!(schema
            .validate_record(&grade_row("2023-2024-1", "Pass", "MBA", ""))
            .is_ok());
        let errors = schema
            .validate_record(&grade_row("2023-2024-9", "Pass", "MBA", ""))
            .unwrap_err();
        assert!(!errors.is_empty());
    }
}
