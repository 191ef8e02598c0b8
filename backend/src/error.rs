//! Error types for the Edusuite conversion pipeline.
//!
//! - [`CsvError`] - reading, decoding and parsing delimited input
//! - [`SchemaError`] - a transform's required input columns are absent
//! - [`ConfigError`] - rule files that cannot be loaded
//! - [`ValidationError`] - embedded output schemas that cannot be compiled
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP shell errors
//!
//! Value-level problems (unparseable years, invalid prerequisites, one-way
//! equivalencies) are never errors: they travel as structured reports next to
//! the converted table. See [`crate::report`].

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing delimited text.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded with any supported encoding.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Malformed delimited text.
    #[error("Invalid CSV format at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Nothing to read.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Failed to serialize a table.
    #[error("Failed to write CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Required input columns are missing; the affected conversion is aborted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{table}: missing required column(s): {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },
}

impl SchemaError {
    /// Names of the absent columns.
    pub fn columns(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns { columns, .. } => columns,
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading conversion rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}' for {rule}: {message}")]
    Pattern {
        rule: String,
        pattern: String,
        message: String,
    },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised by the schema-backed output validators.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Embedded schema failed to compile.
    #[error("Invalid schema for '{field}': {message}")]
    InvalidSchema { field: String, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown conversion kind: {0}")]
    UnknownKind(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type CsvResult<T> = Result<T, CsvError>;

pub type SchemaResult<T> = Result<T, SchemaError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let schema_err = SchemaError::MissingColumns {
            table: "Programs".into(),
            columns: vec!["Type".into(), "Course".into()],
        };
        let pipeline_err: PipelineError = schema_err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.contains("Programs"));
        assert!(msg.contains("Type, Course"));
    }

    #[test]
    fn test_schema_error_columns() {
        let err = SchemaError::MissingColumns {
            table: "Courses".into(),
            columns: vec!["Department Code".into()],
        };
        assert_eq!(err.columns(), &["Department Code".to_string()]);
    }

    #[test]
    fn test_pattern_error_format() {
        let err = ConfigError::Pattern {
            rule: "elective_rule".into(),
            pattern: "[".into(),
            message: "unclosed class".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("elective_rule"));
        assert!(msg.contains("unclosed class"));
    }
}
