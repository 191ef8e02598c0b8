//! # Edusuite - academic-records conversion
//!
//! Converts ERP exports (curricula, courses, grades, students, equivalencies,
//! SIS extracts) into Edusuite import tables, enforcing cross-row academic
//! rules and reporting what it found.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform   │────▶│  CSV + JSON │
//! │ (UTF8/1252) │     │ (auto-enc)  │     │ (per kind)   │     │   report    │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//!                                                │
//!                          normalize · config::Rules · validation
//! ```
//!
//! ## Quick Start
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
//! for message in conversion.report.messages() {
//!     eprintln!("{}", message);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - `Table`, `Record`, `RecordKind` and column names
//! - [`normalize`] - Pure text normalizers
//! - [`config`] - Lookup tables, grade scale and heuristic rules
//! - [`parser`] - CSV reading with auto-detection, CSV writing
//! - [`curriculum`] - Programs and prerequisite chains
//! - [`grades`] - Graduate grade derivation
//! - [`validation`] - JSON Schema checks over converted tables
//! - [`equivalency`] - Equivalency consistency checks
//! - [`audit`] - SIS duplicate and empty-name audits
//! - [`cleaning`] - SIS cleaning and category assignment
//! - [`transform`] - Courses, students and the conversion pipeline
//! - [`report`] - Structured conversion reports
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;

// Parsing
pub mod parser;

// Record kinds
pub mod audit;
pub mod cleaning;
pub mod curriculum;
pub mod equivalency;
pub mod grades;
pub mod transform;

// Validation and reports
pub mod report;
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ConfigError, CsvError, PipelineError, SchemaError, ServerError, ValidationError,
};

// =============================================================================
// Re-exports - Models and rules
// =============================================================================

pub use config::{LookupTable, Rules};
pub use models::{RecordKind, Table};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    parse_bytes, parse_str, read_table_file, write_csv, write_csv_file, ParseOptions,
    ParsedTable,
};

// =============================================================================
// Re-exports - Pipeline and reports
// =============================================================================

pub use report::ConversionReport;
pub use transform::pipeline::{
    convert, convert_bytes, convert_file, Conversion, ConvertOptions, CsvInfo,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ConvertResponse, KindInfo};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
