//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::CsvResult;
use crate::models::RecordKind;
use crate::parser::write_csv;
use crate::report::ConversionReport;
use crate::transform::pipeline::{Conversion, CsvInfo};

/// Response to `POST /api/convert`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub job_id: String,
    /// `ready` when the report is clean, `warning` otherwise.
    pub status: String,
    pub kind: RecordKind,
    pub file_name: String,
    pub columns: Vec<String>,
    pub records: Vec<Value>,
    /// Converted table as CSV, ready to download.
    pub csv: String,
    pub report: ConversionReport,
    pub messages: Vec<String>,
    pub csv_info: Option<CsvInfo>,
}

impl ConvertResponse {
    pub fn from_conversion(conversion: Conversion) -> CsvResult<Self> {
        let csv = write_csv(&conversion.table)?;
        let status = if conversion.report.is_clean() { "ready" } else { "warning" };
        Ok(Self {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            kind: conversion.kind,
            file_name: conversion.file_name,
            records: conversion.table.to_json_records(),
            columns: conversion.table.columns,
            csv,
            messages: conversion.report.messages(),
            report: conversion.report,
            csv_info: conversion.csv_info,
        })
    }
}

/// Entry of `GET /api/kinds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindInfo {
    pub name: String,
    pub description: String,
    pub file_name: String,
    /// Whether findings are removed only with `confirm`.
    pub gated: bool,
}

impl From<RecordKind> for KindInfo {
    fn from(kind: RecordKind) -> Self {
        Self {
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            file_name: kind.file_name().to_string(),
            gated: kind.is_gated(),
        }
    }
}

/// Error body shared by every endpoint.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "records": [],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    #[test]
    fn test_response_from_conversion() {
        let mut table = Table::new(&["Course A", "Course B"]);
        table.rows.push(
            [("Course A", "A"), ("Course B", "B")]
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        );
        let conversion = Conversion {
            kind: RecordKind::TwoWayEquivalency,
            table,
            report: ConversionReport::Empty,
            file_name: "two_way_equivalency.csv".to_string(),
            csv_info: None,
        };

        let response = ConvertResponse::from_conversion(conversion).unwrap();
        assert_eq!(response.status, "ready");
        assert_eq!(response.csv, "Course A,Course B\nA,B\n");
        assert_eq!(response.records[0]["Course B"], "B");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "two-way-equivalency");
        assert_eq!(json["fileName"], "two_way_equivalency.csv");
        assert_eq!(json["report"]["type"], "empty");
    }

    #[test]
    fn test_kind_info() {
        let info = KindInfo::from(RecordKind::CleaningEquivalency);
        assert!(info.gated);
        assert_eq!(info.name, "cleaning-equivalency");
        assert!(!KindInfo::from(RecordKind::Programs).gated);
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("boom");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "boom");
    }
}
