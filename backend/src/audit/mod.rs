//! SIS export audits: repeated keys and rows without any name.
//!
//! Both audits return the offending rows as a table, empty when nothing is
//! found, plus a small report for callers that only need counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::NameAudit;
use crate::error::{SchemaError, SchemaResult};
use crate::models::{cell_text, Record, Table};

/// Header names (lowercase) surfaced right after the key column.
const NAME_HEADERS: &[&str] = &["first name", "middle name", "last name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditCheck {
    DuplicateKeys,
    EmptyNameFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub check: AuditCheck,
    /// Column the findings are keyed and sorted by.
    pub key_column: String,
    /// Rows returned.
    pub row_count: usize,
    /// Distinct key values among the returned rows, sorted.
    pub keys: Vec<String>,
}

impl AuditReport {
    fn new(check: AuditCheck, key_column: &str, table: &Table) -> Self {
        let mut keys: Vec<String> = table.rows.iter().map(|r| cell_text(r, key_column)).collect();
        keys.dedup();
        Self {
            check,
            key_column: key_column.to_string(),
            row_count: table.len(),
            keys,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.row_count == 0
    }

    pub fn messages(&self) -> Vec<String> {
        if self.is_clean() {
            return vec![match self.check {
                AuditCheck::DuplicateKeys => format!("No duplicate {} found", self.key_column),
                AuditCheck::EmptyNameFields => {
                    "No rows found with all name fields empty".to_string()
                }
            }];
        }
        vec![match self.check {
            AuditCheck::DuplicateKeys => format!(
                "Found {} row(s) sharing {} {} value(s): {}",
                self.row_count,
                self.keys.len(),
                self.key_column,
                self.keys.join(", ")
            ),
            AuditCheck::EmptyNameFields => format!(
                "Found {} row(s) with every name field empty",
                self.row_count
            ),
        }]
    }
}

fn sorted_rows(mut rows: Vec<&Record>, key_column: &str) -> Vec<Record> {
    rows.sort_by_key(|r| cell_text(r, key_column));
    rows.into_iter().cloned().collect()
}

/// Every row whose `key_column` value occurs more than once, sorted by key.
///
/// Columns are reordered: key first, then first/middle/last name, then the
/// rest in input order.
pub fn find_duplicate_differences(
    table: &Table,
    key_column: &str,
) -> SchemaResult<(Table, AuditReport)> {
    if !table.has_column(key_column) {
        return Err(SchemaError::MissingColumns {
            table: "SIS".to_string(),
            columns: vec![key_column.to_string()],
        });
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in &table.rows {
        *counts.entry(cell_text(row, key_column)).or_default() += 1;
    }
    let repeated: Vec<&Record> = table
        .rows
        .iter()
        .filter(|r| counts.get(&cell_text(r, key_column)).copied().unwrap_or(0) > 1)
        .collect();

    let mut columns = vec![key_column.to_string()];
    columns.extend(
        table
            .columns
            .iter()
            .filter(|c| NAME_HEADERS.contains(&c.to_lowercase().as_str()))
            .cloned(),
    );
    let rest: Vec<String> = table
        .columns
        .iter()
        .filter(|c| !columns.contains(c))
        .cloned()
        .collect();
    columns.extend(rest);

    let found = Table {
        columns: table.columns.clone(),
        rows: sorted_rows(repeated, key_column),
    }
    .select(&columns);
    let report = AuditReport::new(AuditCheck::DuplicateKeys, key_column, &found);
    Ok((found, report))
}

/// Rows whose name fields are all blank, sorted by the key column when
/// present, otherwise by the first column.
pub fn check_fields(table: &Table, audit: &NameAudit) -> SchemaResult<(Table, AuditReport)> {
    let fields: Vec<&str> = audit.name_fields.iter().map(String::as_str).collect();
    let missing = table.missing_columns(&fields);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: "SIS".to_string(),
            columns: missing,
        });
    }

    let sort_column = if table.has_column(&audit.key_column) {
        audit.key_column.as_str()
    } else {
        table.columns.first().map(String::as_str).unwrap_or_default()
    };

    let blank: Vec<&Record> = table
        .rows
        .iter()
        .filter(|r| fields.iter().all(|f| cell_text(r, f).trim().is_empty()))
        .collect();

    let found = Table {
        columns: table.columns.clone(),
        rows: sorted_rows(blank, sort_column),
    };
    let report = AuditReport::new(AuditCheck::EmptyNameFields, sort_column, &found);
    Ok((found, report))
}
