//! Course equivalency consistency checks.
//!
//! Detection and removal are separate steps. `detect_*` never changes the
//! table; [`apply_removals`] drops the flagged rows and is only called once
//! the caller confirmed the destructive action.
//!
//! Pairs compare as exact cell text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::models::columns::equivalency;
use crate::models::{cell_text, Table};

/// An ordered (Course A, Course B) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalencyPair {
    pub course_a: String,
    pub course_b: String,
}

impl EquivalencyPair {
    pub fn new(course_a: impl Into<String>, course_b: impl Into<String>) -> Self {
        Self {
            course_a: course_a.into(),
            course_b: course_b.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.course_b.clone(), self.course_a.clone())
    }

    /// Order-independent key.
    pub fn unordered_key(&self) -> (String, String) {
        if self.course_a <= self.course_b {
            (self.course_a.clone(), self.course_b.clone())
        } else {
            (self.course_b.clone(), self.course_a.clone())
        }
    }
}

/// Which consistency rule flagged the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquivalencyCheck {
    /// The reverse pair is missing.
    OneWay,
    /// An earlier row already holds the same unordered pair.
    ReverseDuplicate,
}

/// A flagged row and its pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedPair {
    pub row: usize,
    pub pair: EquivalencyPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalencyReport {
    pub check: EquivalencyCheck,
    pub flagged: Vec<FlaggedPair>,
    /// Whether the flagged rows were removed from the returned table.
    pub applied: bool,
}

impl EquivalencyReport {
    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Row indexes to remove, ascending.
    pub fn rows(&self) -> Vec<usize> {
        self.flagged.iter().map(|f| f.row).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        let what = match self.check {
            EquivalencyCheck::OneWay => "has no reverse pair",
            EquivalencyCheck::ReverseDuplicate => "duplicates an earlier pair",
        };
        let mut out: Vec<String> = self
            .flagged
            .iter()
            .map(|f| {
                format!(
                    "Row {}: '{}' ↔ '{}' {}",
                    f.row + 1,
                    f.pair.course_a,
                    f.pair.course_b,
                    what
                )
            })
            .collect();
        if !self.flagged.is_empty() {
            out.push(if self.applied {
                format!("Removed {} row(s)", self.flagged.len())
            } else {
                format!(
                    "{} row(s) flagged, not removed (confirmation required)",
                    self.flagged.len()
                )
            });
        }
        out
    }
}

/// Read the (Course A, Course B) pair of every row.
pub fn pairs(table: &Table) -> SchemaResult<Vec<EquivalencyPair>> {
    let missing = table.missing_columns(equivalency::REQUIRED);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            table: "Course Equivalency".to_string(),
            columns: missing,
        });
    }
    Ok(table
        .rows
        .iter()
        .map(|row| {
            EquivalencyPair::new(
                cell_text(row, equivalency::COURSE_A),
                cell_text(row, equivalency::COURSE_B),
            )
        })
        .collect())
}

/// Flag every row whose reverse pair is absent from the table.
pub fn detect_one_way(table: &Table) -> SchemaResult<EquivalencyReport> {
    let pairs = pairs(table)?;
    let present: HashSet<&EquivalencyPair> = pairs.iter().collect();
    let flagged = pairs
        .iter()
        .enumerate()
        .filter(|(_, pair)| !present.contains(&pair.reversed()))
        .map(|(row, pair)| FlaggedPair {
            row,
            pair: pair.clone(),
        })
        .collect();
    Ok(EquivalencyReport {
        check: EquivalencyCheck::OneWay,
        flagged,
        applied: false,
    })
}

/// Flag every row whose unordered pair was already seen on an earlier row.
pub fn detect_reverse_duplicates(table: &Table) -> SchemaResult<EquivalencyReport> {
    let pairs = pairs(table)?;
    let mut seen = HashSet::new();
    let flagged = pairs
        .into_iter()
        .enumerate()
        .filter(|(_, pair)| !seen.insert(pair.unordered_key()))
        .map(|(row, pair)| FlaggedPair { row, pair })
        .collect();
    Ok(EquivalencyReport {
        check: EquivalencyCheck::ReverseDuplicate,
        flagged,
        applied: false,
    })
}

/// Drop the rows a report flagged.
pub fn apply_removals(table: &Table, report: &EquivalencyReport) -> Table {
    table.without_rows(&report.rows())
}
