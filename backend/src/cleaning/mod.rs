//! SIS cleaning passes and admission-category assignment.
//!
//! Per-row transforms over SIS exports. Columns a pass touches are only
//! rewritten when present; everything else passes through untouched.
//!
//! Categories come from an ordered [`RuleChain`]: rules are tried top to
//! bottom and the first match wins.

use std::fmt;

use crate::config::LookupTable;
use crate::error::{SchemaError, SchemaResult};
use crate::models::columns::sis;
use crate::models::{cell_text, text_cell, Record, Table};
use crate::normalize::{
    clean_contact, clean_relation, format_date, is_yes, normalize_salutation, smart_capitalize,
    SalutationMatch,
};

// =============================================================================
// Category Rules
// =============================================================================

/// A predicate over one SIS row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The flag column reads `yes` (trimmed, any case).
    Yes(String),
    /// The trimmed, uppercased `Program` starts with the prefix.
    ProgramStartsWith(String),
    /// The trimmed, uppercased `Program` contains the text.
    ProgramContains(String),
    All(Vec<Condition>),
}

impl Condition {
    pub fn yes(column: &str) -> Self {
        Condition::Yes(column.to_string())
    }

    pub fn matches(&self, row: &Record) -> bool {
        match self {
            Condition::Yes(column) => is_yes(&cell_text(row, column)),
            Condition::ProgramStartsWith(prefix) => program(row).starts_with(prefix.as_str()),
            Condition::ProgramContains(text) => program(row).contains(text.as_str()),
            Condition::All(all) => all.iter().all(|c| c.matches(row)),
        }
    }
}

fn program(row: &Record) -> String {
    cell_text(row, sis::PROGRAM).trim().to_uppercase()
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Yes(column) => write!(f, "{} = yes", column),
            Condition::ProgramStartsWith(prefix) => write!(f, "Program starts with {}", prefix),
            Condition::ProgramContains(text) => write!(f, "Program contains {}", text),
            Condition::All(all) => {
                let parts: Vec<String> = all.iter().map(|c| c.to_string()).collect();
                f.write_str(&parts.join(" and "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub condition: Condition,
    pub label: String,
}

impl CategoryRule {
    pub fn new(condition: Condition, label: &str) -> Self {
        Self {
            condition,
            label: label.to_string(),
        }
    }
}

/// Ordered (condition, label) pairs with a fallback label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleChain {
    pub rules: Vec<CategoryRule>,
    pub default: String,
}

impl RuleChain {
    /// Undergraduate admission categories.
    pub fn undergraduate() -> Self {
        let freshman = |flag: &str| {
            Condition::All(vec![
                Condition::yes(sis::FRESHMAN_WHEN_ADMITTED),
                Condition::yes(flag),
            ])
        };
        Self {
            rules: vec![
                CategoryRule::new(Condition::yes(sis::TRANSFEREE), "Transferee - Undergraduate"),
                CategoryRule::new(
                    freshman(sis::FRESHMAN_FROM_SHS),
                    "Freshman - Graduate from Senior High School",
                ),
                CategoryRule::new(
                    freshman(sis::FRESHMAN_FROM_HS),
                    "Freshman - Graduate from High School",
                ),
                CategoryRule::new(
                    freshman(sis::FRESHMAN_FROM_ALS),
                    "Freshman - Completer from ALS/PEPT",
                ),
                CategoryRule::new(
                    Condition::yes(sis::FRESHMAN_WHEN_ADMITTED),
                    "Freshman - Graduate from High School",
                ),
                CategoryRule::new(Condition::yes(sis::CROSS_ENROLLEE), "Cross-Enrollee"),
                CategoryRule::new(Condition::yes(sis::SUPPLEMENTAL_COURSE), "Supplemental Course"),
                CategoryRule::new(
                    Condition::yes(sis::TEACHER_CERTIFICATE),
                    "Teacher Certificate Program",
                ),
                CategoryRule::new(Condition::yes(sis::SECOND_DEGREE), "Second Degree"),
            ],
            default: "No Category found".to_string(),
        }
    }

    /// Graduate admission categories.
    pub fn graduate() -> Self {
        let jd = || Condition::ProgramStartsWith("JD".to_string());
        Self {
            rules: vec![
                CategoryRule::new(
                    Condition::All(vec![jd(), Condition::yes(sis::TRANSFEREE)]),
                    "Transferee - Juris Doctor",
                ),
                CategoryRule::new(jd(), "Freshman - Juris Doctor"),
                CategoryRule::new(
                    Condition::ProgramContains("TCP".to_string()),
                    "Teacher Certificate Program",
                ),
                CategoryRule::new(
                    Condition::ProgramContains("SUPPLEMENTAL".to_string()),
                    "Supplemental Course",
                ),
                CategoryRule::new(
                    Condition::yes(sis::GRADUATE_FRESHMEN),
                    "Freshman - Graduate Studies",
                ),
                CategoryRule::new(
                    Condition::yes(sis::GRADUATE_TRANSFEREE),
                    "Transferee - Graduate Studies",
                ),
            ],
            default: "Freshman - Graduate Studies".to_string(),
        }
    }

    /// Label of the first matching rule, or the default.
    pub fn classify(&self, row: &Record) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.condition.matches(row))
            .map(|rule| rule.label.as_str())
            .unwrap_or(self.default.as_str())
    }
}

/// Append a `category` column computed by `chain`.
pub fn assign_categories(table: &Table, chain: &RuleChain) -> Table {
    let mut out = table.clone();
    for (index, row) in table.rows.iter().enumerate() {
        out.set(index, sis::CATEGORY, text_cell(chain.classify(row)));
    }
    out.ensure_column(sis::CATEGORY);
    out
}

// =============================================================================
// Cleaning Passes
// =============================================================================

/// Rewrite a column in place when present. Empty cells stay empty.
fn map_column(table: &mut Table, column: &str, f: impl Fn(&str) -> String) {
    if !table.has_column(column) {
        return;
    }
    for row in &mut table.rows {
        let text = cell_text(row, column);
        let value = if text.trim().is_empty() {
            text_cell("")
        } else {
            text_cell(f(&text))
        };
        row.insert(column.to_string(), value);
    }
}

/// Contacts to digits, dates to `yyyy-MM-dd`, names and places capitalized,
/// relation title-cased, exact `Mr.`/`Ms.` normalization.
pub fn personal_information(table: &Table) -> Table {
    let mut out = table.clone();
    map_column(&mut out, sis::CONTACT_NO, clean_contact);
    map_column(&mut out, sis::DATE_OF_BIRTH, format_date);
    map_column(&mut out, sis::GUARDIAN_NAME, smart_capitalize);
    map_column(&mut out, sis::GUARDIAN_CONTACT, clean_contact);
    map_column(&mut out, sis::RELATION, clean_relation);
    map_column(&mut out, sis::BIRTH_PLACE, smart_capitalize);
    map_column(&mut out, sis::LANGUAGE_SPOKEN, smart_capitalize);
    map_column(&mut out, sis::FOREIGN_LANGUAGE, smart_capitalize);
    map_column(&mut out, sis::SALUTATION, |t| {
        normalize_salutation(t, SalutationMatch::Exact)
    });
    out
}

/// Map `Department` to an `Institute` column.
pub fn assign_institutes(table: &Table, institutes: &LookupTable) -> SchemaResult<Table> {
    if !table.has_column(sis::DEPARTMENT) {
        return Err(SchemaError::MissingColumns {
            table: "SIS".to_string(),
            columns: vec![sis::DEPARTMENT.to_string()],
        });
    }
    let mut out = table.clone();
    for (index, row) in table.rows.iter().enumerate() {
        let institute = institutes.resolve(&cell_text(row, sis::DEPARTMENT));
        out.set(index, sis::INSTITUTE, text_cell(institute));
    }
    out.ensure_column(sis::INSTITUTE);
    Ok(out)
}

/// Mobile numbers to digits and prefix `Mr.`/`Ms.` normalization.
pub fn mobile_and_title(table: &Table) -> Table {
    let mut out = table.clone();
    map_column(&mut out, sis::SALUTATION, |t| {
        normalize_salutation(t, SalutationMatch::Prefix)
    });
    for column in sis::MOBILE_COLUMNS {
        map_column(&mut out, column, clean_contact);
    }
    out
}
