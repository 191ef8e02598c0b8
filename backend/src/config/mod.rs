//! Conversion rules: lookup tables, the grade scale and heuristic rules.
//!
//! Built-in rules are embedded at compile time from `rules/default.json` and
//! parsed once. An alternative rules file can be loaded from disk or named
//! through the `EDUSUITE_RULES` environment variable (`.env` is honoured).
//!
//! Components receive the table they need by reference; nothing reads
//! these rules implicitly.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, ConfigResult};
use crate::grades::Remark;
use crate::normalize;

/// Environment variable naming an override rules file.
pub const RULES_ENV_VAR: &str = "EDUSUITE_RULES";

static BUILTIN: Lazy<Rules> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../rules/default.json")).expect("Invalid embedded rules")
});

// =============================================================================
// Rules
// =============================================================================

/// Every static table and heuristic the transforms consult.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    /// Department path → institute code, for curriculum rows.
    pub curriculum_institutes: LookupTable,
    /// Department path → department label, for the course catalogue.
    pub course_departments: LookupTable,
    /// Department name → institute code, for SIS exports.
    pub sis_institutes: LookupTable,
    pub grade_scale: GradeScale,
    pub elective_rule: ElectiveRule,
    pub name_audit: NameAudit,
}

impl Rules {
    /// The embedded default rules.
    pub fn builtin() -> &'static Rules {
        &BUILTIN
    }

    /// Parse rules from JSON text.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load rules from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Rules named by `EDUSUITE_RULES`, or the built-in rules when unset.
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var(RULES_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::builtin().clone()),
        }
    }

    /// Institute code for a curriculum department path, or `UNKNOWN`.
    pub fn map_institute(&self, code: &str) -> &str {
        self.curriculum_institutes.resolve(code)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

// =============================================================================
// Lookup Tables
// =============================================================================

/// A label and the strings that resolve to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupGroup {
    pub label: String,
    pub members: Vec<String>,
}

/// Ordered label → members lookup with a fallback label.
///
/// The first group containing the value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupTable {
    pub fallback: String,
    pub groups: Vec<LookupGroup>,
}

impl LookupTable {
    /// Resolve `value`, comparing both sides through `key`.
    pub fn resolve_with(&self, value: &str, key: fn(&str) -> String) -> &str {
        let wanted = key(value);
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| key(m) == wanted))
            .map(|g| g.label.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Resolve comparing trimmed, uppercased text.
    pub fn resolve(&self, value: &str) -> &str {
        self.resolve_with(value, normalize::upper_key)
    }
}

// =============================================================================
// Grade Scale
// =============================================================================

/// Raw grade tokens per remark class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeScale {
    pub pass: Vec<String>,
    pub fail: Vec<String>,
    pub no_credit: Vec<String>,
    /// Tokens marking a dropped enrolment.
    pub dropped: Vec<String>,
}

impl GradeScale {
    fn contains(list: &[String], grade: &str) -> bool {
        list.iter().any(|g| g.trim().to_uppercase() == grade)
    }

    /// Classify a raw grade. Tokens outside the pass and fail lists are
    /// `No Credit`.
    pub fn classify(&self, grade: &str) -> Remark {
        let grade = grade.trim().to_uppercase();
        if Self::contains(&self.pass, &grade) {
            Remark::Pass
        } else if Self::contains(&self.fail, &grade) {
            Remark::Fail
        } else {
            Remark::NoCredit
        }
    }

    /// Whether the grade token marks the enrolment as dropped.
    pub fn is_dropped(&self, grade: &str) -> bool {
        Self::contains(&self.dropped, &grade.trim().to_uppercase())
    }
}

// =============================================================================
// Elective Rule
// =============================================================================

/// A compiled regex that (de)serializes as its source text.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Pattern)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.0.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Rejects rows tagged `type_value` whose course code matches `code_pattern`.
///
/// The default flags `ELECTIVE` rows carrying a regular three-letter,
/// four-digit course code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectiveRule {
    pub type_value: String,
    pub code_pattern: Pattern,
}

impl ElectiveRule {
    pub fn new(type_value: &str, code_pattern: &str) -> ConfigResult<Self> {
        let code_pattern = Pattern::new(code_pattern).map_err(|e| ConfigError::Pattern {
            rule: "elective_rule".to_string(),
            pattern: code_pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            type_value: type_value.to_string(),
            code_pattern,
        })
    }

    /// Whether a row with this Type and course code must be rejected.
    pub fn rejects(&self, row_type: &str, course_code: &str) -> bool {
        row_type.trim().eq_ignore_ascii_case(self.type_value.trim())
            && self.code_pattern.is_match(course_code)
    }
}

// =============================================================================
// Name Audit
// =============================================================================

/// Columns used by the SIS audits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameAudit {
    /// Key for duplicate detection and sorting.
    pub key_column: String,
    /// Fields that must not all be blank.
    pub name_fields: Vec<String>,
}
