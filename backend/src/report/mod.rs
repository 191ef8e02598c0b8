//! Structured conversion reports.
//!
//! Every conversion returns its table together with one [`ConversionReport`].
//! Reports are plain data: shells render [`ConversionReport::messages`],
//! automated callers match on the variant.

use serde::Serialize;

use crate::audit::AuditReport;
use crate::curriculum::CurriculumReport;
use crate::equivalency::EquivalencyReport;
use crate::grades::GradeReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ConversionReport {
    /// Pure field mapping; nothing to report.
    Empty,
    Curriculum(CurriculumReport),
    Grades(GradeReport),
    Equivalency(EquivalencyReport),
    Audit(AuditReport),
}

impl ConversionReport {
    /// Whether nothing was found.
    pub fn is_clean(&self) -> bool {
        match self {
            ConversionReport::Empty => true,
            ConversionReport::Curriculum(r) => r.is_clean(),
            ConversionReport::Grades(r) => r.is_clean(),
            ConversionReport::Equivalency(r) => r.is_clean(),
            ConversionReport::Audit(r) => r.is_clean(),
        }
    }

    /// Human-readable findings, one line each.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ConversionReport::Empty => Vec::new(),
            ConversionReport::Curriculum(r) => r.messages(),
            ConversionReport::Grades(r) => r.messages(),
            ConversionReport::Equivalency(r) => r.messages(),
            ConversionReport::Audit(r) => r.messages(),
        }
    }
}
