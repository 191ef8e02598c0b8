//! Record-kind transforms without a domain module of their own, and the
//! pipeline that dispatches every kind.
//!
//! - Courses: department lookup and target layout
//! - Students: student template shared by the SIS kinds
//! - Pipeline: parse, convert, validate, gate

pub mod courses;
pub mod pipeline;
pub mod students;

pub use courses::convert_courses;
pub use pipeline::*;
pub use students::{convert_students, starting_term, transferee_status};
