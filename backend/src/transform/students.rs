//! Student master-data conversion, shared by the Students and SIS kinds.
//!
//! Lenient: absent inputs produce blank outputs.

use crate::models::columns::students;
use crate::models::{cell_text, text_cell, Record, Table};
use crate::normalize::{digits_and_hyphens, first_digit_run, format_date, letters_only};

/// `First Semester` → `1` and so on; other text passes through.
fn term_number(term: &str) -> &str {
    match term {
        "First Semester" => "1",
        "Second Semester" => "2",
        "Third Semester" => "3",
        other => other,
    }
}

/// `YYYY-YYYY-N` from the intended academic year and term.
pub fn starting_term(year: &str, term: &str) -> String {
    format!("{}-{}", digits_and_hyphens(year), term_number(term))
}

/// `TRANSFEREE` when the student was not a freshman on admission.
pub fn transferee_status(freshman_when_admitted: &str) -> &'static str {
    if freshman_when_admitted.trim().eq_ignore_ascii_case("no") {
        "TRANSFEREE"
    } else {
        "REGULAR"
    }
}

fn convert_row(row: &Record) -> Record {
    let text = |column: &str| cell_text(row, column);
    let student_number = if row.contains_key(students::ID) {
        text(students::ID)
    } else {
        text(students::OUT_STUDENT_NUMBER)
    };

    let mut out = row.clone();
    let mut put = |column: &str, value: String| {
        out.insert(column.to_string(), text_cell(value));
    };
    put(
        students::OUT_DATE_OF_BIRTH,
        format_date(&text(students::DATE_OF_BIRTH)),
    );
    put(students::OUT_SEX, text(students::GENDER).to_uppercase());
    put(students::OUT_EMAIL, text(students::EMAIL));
    put(students::OUT_STUDENT_NUMBER, student_number);
    put(
        students::OUT_STARTING_TERM,
        starting_term(
            &text(students::INTENDED_YEAR),
            &text(students::INTENDED_TERM),
        ),
    );
    put(
        students::OUT_TRANSFEREE,
        transferee_status(&text(students::FRESHMAN_WHEN_ADMITTED)).to_string(),
    );
    put(students::OUT_PROGRAM_CODE, letters_only(&text(students::PROGRAM)));
    put(
        students::OUT_PROGRAM_REVISION,
        first_digit_run(&text(students::REVISION)),
    );
    out
}

/// Convert a student or SIS export to the student template.
pub fn convert_students(table: &Table) -> Table {
    Table {
        columns: table.columns.clone(),
        rows: table.rows.iter().map(convert_row).collect(),
    }
    .select(students::OUTPUT)
}
