//! Column names of the ERP exports and of the Edusuite import templates.
//!
//! Target headers are reproduced verbatim, instructions included, because
//! Edusuite matches them byte for byte on import.

/// Marker column every Edusuite template carries.
pub const IGNORE_MARKER: &str =
    "--- THIS ROW WILL BE IGNORED ON IMPORT. DO NOT DELETE THIS ROW. DO NOT REPLACE WITH ACTUAL VALUES. ---";

/// Raw curriculum export and converted program template.
pub mod programs {
    pub const PROGRAM_CODE: &str = "Program Code";
    pub const DESCRIPTION: &str = "Description";
    pub const INSTITUTE_CODE: &str = "Institute Code";
    pub const REVISION_ID: &str = "Revision ID";
    pub const ACADEMIC_YEAR: &str = "Academic Year";
    pub const TERM: &str = "Term";
    pub const TYPE: &str = "Type";
    pub const COURSE: &str = "Course";
    pub const PREREQUISITE: &str = "Prerequisite";
    pub const PARENT_ELECTIVE: &str = "Parent Elective Code(Leave blank if not an elective)";
    pub const DEFAULT_ELECTIVE: &str = "Default Elective (YES/NO)";
    pub const COREQUISITE: &str = "Corequisite";
    pub const REQUIRED_UNITS: &str = "Required Units";

    pub const OUT_ACADEMIC_YEAR: &str = "Academic Year(1,2,3...)";
    pub const OUT_TERM: &str = "Term(1,2,3...)";
    pub const OUT_COURSE: &str = "Course Code(Or child elective code)";

    /// Required raw columns.
    pub const REQUIRED: &[&str] = &[
        PROGRAM_CODE,
        REVISION_ID,
        ACADEMIC_YEAR,
        TERM,
        INSTITUTE_CODE,
        TYPE,
        COURSE,
    ];

    /// Target column order.
    pub const OUTPUT: &[&str] = &[
        PROGRAM_CODE,
        DESCRIPTION,
        INSTITUTE_CODE,
        REVISION_ID,
        OUT_ACADEMIC_YEAR,
        OUT_TERM,
        PARENT_ELECTIVE,
        OUT_COURSE,
        DEFAULT_ELECTIVE,
        PREREQUISITE,
        COREQUISITE,
        REQUIRED_UNITS,
        super::IGNORE_MARKER,
    ];
}

/// Curriculum rows that are already in the converted layout.
pub mod prerequisites {
    pub const PROGRAM_CODE: &str = "Program Code";
    pub const REVISION_ID: &str = "Revision ID";
    pub const ACADEMIC_YEAR: &str = "Academic Year (1, 2, 3...)";
    pub const TERM: &str = "Term (1, 2, 3...)";
    pub const COURSE: &str = "Course Code (Or child elective code)";
    pub const PREREQUISITE: &str = "Prerequisite";

    pub const REQUIRED: &[&str] = &[PROGRAM_CODE, REVISION_ID, ACADEMIC_YEAR, TERM, COURSE];
}

/// Raw course catalogue and converted course template.
pub mod courses {
    pub const COURSE_CODE: &str = "Course Code";
    pub const DISPLAY_NAME: &str = "Display Name";
    pub const DEPARTMENT_CODE: &str = "Department Code";
    pub const UNITS: &str = "Units";

    pub const DESCRIPTION: &str = "Description";
    pub const SCHEDULE_TYPE: &str = "Schedule Type(Input NONE if there is no schedule type)";
    pub const OUT_UNITS: &str = "Units(Must be numeric)";
    pub const LEC_UNITS: &str = "Lec Units(Must be numeric. Leave blank if not composite)";
    pub const LAB_UNITS: &str = "Lab Units(Must be numeric. Leave blank if not composite)";
    pub const GRADING_TYPE: &str = "Grading Type";
    pub const IN_OVERALL_AVERAGE: &str = "Included in Overall Average (Input YES or NO)";
    pub const CAPACITY: &str = "Course Capacity";
    pub const OVERWRITE: &str = "Overwrite existing record(YES/NO)";

    pub const REQUIRED: &[&str] = &[DEPARTMENT_CODE, COURSE_CODE];

    /// Target column order.
    pub const OUTPUT: &[&str] = &[
        COURSE_CODE,
        DESCRIPTION,
        SCHEDULE_TYPE,
        DEPARTMENT_CODE,
        OUT_UNITS,
        LEC_UNITS,
        LAB_UNITS,
        GRADING_TYPE,
        IN_OVERALL_AVERAGE,
        CAPACITY,
        OVERWRITE,
    ];
}

/// Raw graduate grade export and converted grade template.
pub mod grades {
    pub const STUDENT_NUMBER: &str = "Student Number";
    pub const COURSE_CODE: &str = "Course Code";
    pub const ELECTIVE_CODE: &str = "Elective Code";
    pub const IN_LIEU_OF: &str = "In Lieu Of (Original Course Code)";
    pub const IN_LIEU_OF_PARENT: &str =
        "In Lieu Of Parent Elective (Parent code of the original Course code)";
    pub const CREDITED: &str = "Credited";
    pub const DROPPED: &str = "Dropped (YES/NO)";
    pub const GRADE: &str = "Grade";
    pub const SCHOOL_SEMESTER: &str =
        "School Semester (Format should by YYYY-YYYY-[SEMESTER NUMBER])";
    pub const SCHOOL: &str = "School (Indicate the name of the school where the course was credited. This field is optional for credited grades.)";
    pub const REMARKS: &str = "Remarks";
    pub const GRADE_POINT: &str = "Grade Point";
    pub const PROGRAM_CODE: &str = "Program Code";
    pub const PROGRAM_REVISION_ID: &str = "Program Revision ID";
    pub const GRADING_SYSTEM: &str = "Grading System";
    pub const YEAR_LEVEL: &str = "Year Level";
    pub const CREDITED_COURSE_CODE: &str = "Credited Course Code";
    pub const CREDITED_COURSE_NAME: &str = "Credited Course Name";
    pub const CREDITED_COURSE_UNITS: &str = "Credited Course Units";
    pub const CREDITED_GRADE: &str = "Credited Grade";
    pub const OVERWRITE: &str = "Overwrite existing record (YES/NO)";
    pub const CURRENT_PROGRAM: &str = "Current Program";
    pub const PROGRAMS_MATCH: &str = "Is the 2 programs match?";

    pub const ACADEMIC_YEAR: &str = "Academic Year";
    pub const ACADEMIC_TERM: &str = "Academic Term";
    pub const PROGRAM: &str = "Program";

    pub const REQUIRED: &[&str] = &[GRADE, ACADEMIC_YEAR, ACADEMIC_TERM, PROGRAM];

    /// Target column order.
    pub const OUTPUT: &[&str] = &[
        STUDENT_NUMBER,
        COURSE_CODE,
        ELECTIVE_CODE,
        IN_LIEU_OF,
        IN_LIEU_OF_PARENT,
        CREDITED,
        DROPPED,
        GRADE,
        SCHOOL_SEMESTER,
        SCHOOL,
        REMARKS,
        GRADE_POINT,
        PROGRAM_CODE,
        PROGRAM_REVISION_ID,
        GRADING_SYSTEM,
        YEAR_LEVEL,
        CREDITED_COURSE_CODE,
        CREDITED_COURSE_NAME,
        CREDITED_COURSE_UNITS,
        CREDITED_GRADE,
        OVERWRITE,
        CURRENT_PROGRAM,
        PROGRAMS_MATCH,
    ];
}

/// Raw student export and converted student template.
pub mod students {
    pub const FIRST_NAME: &str = "First Name";
    pub const MIDDLE_NAME: &str = "Middle Name";
    pub const LAST_NAME: &str = "Last Name";
    pub const DATE_OF_BIRTH: &str = "Date of Birth";
    pub const GENDER: &str = "Gender";
    pub const EMAIL: &str = "Email";
    pub const ID: &str = "ID";
    pub const INTENDED_YEAR: &str = "Intended Academic Year";
    pub const INTENDED_TERM: &str = "Intended Academic Term";
    pub const FRESHMAN_WHEN_ADMITTED: &str = "Freshman when Admitted";
    pub const PROGRAM: &str = "Program";
    pub const REVISION: &str = "Revision";
    pub const TUITION_PLAN: &str = "Tuition Plan Name";

    pub const OUT_DATE_OF_BIRTH: &str = "Date of Birth(Must be in yyyy-MM-dd format)";
    pub const OUT_SEX: &str = "Sex(FEMALE,MALE)";
    pub const OUT_EMAIL: &str = "EMAIL";
    pub const OUT_STUDENT_NUMBER: &str = "Student Number";
    pub const OUT_STARTING_TERM: &str = "STARTING TERM";
    pub const OUT_TRANSFEREE: &str = "Is Transferee(TRANSFEREE,REGULAR)";
    pub const OUT_PROGRAM_CODE: &str = "Program Code";
    pub const OUT_PROGRAM_REVISION: &str = "Program Revision";

    /// Target column order.
    pub const OUTPUT: &[&str] = &[
        FIRST_NAME,
        MIDDLE_NAME,
        LAST_NAME,
        OUT_DATE_OF_BIRTH,
        OUT_SEX,
        OUT_EMAIL,
        OUT_STUDENT_NUMBER,
        OUT_STARTING_TERM,
        OUT_TRANSFEREE,
        OUT_PROGRAM_CODE,
        OUT_PROGRAM_REVISION,
        TUITION_PLAN,
        super::IGNORE_MARKER,
    ];
}

/// Course equivalency pairs.
pub mod equivalency {
    pub const COURSE_A: &str = "Course A";
    pub const COURSE_B: &str = "Course B";

    pub const REQUIRED: &[&str] = &[COURSE_A, COURSE_B];
}

/// SIS intake exports used by the cleaning and audit passes.
pub mod sis {
    pub const STUDENT_NUMBER: &str = "Student Number";
    pub const DEPARTMENT: &str = "Department";
    pub const INSTITUTE: &str = "Institute";
    pub const CATEGORY: &str = "category";
    pub const PROGRAM: &str = "Program";

    pub const TRANSFEREE: &str = "Transferee";
    pub const FRESHMAN_WHEN_ADMITTED: &str = "Freshman when Admitted";
    pub const FRESHMAN_FROM_SHS: &str = "Freshman from SHS";
    pub const FRESHMAN_FROM_HS: &str = "Freshman from HS";
    pub const FRESHMAN_FROM_ALS: &str = "Freshman from ALS";
    pub const CROSS_ENROLLEE: &str = "Cross-Enrollee";
    pub const SUPPLEMENTAL_COURSE: &str = "Supplemental Course";
    pub const TEACHER_CERTIFICATE: &str = "Teacher Certificate Program";
    pub const SECOND_DEGREE: &str = "Second Degree";
    pub const GRADUATE_FRESHMEN: &str = "Graduate - Freshmen";
    pub const GRADUATE_TRANSFEREE: &str = "Graduate - Transferee";

    pub const CONTACT_NO: &str = "Contact No.";
    pub const DATE_OF_BIRTH: &str = "Date of Birth";
    pub const GUARDIAN_NAME: &str = "Guardian Name";
    pub const GUARDIAN_CONTACT: &str = "Guardian's Contact Number";
    pub const RELATION: &str = "Relation to Student";
    pub const BIRTH_PLACE: &str = "Birth Place";
    pub const LANGUAGE_SPOKEN: &str = "Language Spoken";
    pub const FOREIGN_LANGUAGE: &str = "Foreign Language Spoken";
    pub const SALUTATION: &str = "Mr./Ms.";

    pub const MOBILE_COLUMNS: &[&str] = &["Mobile Phone", "Father Mobile", "Mother Mobile"];
}
