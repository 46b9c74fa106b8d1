//! Domain layer: student records, grades and input validation.
//!
//! Everything here is free of I/O. The store and HTTP layers build on
//! these types; validation is a pure function from raw JSON to either a
//! validated record or a field-error map.

pub mod grade;
pub mod student;
pub mod student_id;
pub mod validation;

pub use grade::{Grade, GradeError};
pub use student::{NewStudent, Student, StudentFilter, StudentPatch};
pub use student_id::StudentId;
pub use validation::FieldErrors;
