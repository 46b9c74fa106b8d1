//! Student record and its validated inputs.

use std::fmt;

use super::{Grade, StudentId};

/// A persisted student record.
///
/// Every field is populated; `id` is assigned by the store and never
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Store-assigned identifier.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: i32,
    /// Major (degree programme).
    pub major: String,
    /// Average grade, two decimal places.
    pub average_grade: Grade,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.major)
    }
}

/// A complete, validated set of student fields without an id.
///
/// Produced by [`super::validation::validate_new`]; used for create and
/// full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Full name, trimmed and non-empty.
    pub name: String,
    /// Age in years.
    pub age: i32,
    /// Major, trimmed and non-empty.
    pub major: String,
    /// Average grade.
    pub average_grade: Grade,
}

impl NewStudent {
    /// Attaches a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            major: self.major,
            average_grade: self.average_grade,
        }
    }
}

/// A validated partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    /// New name.
    pub name: Option<String>,
    /// New age.
    pub age: Option<i32>,
    /// New major.
    pub major: Option<String>,
    /// New average grade.
    pub average_grade: Option<Grade>,
}

impl StudentPatch {
    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.major.is_none()
            && self.average_grade.is_none()
    }

    /// Applies the supplied fields to `student` in place.
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(major) = self.major {
            student.major = major;
        }
        if let Some(grade) = self.average_grade {
            student.average_grade = grade;
        }
    }
}

/// List filters. Both match case-insensitive substrings; an absent filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Substring of the major.
    pub major: Option<String>,
    /// Substring of either the name or the major.
    pub search: Option<String>,
}

impl StudentFilter {
    /// Returns `true` if `student` passes every supplied filter.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        let major_ok = self
            .major
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&student.major, needle));
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            contains_ignore_case(&student.name, needle)
                || contains_ignore_case(&student.major, needle)
        });
        major_ok && search_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
