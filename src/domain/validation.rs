//! Schema validation of raw JSON student payloads.
//!
//! Validation is a pure step that runs before any store mutation: it turns
//! a request body into a [`NewStudent`] or [`StudentPatch`], or into a
//! [`FieldErrors`] map describing every problem at once. Nothing is
//! persisted unless validation succeeds.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::{Grade, NewStudent, StudentPatch};

/// JSON key of the student's name.
pub const FIELD_NAME: &str = "nombre";
/// JSON key of the student's age.
pub const FIELD_AGE: &str = "edad";
/// JSON key of the student's major.
pub const FIELD_MAJOR: &str = "carrera";
/// JSON key of the student's average grade.
pub const FIELD_GRADE: &str = "promedio";
/// Key for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Maximum length of text fields, in characters.
pub const MAX_TEXT_CHARS: usize = 100;

const MSG_REQUIRED: &str = "This field is required.";
const MSG_NULL: &str = "This field may not be null.";
const MSG_BLANK: &str = "This field may not be blank.";
const MSG_NOT_STRING: &str = "Not a valid string.";
const MSG_NOT_INTEGER: &str = "A valid integer is required.";
const MSG_NOT_NUMBER: &str = "A valid number is required.";
const MSG_EMPTY_PATCH: &str = "At least one field must be supplied.";

/// Field name → list of human-readable problems.
///
/// Serialized as a plain JSON object, e.g.
/// `{"nombre": ["This field is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem with `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Shorthand for a single non-field error.
    #[must_use]
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    /// Returns `true` when no problem was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `field` has at least one problem.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Problems recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Validates a full payload: all four fields must be present and valid.
/// Unknown keys, including `id`, are ignored.
///
/// # Errors
///
/// Returns every missing or malformed field at once.
pub fn validate_new(input: &Value) -> Result<NewStudent, FieldErrors> {
    let object = as_object(input)?;
    let mut errors = FieldErrors::new();

    let name = required(object, FIELD_NAME, &mut errors, parse_text);
    let age = required(object, FIELD_AGE, &mut errors, parse_age);
    let major = required(object, FIELD_MAJOR, &mut errors, parse_text);
    let grade = required(object, FIELD_GRADE, &mut errors, parse_grade);

    match (name, age, major, grade) {
        (Some(name), Some(age), Some(major), Some(average_grade)) if errors.is_empty() => {
            Ok(NewStudent {
                name,
                age,
                major,
                average_grade,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a partial payload: every supplied field must be valid and at
/// least one of the four must be supplied.
///
/// # Errors
///
/// Returns every malformed field at once, or a non-field error when the
/// payload names none of the student fields.
pub fn validate_patch(input: &Value) -> Result<StudentPatch, FieldErrors> {
    let object = as_object(input)?;
    let mut errors = FieldErrors::new();

    let patch = StudentPatch {
        name: optional(object, FIELD_NAME, &mut errors, parse_text),
        age: optional(object, FIELD_AGE, &mut errors, parse_age),
        major: optional(object, FIELD_MAJOR, &mut errors, parse_text),
        average_grade: optional(object, FIELD_GRADE, &mut errors, parse_grade),
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    if patch.is_empty() {
        return Err(FieldErrors::non_field(MSG_EMPTY_PATCH));
    }
    Ok(patch)
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    input.as_object().ok_or_else(|| {
        FieldErrors::non_field(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            json_type_name(input)
        ))
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required<T>(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
    parse: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    if object.contains_key(field) {
        optional(object, field, errors, parse)
    } else {
        errors.add(field, MSG_REQUIRED);
        None
    }
}

fn optional<T>(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
    parse: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    let value = object.get(field)?;
    if value.is_null() {
        errors.add(field, MSG_NULL);
        return None;
    }
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

fn parse_text(value: &Value) -> Result<String, String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(MSG_NOT_STRING.to_string()),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MSG_BLANK.to_string());
    }
    if trimmed.chars().count() > MAX_TEXT_CHARS {
        return Err(format!(
            "Ensure this field has no more than {MAX_TEXT_CHARS} characters."
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_age(value: &Value) -> Result<i32, String> {
    let wide: i64 = match value {
        Value::Number(n) => integer_from_number(n).ok_or(MSG_NOT_INTEGER)?,
        Value::String(s) => integer_from_text(s.trim()).ok_or(MSG_NOT_INTEGER)?,
        _ => return Err(MSG_NOT_INTEGER.to_string()),
    };
    i32::try_from(wide).map_err(|_| {
        if wide > 0 {
            format!("Ensure this value is less than or equal to {}.", i32::MAX)
        } else {
            format!("Ensure this value is greater than or equal to {}.", i32::MIN)
        }
    })
}

/// Accepts integral JSON numbers, including `22.0`.
fn integer_from_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    #[allow(clippy::cast_possible_truncation)]
    let truncated = f as i64;
    (f.fract() == 0.0 && f.is_finite() && (truncated as f64) == f).then_some(truncated)
}

/// Accepts `"22"` and `"22.0"` but not `"22.5"`.
fn integer_from_text(s: &str) -> Option<i64> {
    let digits = match s.split_once('.') {
        Some((whole, frac)) if frac.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => s,
    };
    digits.parse().ok()
}

fn parse_grade(value: &Value) -> Result<Grade, String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n
                .as_f64()
                .map(|f| f.to_string())
                .ok_or_else(|| MSG_NOT_NUMBER.to_string())?,
        },
        _ => return Err(MSG_NOT_NUMBER.to_string()),
    };
    text.parse::<Grade>().map_err(|e| e.to_string())
}
