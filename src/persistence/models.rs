//! Database row models for the `estudiantes` table.

use sqlx::FromRow;

use crate::domain::{Grade, Student, StudentId};
use crate::error::ApiError;

/// Column list selected by every query that returns a student. The grade
/// is read as text so its two decimals survive the round trip exactly.
pub const STUDENT_COLUMNS: &str = "id, nombre, edad, carrera, promedio::TEXT AS promedio";

/// A row of the `estudiantes` table.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    /// `BIGSERIAL` primary key.
    pub id: i64,
    /// `VARCHAR(100)` name.
    pub nombre: String,
    /// `INTEGER` age.
    pub edad: i32,
    /// `VARCHAR(100)` major.
    pub carrera: String,
    /// `NUMERIC(4, 2)` grade rendered as text.
    pub promedio: String,
}

impl TryFrom<StudentRow> for Student {
    type Error = ApiError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        let average_grade = row.promedio.parse::<Grade>().map_err(|e| {
            ApiError::Persistence(format!(
                "row {} has unreadable promedio {:?}: {e}",
                row.id, row.promedio
            ))
        })?;
        Ok(Self {
            id: StudentId::new(row.id),
            name: row.nombre,
            age: row.edad,
            major: row.carrera,
            average_grade,
        })
    }
}

/// Aggregate row: `SUM(promedio)` as text and `COUNT(*)`.
#[derive(Debug, Clone, FromRow)]
pub struct GradeTotalsRow {
    /// Sum of all grades, `"0"` for an empty table.
    pub total: String,
    /// Number of rows.
    pub count: i64,
}
