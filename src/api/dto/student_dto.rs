//! Student DTOs for create, replace, update, list and aggregate endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PageQuery;
use crate::domain::{Student, StudentFilter};
use crate::service::GeneralAverage;

/// Student record as returned by every student endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    /// Store-assigned identifier.
    pub id: i64,
    /// Full name.
    #[schema(example = "Juan Pérez")]
    pub nombre: String,
    /// Age in years.
    #[schema(example = 22)]
    pub edad: i32,
    /// Major.
    #[schema(example = "Software")]
    pub carrera: String,
    /// Average grade with two decimals.
    #[schema(example = "8.50")]
    pub promedio: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.get(),
            nombre: student.name,
            edad: student.age,
            carrera: student.major,
            promedio: student.average_grade.to_string(),
        }
    }
}

/// Request body for `POST /api/estudiantes/` and `PUT /api/estudiantes/{id}/`.
///
/// All four fields are required. `edad` and `promedio` may also be sent as
/// numeric strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentRequest {
    /// Full name, 1–100 characters after trimming.
    #[schema(example = "Nuevo Estudiante")]
    pub nombre: String,
    /// Age in years.
    #[schema(example = 22)]
    pub edad: i32,
    /// Major, 1–100 characters after trimming.
    #[schema(example = "Software")]
    pub carrera: String,
    /// Average grade, at most two integer and two fractional digits.
    #[schema(example = 8.5)]
    pub promedio: f64,
}

/// Request body for `PATCH /api/estudiantes/{id}/`. At least one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StudentPatchRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    /// New age.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edad: Option<i32>,
    /// New major.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrera: Option<String>,
    /// New average grade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promedio: Option<f64>,
}

/// Query parameters of `GET /api/estudiantes/`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring of the major.
    pub carrera: Option<String>,
    /// Case-insensitive substring of the name or the major.
    pub search: Option<String>,
    /// 1-based page number, or `last`. Empty means the first page.
    pub page: Option<String>,
}

impl ListParams {
    /// The store filter these parameters describe.
    #[must_use]
    pub fn filter(&self) -> StudentFilter {
        StudentFilter {
            major: self.carrera.clone(),
            search: self.search.clone(),
        }
    }

    /// Query string pointing at `page` with the same filters.
    #[must_use]
    pub fn page_query(&self, page: Option<u32>) -> PageQuery<'_> {
        PageQuery {
            carrera: self.carrera.as_deref(),
            search: self.search.as_deref(),
            page,
        }
    }
}

/// Paginated list envelope for `GET /api/estudiantes/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentListResponse {
    /// Total students matching the filters, across all pages.
    pub count: u64,
    /// Link to the next page, if any.
    pub next: Option<String>,
    /// Link to the previous page, if any.
    pub previous: Option<String>,
    /// Students on this page, ascending by id.
    pub results: Vec<StudentResponse>,
}

/// Response body for `DELETE /api/estudiantes/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    /// Confirmation message.
    #[schema(example = "Estudiante eliminado correctamente")]
    pub message: String,
}

impl DeleteResponse {
    /// The confirmation returned after a successful delete.
    #[must_use]
    pub fn deleted() -> Self {
        Self {
            message: "Estudiante eliminado correctamente".to_string(),
        }
    }
}

/// Response body for `GET /api/estudiantes/promedio-general/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneralAverageResponse {
    /// Mean grade over all students, two decimals.
    #[schema(example = "9.00")]
    pub promedio_general: String,
    /// Number of students the mean covers.
    #[schema(example = 3)]
    pub total_estudiantes: u64,
}

impl From<GeneralAverage> for GeneralAverageResponse {
    fn from(avg: GeneralAverage) -> Self {
        Self {
            promedio_general: avg.average.to_string(),
            total_estudiantes: avg.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Grade, StudentId};

    #[test]
    fn student_response_formats_grade() {
        let student = Student {
            id: StudentId::new(3),
            name: "Ana".to_string(),
            age: 22,
            major: "Sistemas".to_string(),
            average_grade: Grade::from_hundredths(800).unwrap_or_default(),
        };
        let dto = StudentResponse::from(student);
        assert_eq!(dto.id, 3);
        assert_eq!(dto.promedio, "8.00");
    }

    #[test]
    fn list_params_build_filter() {
        let params = ListParams {
            carrera: Some("Soft".to_string()),
            ..ListParams::default()
        };
        let filter = params.filter();
        assert_eq!(filter.major.as_deref(), Some("Soft"));
        assert!(filter.search.is_none());
    }

    #[test]
    fn patch_request_omits_unset_fields() {
        let body = StudentPatchRequest {
            nombre: Some("Solo Nombre".to_string()),
            ..StudentPatchRequest::default()
        };
        let json = serde_json::to_value(body).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"nombre": "Solo Nombre"}));
    }
}
