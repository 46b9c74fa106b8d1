//! Student CRUD handlers: list, create, get, replace, update, delete, and
//! the general average.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::dto::{
    DeleteResponse, GeneralAverageResponse, ListParams, PageWindow, StudentListResponse,
    StudentPatchRequest, StudentRequest, StudentResponse,
};
use crate::app_state::AppState;
use crate::domain::StudentId;
use crate::error::{ApiError, ErrorResponse};

/// Collection path; also the base of pagination links.
pub const STUDENTS_PATH: &str = "/api/estudiantes/";

/// `GET /api/estudiantes/` — List students, optionally filtered.
///
/// # Errors
///
/// Returns [`ApiError::InvalidPage`] for a page past the end.
#[utoipa::path(
    get,
    path = "/api/estudiantes/",
    tag = "Estudiantes",
    summary = "List students",
    description = "Returns students ascending by id in a paginated envelope. `carrera` keeps students whose major contains the value, ignoring case; no match yields an empty `results` list. `page` may be empty (first page) or `last`.",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated student list", body = StudentListResponse),
        (status = 404, description = "Page out of range", body = ErrorResponse),
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.filter();
    let count = state.student_service.count(&filter).await?;
    let window = PageWindow::resolve(params.page.as_deref(), count, state.page_size)?;

    let next = if window.has_next() {
        Some(params.page_query(Some(window.page + 1)).link(STUDENTS_PATH)?)
    } else {
        None
    };
    let previous = if window.has_previous() {
        let target = (window.page > 2).then_some(window.page - 1);
        Some(params.page_query(target).link(STUDENTS_PATH)?)
    } else {
        None
    };

    let results = state
        .student_service
        .list(&filter, window.offset, window.limit)
        .await?
        .into_iter()
        .map(StudentResponse::from)
        .collect();

    Ok(Json(StudentListResponse {
        count,
        next,
        previous,
        results,
    }))
}

/// `POST /api/estudiantes/` — Create a student.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] with a field-error map when any field
/// is missing or malformed.
#[utoipa::path(
    post,
    path = "/api/estudiantes/",
    tag = "Estudiantes",
    summary = "Create a student",
    description = "Validates all four fields and stores the student. On failure nothing is stored and the response maps each bad field to its problems.",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Field errors, e.g. {\"nombre\": [\"This field is required.\"]}, or {\"detail\": \"JSON parse error - ...\"} for a body that is not JSON", body = serde_json::Value),
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let student = state.student_service.create(&input).await?;
    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

/// `GET /api/estudiantes/{id}/` — Get one student.
///
/// # Errors
///
/// Returns [`ApiError::StudentNotFound`] if the student does not exist.
#[utoipa::path(
    get,
    path = "/api/estudiantes/{id}/",
    tag = "Estudiantes",
    summary = "Get a student",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    responses(
        (status = 200, description = "Student", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_student_id(&id)?;
    let student = state.student_service.retrieve(id).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// `PUT /api/estudiantes/{id}/` — Replace every field of a student.
///
/// # Errors
///
/// Returns [`ApiError::StudentNotFound`] or [`ApiError::Validation`].
#[utoipa::path(
    put,
    path = "/api/estudiantes/{id}/",
    tag = "Estudiantes",
    summary = "Replace a student",
    description = "All four fields are required and overwrite the stored values.",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 400, description = "Field errors", body = serde_json::Value),
        (status = 404, description = "Student not found", body = ErrorResponse),
    )
)]
pub async fn replace_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_student_id(&id)?;
    let Json(input) = payload?;
    let student = state.student_service.replace(id, &input).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// `PATCH /api/estudiantes/{id}/` — Update some fields of a student.
///
/// # Errors
///
/// Returns [`ApiError::StudentNotFound`] or [`ApiError::Validation`].
#[utoipa::path(
    patch,
    path = "/api/estudiantes/{id}/",
    tag = "Estudiantes",
    summary = "Update a student",
    description = "Only the supplied fields change; the rest keep their stored values.",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    request_body = StudentPatchRequest,
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 400, description = "Field errors", body = serde_json::Value),
        (status = 404, description = "Student not found", body = ErrorResponse),
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_student_id(&id)?;
    let Json(input) = payload?;
    let student = state.student_service.update_partial(id, &input).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// `DELETE /api/estudiantes/{id}/` — Delete a student.
///
/// # Errors
///
/// Returns [`ApiError::StudentNotFound`] if the student does not exist.
#[utoipa::path(
    delete,
    path = "/api/estudiantes/{id}/",
    tag = "Estudiantes",
    summary = "Delete a student",
    params(
        ("id" = i64, Path, description = "Student id"),
    ),
    responses(
        (status = 200, description = "Student deleted", body = DeleteResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_student_id(&id)?;
    state.student_service.delete(id).await?;
    Ok(Json(DeleteResponse::deleted()))
}

/// `GET /api/estudiantes/promedio-general/` — Mean grade of all students.
///
/// # Errors
///
/// Returns [`ApiError::NoStudents`] when no student is registered.
#[utoipa::path(
    get,
    path = "/api/estudiantes/promedio-general/",
    tag = "Estudiantes",
    summary = "General average",
    description = "Mean of every student's grade rounded to two decimals (ties away from zero), with the number of students. With no students the answer is 404, not zero.",
    responses(
        (status = 200, description = "General average", body = GeneralAverageResponse),
        (status = 404, description = "No students registered: {\"message\": \"No hay estudiantes registrados\"}", body = serde_json::Value),
    )
)]
pub async fn general_average(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let average = state.student_service.general_average().await?;
    Ok(Json(GeneralAverageResponse::from(average)))
}

/// Student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(STUDENTS_PATH, get(list_students).post(create_student))
        .route("/api/estudiantes/promedio-general/", get(general_average))
        .route(
            "/api/estudiantes/{id}/",
            get(get_student)
                .put(replace_student)
                .patch(update_student)
                .delete(delete_student),
        )
}

/// A path segment that is not an integer cannot name a stored student.
fn parse_student_id(raw: &str) -> Result<StudentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::StudentNotFound(raw.to_string()))
}
