//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use super::dto::{
    DeleteResponse, GeneralAverageResponse, StudentListResponse, StudentPatchRequest,
    StudentRequest, StudentResponse,
};
use super::handlers::{student, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Path at which the generated document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Generated OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "estudiantes-api",
        description = "CRUD, major filtering and general grade average for student records."
    ),
    paths(
        student::list_students,
        student::create_student,
        student::get_student,
        student::replace_student,
        student::update_student,
        student::delete_student,
        student::general_average,
        system::health_handler,
    ),
    components(schemas(
        StudentResponse,
        StudentRequest,
        StudentPatchRequest,
        StudentListResponse,
        DeleteResponse,
        GeneralAverageResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Estudiantes", description = "Student records"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
