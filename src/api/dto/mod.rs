//! Data Transfer Objects for REST request/response serialization.
//!
//! JSON field names are the public Spanish names (`nombre`, `edad`,
//! `carrera`, `promedio`). Grades are serialized as strings with exactly
//! two decimals so no client ever sees a binary float approximation.

pub mod common_dto;
pub mod student_dto;

pub use common_dto::*;
pub use student_dto::*;
