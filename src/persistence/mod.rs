//! Persistence layer: the student store contract and its backends.
//!
//! [`StudentStore`] is the seam between the service and storage. A store
//! assigns strictly increasing ids that are never reused, iterates in
//! ascending id order, returns listings one window at a time and applies
//! each mutation atomically. Two backends
//! ship with the crate:
//!
//! - [`MemoryStore`]: a lock-protected ordered map, used for tests and
//!   single-process deployments.
//! - [`PostgresStore`]: the `estudiantes` table through `sqlx::PgPool`.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{NewStudent, Student, StudentFilter, StudentId, StudentPatch};
use crate::error::ApiError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Sum and count of all stored grades, the inputs of the general average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradeTotals {
    /// Sum of every student's grade, in hundredths.
    pub sum_hundredths: i64,
    /// Number of students.
    pub count: u64,
}

/// Storage backend for student records.
///
/// Lookups by id fail with [`ApiError::StudentNotFound`] when the record
/// does not exist; every other failure is [`ApiError::Persistence`].
#[async_trait]
pub trait StudentStore: Send + Sync + fmt::Debug {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), ApiError>;

    /// Number of students passing `filter`.
    async fn count(&self, filter: &StudentFilter) -> Result<u64, ApiError>;

    /// Returns at most `limit` students passing `filter`, ascending by id,
    /// skipping the first `offset` of them.
    async fn list(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Student>, ApiError>;

    /// Persists a new record and returns it with its assigned id.
    async fn insert(&self, student: NewStudent) -> Result<Student, ApiError>;

    /// Fetches a single record.
    async fn get(&self, id: StudentId) -> Result<Student, ApiError>;

    /// Overwrites all four fields of an existing record.
    async fn replace(&self, id: StudentId, student: NewStudent) -> Result<Student, ApiError>;

    /// Overwrites the supplied fields of an existing record.
    async fn patch(&self, id: StudentId, patch: StudentPatch) -> Result<Student, ApiError>;

    /// Removes a record permanently, returning what was removed.
    async fn delete(&self, id: StudentId) -> Result<Student, ApiError>;

    /// Sum and count of all grades.
    async fn grade_totals(&self) -> Result<GradeTotals, ApiError>;
}

pub(crate) fn not_found(id: StudentId) -> ApiError {
    ApiError::StudentNotFound(id.to_string())
}
