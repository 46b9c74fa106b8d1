//! Student service: validates input and drives the store.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::validation::{validate_new, validate_patch};
use crate::domain::{Grade, Student, StudentFilter, StudentId};
use crate::error::ApiError;
use crate::persistence::StudentStore;

/// Mean grade over every stored student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralAverage {
    /// Mean of all grades, rounded to two decimals (ties away from zero).
    pub average: Grade,
    /// Number of students the mean covers.
    pub total: u64,
}

/// Owner of the student CRUD, filter and aggregate contract.
///
/// Stateless coordinator: holds only the shared store handle. Every
/// mutation follows the pattern: validate → single store call → log →
/// return the stored record. Nothing is cached; each call reflects the
/// latest committed state of the store.
#[derive(Debug, Clone)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    /// Creates a new `StudentService` over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn StudentStore> {
        &self.store
    }

    /// Counts the students passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on store failure.
    pub async fn count(&self, filter: &StudentFilter) -> Result<u64, ApiError> {
        self.store.count(filter).await
    }

    /// Lists up to `limit` students passing `filter`, ascending by id,
    /// starting after the first `offset` matches. An empty result is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on store failure.
    pub async fn list(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Student>, ApiError> {
        self.store.list(filter, offset, limit).await
    }

    /// Validates `input` and persists it as a new student.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming every missing or malformed
    /// field; nothing is persisted in that case.
    pub async fn create(&self, input: &Value) -> Result<Student, ApiError> {
        let candidate = validate_new(input).inspect_err(|errors| {
            tracing::debug!(%errors, "create rejected");
        })?;
        let student = self.store.insert(candidate).await?;
        tracing::info!(student_id = %student.id, student = %student, "student created");
        Ok(student)
    }

    /// Fetches a single student.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StudentNotFound`] if no such record exists.
    pub async fn retrieve(&self, id: StudentId) -> Result<Student, ApiError> {
        self.store.get(id).await
    }

    /// Overwrites all four fields of an existing student.
    ///
    /// Existence is checked before the payload is validated, so an unknown
    /// id is reported as not found even when the body is also invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StudentNotFound`] or [`ApiError::Validation`].
    pub async fn replace(&self, id: StudentId, input: &Value) -> Result<Student, ApiError> {
        self.store.get(id).await?;
        let replacement = validate_new(input).inspect_err(|errors| {
            tracing::debug!(student_id = %id, %errors, "replace rejected");
        })?;
        let student = self.store.replace(id, replacement).await?;
        tracing::info!(student_id = %id, student = %student, "student replaced");
        Ok(student)
    }

    /// Overwrites the supplied fields of an existing student; the others
    /// keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StudentNotFound`] or [`ApiError::Validation`].
    pub async fn update_partial(&self, id: StudentId, input: &Value) -> Result<Student, ApiError> {
        self.store.get(id).await?;
        let patch = validate_patch(input).inspect_err(|errors| {
            tracing::debug!(student_id = %id, %errors, "partial update rejected");
        })?;
        let student = self.store.patch(id, patch).await?;
        tracing::info!(student_id = %id, student = %student, "student updated");
        Ok(student)
    }

    /// Removes a student permanently.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StudentNotFound`] if no such record exists.
    pub async fn delete(&self, id: StudentId) -> Result<Student, ApiError> {
        let student = self.store.delete(id).await?;
        tracing::info!(student_id = %id, student = %student, "student deleted");
        Ok(student)
    }

    /// Computes the mean grade over all students.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NoStudents`] when the store is empty: an
    /// aggregate over nothing is reported as absent rather than as zero.
    pub async fn general_average(&self) -> Result<GeneralAverage, ApiError> {
        let totals = self.store.grade_totals().await?;
        let average = Grade::mean(totals.sum_hundredths, totals.count).ok_or(ApiError::NoStudents)?;
        Ok(GeneralAverage {
            average,
            total: totals.count,
        })
    }
}
