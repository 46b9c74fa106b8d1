//! In-memory student store.
//!
//! [`MemoryStore`] keeps every record in a `BTreeMap` keyed by
//! [`StudentId`] behind a single [`tokio::sync::RwLock`], so iteration is
//! already in ascending id order and every mutation is one critical
//! section.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{GradeTotals, StudentStore, not_found};
use crate::domain::{NewStudent, Student, StudentFilter, StudentId, StudentPatch};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<StudentId, Student>,
    /// Highest id ever handed out. Survives deletes so ids are never reused.
    last_id: i64,
}

/// Process-local [`StudentStore`].
///
/// # Concurrency
///
/// - Reads run concurrently.
/// - Writes are serialized and atomic with respect to readers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    /// Creates an empty store. The first id assigned is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn count(&self, filter: &StudentFilter) -> Result<u64, ApiError> {
        let table = self.table.read().await;
        let matching = table.rows.values().filter(|s| filter.matches(s)).count();
        Ok(matching as u64)
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Student>, ApiError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|student| filter.matches(student))
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn insert(&self, student: NewStudent) -> Result<Student, ApiError> {
        let mut table = self.table.write().await;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| ApiError::Persistence("student id space exhausted".to_string()))?;
        table.last_id = next;
        let id = StudentId::new(next);
        let student = student.with_id(id);
        table.rows.insert(id, student.clone());
        Ok(student)
    }

    async fn get(&self, id: StudentId) -> Result<Student, ApiError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn replace(&self, id: StudentId, student: NewStudent) -> Result<Student, ApiError> {
        let mut table = self.table.write().await;
        let slot = table.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        *slot = student.with_id(id);
        Ok(slot.clone())
    }

    async fn patch(&self, id: StudentId, patch: StudentPatch) -> Result<Student, ApiError> {
        let mut table = self.table.write().await;
        let slot = table.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        patch.apply(slot);
        Ok(slot.clone())
    }

    async fn delete(&self, id: StudentId) -> Result<Student, ApiError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).ok_or_else(|| not_found(id))
    }

    async fn grade_totals(&self) -> Result<GradeTotals, ApiError> {
        let table = self.table.read().await;
        let sum_hundredths = table
            .rows
            .values()
            .map(|s| i64::from(s.average_grade.hundredths()))
            .sum();
        Ok(GradeTotals {
            sum_hundredths,
            count: table.rows.len() as u64,
        })
    }
}
