//! PostgreSQL implementation of the student store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{GradeTotalsRow, STUDENT_COLUMNS, StudentRow};
use super::{GradeTotals, StudentStore, not_found};
use crate::config::AppConfig;
use crate::domain::{NewStudent, Student, StudentFilter, StudentId, StudentPatch, grade};
use crate::error::ApiError;

/// `WHERE` clause shared by counting and listing. `$1` is the escaped major
/// filter and `$2` the escaped search filter; `NULL` disables either.
const FILTER_CLAUSE: &str = "($1::TEXT IS NULL OR carrera ILIKE '%' || $1 || '%') \
     AND ($2::TEXT IS NULL OR nombre ILIKE '%' || $2 || '%' \
                           OR carrera ILIKE '%' || $2 || '%')";

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Each operation is a single statement, so the database's row-level
/// atomicity is all the locking needed. Ids come from the table's
/// `BIGSERIAL` sequence, which never hands out a value twice.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] if the database is unreachable.
    pub async fn connect(config: &AppConfig) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations (creates the `estudiantes` table).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    async fn fetch_one_by_id(&self, sql: &str, id: StudentId) -> Result<Student, ApiError> {
        sqlx::query_as::<_, StudentRow>(sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?
            .ok_or_else(|| not_found(id))
            .and_then(Student::try_from)
    }
}

#[async_trait]
impl StudentStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    async fn count(&self, filter: &StudentFilter) -> Result<u64, ApiError> {
        let sql = format!("SELECT COUNT(*) FROM estudiantes WHERE {FILTER_CLAUSE}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.major.as_deref().map(escape_like))
            .bind(filter.search.as_deref().map(escape_like))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        u64::try_from(count)
            .map_err(|_| ApiError::Persistence(format!("negative row count {count}")))
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Student>, ApiError> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM estudiantes WHERE {FILTER_CLAUSE} \
             ORDER BY id ASC LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(filter.major.as_deref().map(escape_like))
            .bind(filter.search.as_deref().map(escape_like))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        rows.into_iter().map(Student::try_from).collect()
    }

    async fn insert(&self, student: NewStudent) -> Result<Student, ApiError> {
        let sql = format!(
            "INSERT INTO estudiantes (nombre, edad, carrera, promedio) \
             VALUES ($1, $2, $3, $4::NUMERIC) RETURNING {STUDENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(&student.name)
            .bind(student.age)
            .bind(&student.major)
            .bind(student.average_grade.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Student::try_from(row)
    }

    async fn get(&self, id: StudentId) -> Result<Student, ApiError> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM estudiantes WHERE id = $1");
        self.fetch_one_by_id(&sql, id).await
    }

    async fn replace(&self, id: StudentId, student: NewStudent) -> Result<Student, ApiError> {
        let sql = format!(
            "UPDATE estudiantes SET nombre = $2, edad = $3, carrera = $4, promedio = $5::NUMERIC \
             WHERE id = $1 RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, StudentRow>(&sql)
            .bind(id.get())
            .bind(&student.name)
            .bind(student.age)
            .bind(&student.major)
            .bind(student.average_grade.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?
            .ok_or_else(|| not_found(id))
            .and_then(Student::try_from)
    }

    async fn patch(&self, id: StudentId, patch: StudentPatch) -> Result<Student, ApiError> {
        let sql = format!(
            "UPDATE estudiantes SET \
                 nombre = COALESCE($2, nombre), \
                 edad = COALESCE($3, edad), \
                 carrera = COALESCE($4, carrera), \
                 promedio = COALESCE($5::NUMERIC, promedio) \
             WHERE id = $1 RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, StudentRow>(&sql)
            .bind(id.get())
            .bind(patch.name)
            .bind(patch.age)
            .bind(patch.major)
            .bind(patch.average_grade.map(|g| g.to_string()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?
            .ok_or_else(|| not_found(id))
            .and_then(Student::try_from)
    }

    async fn delete(&self, id: StudentId) -> Result<Student, ApiError> {
        let sql = format!("DELETE FROM estudiantes WHERE id = $1 RETURNING {STUDENT_COLUMNS}");
        self.fetch_one_by_id(&sql, id).await
    }

    async fn grade_totals(&self) -> Result<GradeTotals, ApiError> {
        let row = sqlx::query_as::<_, GradeTotalsRow>(
            "SELECT COALESCE(SUM(promedio), 0)::TEXT AS total, COUNT(*) AS count FROM estudiantes",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        let sum_hundredths = grade::parse_hundredths(&row.total).map_err(|e| {
            ApiError::Persistence(format!("unreadable grade sum {:?}: {e}", row.total))
        })?;
        let count = u64::try_from(row.count)
            .map_err(|_| ApiError::Persistence(format!("negative row count {}", row.count)))?;
        Ok(GradeTotals {
            sum_hundredths,
            count,
        })
    }
}

/// Escapes `ILIKE` wildcards so the filter matches the text literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_quotes_wildcards() {
        assert_eq!(escape_like("Software"), "Software");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
    }
}
