//! Enrollment repository.

use sqlx::SqlitePool;

use super::types::{EnrolledCourse, Enrollment, RosterEntry};
use crate::{CampusError, Result};

/// Repository for enrollment operations.
pub struct EnrollmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EnrollmentRepository<'a> {
    /// Create a new EnrollmentRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Enroll a user in a course.
    ///
    /// Returns [`CampusError::Conflict`] if the user is already enrolled.
    pub async fn create(&self, user_id: i64, course_id: i64) -> Result<Enrollment> {
        let result = sqlx::query("INSERT INTO enrollments (user_id, course_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(course_id)
            .execute(self.pool)
            .await
            .map_err(|e| match CampusError::from(e) {
                CampusError::Conflict(_) => {
                    CampusError::Conflict("already enrolled in this course".to_string())
                }
                other => other,
            })?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| CampusError::NotFound("enrollment".to_string()))
    }

    /// Get an enrollment by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, course_id, enrolled_at FROM enrollments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(enrollment)
    }

    /// Remove a user's enrollment. Returns false if there was none.
    pub async fn delete(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = ? AND course_id = ?")
            .bind(user_id)
            .bind(course_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the users enrolled in a course, oldest enrollment first.
    pub async fn roster(&self, course_id: i64) -> Result<Vec<RosterEntry>> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            "SELECT u.id AS user_id, u.name, u.email, e.enrolled_at
             FROM enrollments e
             JOIN users u ON u.id = e.user_id
             WHERE e.course_id = ?
             ORDER BY e.id",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;
        Ok(entries)
    }

    /// List the courses a user is enrolled in.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<EnrolledCourse>> {
        let courses = sqlx::query_as::<_, EnrolledCourse>(
            "SELECT c.id AS course_id, c.title, e.enrolled_at
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             WHERE e.user_id = ?
             ORDER BY e.id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(courses)
    }
}
