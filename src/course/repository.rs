//! Course repository.

use sqlx::{QueryBuilder, SqlitePool};

use super::types::{Course, CourseUpdate, NewCourse};
use crate::{CampusError, Result};

const COURSE_COLUMNS: &str = "id, title, description, instructor_id, created_at, updated_at";

/// Repository for course CRUD operations.
pub struct CourseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CourseRepository<'a> {
    /// Create a new CourseRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a course and return it.
    pub async fn create(&self, course: &NewCourse) -> Result<Course> {
        let result =
            sqlx::query("INSERT INTO courses (title, description, instructor_id) VALUES (?, ?, ?)")
                .bind(&course.title)
                .bind(&course.description)
                .bind(course.instructor_id)
                .execute(self.pool)
                .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| CampusError::NotFound("course".to_string()))
    }

    /// Get a course by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?");
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(course)
    }

    /// List all courses ordered by ID.
    pub async fn list(&self) -> Result<Vec<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY id");
        let courses = sqlx::query_as::<_, Course>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(courses)
    }

    /// List the courses taught by an instructor.
    pub async fn list_by_instructor(&self, instructor_id: i64) -> Result<Vec<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE instructor_id = ? ORDER BY id");
        let courses = sqlx::query_as::<_, Course>(&sql)
            .bind(instructor_id)
            .fetch_all(self.pool)
            .await?;
        Ok(courses)
    }

    /// Apply a partial update. Returns None if the course does not exist.
    pub async fn update(&self, id: i64, update: &CourseUpdate) -> Result<Option<Course>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE courses SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }
        if let Some(instructor_id) = update.instructor_id {
            separated.push("instructor_id = ");
            separated.push_bind_unseparated(instructor_id);
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a course. Enrollments are removed by cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
