//! Course service.
//!
//! Wraps the course and enrollment repositories with role checks. Every
//! operation takes the [`Principal`] resolved by the access gate.

use tracing::info;

use super::enrollment::EnrollmentRepository;
use super::repository::CourseRepository;
use super::types::{Course, CourseUpdate, EnrolledCourse, Enrollment, NewCourse, RosterEntry};
use crate::auth::{authorize, Principal};
use crate::db::{Database, Role, UserRepository};
use crate::{CampusError, Result};

/// Maximum length for course titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for course descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CampusError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CampusError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<()> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(CampusError::Validation(
            format!("description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

/// Service for course and enrollment operations with permission checking.
pub struct CourseService<'a> {
    db: &'a Database,
}

impl<'a> CourseService<'a> {
    /// Create a new CourseService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List all courses. Any authenticated principal may browse.
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        CourseRepository::new(self.db.pool()).list().await
    }

    /// Get a course by ID.
    pub async fn get_course(&self, course_id: i64) -> Result<Course> {
        CourseRepository::new(self.db.pool())
            .get_by_id(course_id)
            .await?
            .ok_or_else(|| CampusError::NotFound("course".to_string()))
    }

    /// Create a course. Admin only.
    pub async fn create_course(&self, principal: &Principal, course: NewCourse) -> Result<Course> {
        authorize(principal, Role::Admin)?;
        validate_title(&course.title)?;
        validate_description(course.description.as_deref())?;
        if let Some(instructor_id) = course.instructor_id {
            self.check_instructor(instructor_id).await?;
        }

        let course = NewCourse {
            title: course.title.trim().to_string(),
            ..course
        };
        let created = CourseRepository::new(self.db.pool()).create(&course).await?;
        info!(course_id = created.id, by = principal.id, "Course created");
        Ok(created)
    }

    /// Update a course.
    ///
    /// Admins may change anything. The assigned instructor may edit the
    /// title and description but cannot reassign the course.
    pub async fn update_course(
        &self,
        principal: &Principal,
        course_id: i64,
        update: CourseUpdate,
    ) -> Result<Course> {
        let course = self.get_course(course_id).await?;

        if principal.role != Role::Admin {
            if !self.teaches(principal, &course) {
                return Err(CampusError::Forbidden(
                    "only an admin or the assigned instructor can edit this course".to_string(),
                ));
            }
            if update.instructor_id.is_some() {
                return Err(CampusError::Forbidden(
                    "only an admin can reassign a course".to_string(),
                ));
            }
        }

        if let Some(ref title) = update.title {
            validate_title(title)?;
        }
        if let Some(ref description) = update.description {
            validate_description(description.as_deref())?;
        }
        if let Some(Some(instructor_id)) = update.instructor_id {
            self.check_instructor(instructor_id).await?;
        }

        let update = CourseUpdate {
            title: update.title.map(|t| t.trim().to_string()),
            ..update
        };
        CourseRepository::new(self.db.pool())
            .update(course_id, &update)
            .await?
            .ok_or_else(|| CampusError::NotFound("course".to_string()))
    }

    /// Delete a course and its enrollments. Admin only.
    pub async fn delete_course(&self, principal: &Principal, course_id: i64) -> Result<()> {
        authorize(principal, Role::Admin)?;
        if !CourseRepository::new(self.db.pool()).delete(course_id).await? {
            return Err(CampusError::NotFound("course".to_string()));
        }
        info!(course_id, by = principal.id, "Course deleted");
        Ok(())
    }

    /// Enroll the principal in a course.
    pub async fn enroll(&self, principal: &Principal, course_id: i64) -> Result<Enrollment> {
        self.get_course(course_id).await?;
        let enrollment = EnrollmentRepository::new(self.db.pool())
            .create(principal.id, course_id)
            .await?;
        info!(user_id = principal.id, course_id, "Enrolled");
        Ok(enrollment)
    }

    /// Withdraw the principal from a course.
    pub async fn unenroll(&self, principal: &Principal, course_id: i64) -> Result<()> {
        self.get_course(course_id).await?;
        if !EnrollmentRepository::new(self.db.pool())
            .delete(principal.id, course_id)
            .await?
        {
            return Err(CampusError::NotFound("enrollment".to_string()));
        }
        info!(user_id = principal.id, course_id, "Unenrolled");
        Ok(())
    }

    /// List the users enrolled in a course.
    ///
    /// Requires instructor role; instructors only see their own courses.
    pub async fn roster(&self, principal: &Principal, course_id: i64) -> Result<Vec<RosterEntry>> {
        authorize(principal, Role::Instructor)?;
        let course = self.get_course(course_id).await?;
        if principal.role != Role::Admin && !self.teaches(principal, &course) {
            return Err(CampusError::Forbidden(
                "only the assigned instructor can view this roster".to_string(),
            ));
        }
        EnrollmentRepository::new(self.db.pool())
            .roster(course_id)
            .await
    }

    /// List the courses the principal is enrolled in.
    pub async fn my_enrollments(&self, principal: &Principal) -> Result<Vec<EnrolledCourse>> {
        EnrollmentRepository::new(self.db.pool())
            .list_by_user(principal.id)
            .await
    }

    fn teaches(&self, principal: &Principal, course: &Course) -> bool {
        principal.role == Role::Instructor && course.instructor_id == Some(principal.id)
    }

    async fn check_instructor(&self, user_id: i64) -> Result<()> {
        let user = UserRepository::new(self.db.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| CampusError::Validation("instructor does not exist".to_string()))?;
        if !user.has_role(Role::Instructor) {
            return Err(CampusError::Validation(
                "assigned user is not an instructor".to_string(),
            ));
        }
        Ok(())
    }
}
